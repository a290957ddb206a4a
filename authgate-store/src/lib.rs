//! Credential store adapters for authgate
//!
//! Two interchangeable implementations of the kernel's `CredentialStore`
//! contract: a flat delimited text file and an embedded fjall keyspace.
//! Callers pick one at startup; the kernel never knows which.

pub mod db;
pub mod file;

pub use db::*;
pub use file::*;
