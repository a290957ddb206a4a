//! authgate command-line interface
//!
//! Drives the auth kernel: register users, log in to obtain a session
//! token, inspect tokens. The kernel and token service are constructed once
//! here with their store and secret injected; the signing secret comes from
//! configuration (a key file or the `AUTHGATE_SECRET` env var), never
//! generated at runtime, so every instance sharing it verifies the same
//! tokens.

use anyhow::{anyhow, bail, Context};
use authgate_core::{AuthKernel, CredentialStore, Role, TokenService};
use authgate_store::{DbStore, FileStore};
use clap::{Arg, ArgMatches, Command};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

const SECRET_ENV_VAR: &str = "AUTHGATE_SECRET";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let matches = Command::new("authgate")
        .version("0.1.0")
        .about("Credential and session authentication kernel")
        .arg(
            Arg::new("store")
                .long("store")
                .value_name("KIND")
                .help("Credential store backend: file | db")
                .default_value("file"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("PATH")
                .help("Data directory path")
                .default_value("./data"),
        )
        .arg(
            Arg::new("secret-file")
                .long("secret-file")
                .value_name("PATH")
                .help("File holding the token signing secret (overrides AUTHGATE_SECRET)"),
        )
        .subcommand(
            Command::new("register")
                .about("Register a new user")
                .arg(Arg::new("username").required(true))
                .arg(Arg::new("password").required(true))
                .arg(
                    Arg::new("role")
                        .long("role")
                        .value_name("ROLE")
                        .help("Role to grant: user | analyst | admin")
                        .default_value("user"),
                ),
        )
        .subcommand(
            Command::new("login")
                .about("Log in and print a session token")
                .arg(Arg::new("username").required(true))
                .arg(Arg::new("password").required(true)),
        )
        .subcommand(
            Command::new("inspect")
                .about("Verify a session token and print its claims")
                .arg(Arg::new("token").required(true)),
        )
        .subcommand_required(true)
        .get_matches();

    let data_dir = PathBuf::from(matches.get_one::<String>("data-dir").unwrap());
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;
        info!("Created data directory: {}", data_dir.display());
    }

    let store_kind = matches.get_one::<String>("store").unwrap();
    let store = open_store(store_kind, &data_dir)?;
    let kernel = AuthKernel::new(store);

    let secret_file = matches.get_one::<String>("secret-file").map(String::as_str);

    match matches.subcommand() {
        Some(("register", sub)) => run_register(&kernel, sub),
        Some(("login", sub)) => {
            let tokens = TokenService::new(&load_secret(secret_file)?)?;
            run_login(&kernel, &tokens, sub)
        }
        Some(("inspect", sub)) => {
            let tokens = TokenService::new(&load_secret(secret_file)?)?;
            run_inspect(&tokens, sub)
        }
        _ => unreachable!("subcommand required"),
    }
}

/// Open the selected credential store under `data_dir`
fn open_store(kind: &str, data_dir: &Path) -> anyhow::Result<Box<dyn CredentialStore>> {
    match kind {
        "file" => Ok(Box::new(FileStore::open(data_dir.join("users.txt"))?)),
        "db" => Ok(Box::new(DbStore::open(data_dir.join("credentials"))?)),
        other => bail!("unknown store backend '{}' (expected 'file' or 'db')", other),
    }
}

/// Load the signing secret from the key file, falling back to the env var
fn load_secret(secret_file: Option<&str>) -> anyhow::Result<Vec<u8>> {
    let mut secret = match secret_file {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("reading secret file {}", path))?
        }
        None => match std::env::var(SECRET_ENV_VAR) {
            Ok(value) => value.into_bytes(),
            Err(_) => bail!(
                "no signing secret: pass --secret-file or set {}",
                SECRET_ENV_VAR
            ),
        },
    };

    // Key files usually end with a newline that is not part of the secret
    while secret.last() == Some(&b'\n') || secret.last() == Some(&b'\r') {
        secret.pop();
    }
    if secret.is_empty() {
        bail!("signing secret is empty");
    }

    Ok(secret)
}

fn run_register(kernel: &AuthKernel, sub: &ArgMatches) -> anyhow::Result<()> {
    let username = sub.get_one::<String>("username").unwrap();
    let password = sub.get_one::<String>("password").unwrap();
    let role = Role::from_str(sub.get_one::<String>("role").unwrap())?;

    let registered = kernel.register(username, password, role)?;
    info!("Registered '{}' with role {}", registered.username, registered.role);

    println!(
        "registered '{}' (id {}, role {})",
        registered.username, registered.user_id, registered.role
    );
    Ok(())
}

fn run_login(kernel: &AuthKernel, tokens: &TokenService, sub: &ArgMatches) -> anyhow::Result<()> {
    let username = sub.get_one::<String>("username").unwrap();
    let password = sub.get_one::<String>("password").unwrap();

    match kernel.login(username, password) {
        Ok(user) => {
            let token = tokens.issue(user.user_id, username, user.role)?;
            info!("Login succeeded for '{}' (role {})", username, user.role);
            println!("{}", token);
            Ok(())
        }
        // The typed kind stays in the log; end users get one message so
        // usernames cannot be enumerated
        Err(e) if e.is_credential_failure() => {
            warn!("Login failed for '{}': {}", username, e);
            Err(anyhow!("invalid credentials"))
        }
        Err(e) => Err(e.into()),
    }
}

fn run_inspect(tokens: &TokenService, sub: &ArgMatches) -> anyhow::Result<()> {
    let token = sub.get_one::<String>("token").unwrap();

    let session = tokens
        .verify(token)
        .ok_or_else(|| anyhow!("token verification failed"))?;

    println!("subject:    {}", session.username);
    println!("user id:    {}", session.user_id);
    println!("role:       {}", session.role);
    println!("issued at:  {}", format_timestamp(session.issued_at));
    println!("expires at: {}", format_timestamp(session.expires_at));
    Ok(())
}

fn format_timestamp(secs: u64) -> String {
    chrono::DateTime::from_timestamp(secs as i64, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_secret_from_file_trims_newline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "super-secret\n").unwrap();

        let secret = load_secret(file.path().to_str()).unwrap();
        assert_eq!(secret, b"super-secret");
    }

    #[test]
    fn test_load_secret_rejects_empty_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\n").unwrap();

        assert!(load_secret(file.path().to_str()).is_err());
    }

    #[test]
    fn test_open_store_rejects_unknown_kind() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_store("bogus", dir.path()).is_err());
    }

    #[test]
    fn test_open_store_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store("file", dir.path()).unwrap();
        assert!(!store.exists("alice").unwrap());
    }

    #[test]
    fn test_format_timestamp_is_rfc3339() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00+00:00");
    }
}
