//! Session token issuance and verification
//!
//! Stateless bearer tokens: HMAC-SHA-256 signed JWTs carrying the user id,
//! username and role at issuance. The signing secret is process-wide
//! configuration, shared by every instance that needs to verify tokens.
//! Tokens are not persisted and cannot be revoked; they lapse at expiry.

use crate::{AuthError, Result, Role};
use jwt_simple::prelude::*;
use serde::{Deserialize, Serialize};

/// Default validity window for issued tokens: 24 hours
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Custom claims carried in every session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

/// Verified session decoded from a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    /// Role at issuance time; role changes take effect at next login
    pub role: Role,
    /// Seconds since the Unix epoch
    pub issued_at: u64,
    pub expires_at: u64,
}

/// Identity projection of a verified session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

/// Issues and verifies session tokens with a shared symmetric secret
pub struct TokenService {
    key: HS256Key,
    ttl_secs: u64,
}

impl TokenService {
    /// Create a service from the shared secret, with the default 24 h window
    pub fn new(secret: &[u8]) -> Result<Self> {
        Self::with_ttl(secret, DEFAULT_TOKEN_TTL_SECS)
    }

    /// Create a service with an explicit validity window in seconds
    pub fn with_ttl(secret: &[u8], ttl_secs: u64) -> Result<Self> {
        if secret.is_empty() {
            return Err(AuthError::InvalidInput(
                "signing secret must not be empty".to_string(),
            ));
        }
        Ok(TokenService {
            key: HS256Key::from_bytes(secret),
            ttl_secs,
        })
    }

    /// Issue a signed token for an authenticated user
    pub fn issue(&self, user_id: i64, username: &str, role: Role) -> Result<String> {
        let custom = SessionClaims {
            user_id,
            username: username.to_string(),
            role,
        };
        let claims = Claims::with_custom_claims(custom, Duration::from_secs(self.ttl_secs))
            .with_subject(username);

        self.key
            .authenticate(claims)
            .map_err(|e| AuthError::InvalidInput(format!("token signing failed: {}", e)))
    }

    /// Verify a token and decode its claims.
    ///
    /// Returns `None` for a bad signature, an expired token, or malformed
    /// encoding alike; tampered and stale tokens are a routine case, not an
    /// error. Expiry is checked with zero tolerance.
    pub fn verify(&self, token: &str) -> Option<Session> {
        let mut options = VerificationOptions::default();
        options.time_tolerance = Some(Duration::from_secs(0));

        let claims = self
            .key
            .verify_token::<SessionClaims>(token, Some(options))
            .ok()?;

        let issued_at = claims.issued_at?.as_secs();
        let expires_at = claims.expires_at?.as_secs();

        Some(Session {
            user_id: claims.custom.user_id,
            username: claims.custom.username,
            role: claims.custom.role,
            issued_at,
            expires_at,
        })
    }

    /// Thin projection over [`Self::verify`] to the identity fields
    pub fn session_user(&self, token: &str) -> Option<SessionUser> {
        self.verify(token).map(|session| SessionUser {
            user_id: session.user_id,
            username: session.username,
            role: session.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key";

    #[test]
    fn test_issue_verify_roundtrip() {
        let tokens = TokenService::new(SECRET).unwrap();
        let token = tokens.issue(1, "alice", Role::Admin).unwrap();

        let session = tokens.verify(&token).unwrap();
        assert_eq!(session.user_id, 1);
        assert_eq!(session.username, "alice");
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.expires_at - session.issued_at, DEFAULT_TOKEN_TTL_SECS);
    }

    #[test]
    fn test_session_user_projection() {
        let tokens = TokenService::new(SECRET).unwrap();
        let token = tokens.issue(7, "bob_2", Role::Analyst).unwrap();

        let user = tokens.session_user(&token).unwrap();
        assert_eq!(user.user_id, 7);
        assert_eq!(user.username, "bob_2");
        assert_eq!(user.role, Role::Analyst);
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let tokens = TokenService::new(SECRET).unwrap();
        let token = tokens.issue(1, "alice", Role::Admin).unwrap();

        // Flip the first character of the signature segment
        let (head, sig) = token.rsplit_once('.').unwrap();
        let flipped = if sig.as_bytes()[0] == b'A' { "B" } else { "A" };
        let tampered = format!("{}.{}{}", head, flipped, &sig[1..]);

        assert!(tokens.verify(&tampered).is_none());
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = TokenService::new(SECRET).unwrap();

        // Sign claims whose window closed an hour ago
        let custom = SessionClaims {
            user_id: 1,
            username: "alice".to_string(),
            role: Role::User,
        };
        let mut claims = Claims::with_custom_claims(custom, Duration::from_secs(60));
        let now = Clock::now_since_epoch();
        claims.issued_at = Some(now - Duration::from_secs(7200));
        claims.expires_at = Some(now - Duration::from_secs(3600));
        let token = tokens.key.authenticate(claims).unwrap();

        assert!(tokens.verify(&token).is_none());
        assert!(tokens.session_user(&token).is_none());
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let tokens = TokenService::new(SECRET).unwrap();

        assert!(tokens.verify("").is_none());
        assert!(tokens.verify("garbage").is_none());
        assert!(tokens.verify("a.b.c").is_none());
        assert!(tokens.verify("eyJhbGciOiJIUzI1NiJ9..").is_none());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let tokens = TokenService::new(SECRET).unwrap();
        let other = TokenService::new(b"some-other-secret").unwrap();

        let token = tokens.issue(1, "alice", Role::User).unwrap();
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn test_shared_secret_verifies_across_instances() {
        // Two instances configured with the same secret accept each other's
        // tokens
        let issuer = TokenService::new(SECRET).unwrap();
        let verifier = TokenService::new(SECRET).unwrap();

        let token = issuer.issue(3, "carol", Role::Analyst).unwrap();
        assert_eq!(verifier.verify(&token).unwrap().username, "carol");
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            TokenService::new(b""),
            Err(AuthError::InvalidInput(_))
        ));
    }
}
