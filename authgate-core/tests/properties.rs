//! Property-based tests for authgate core

use authgate_core::*;
use proptest::prelude::*;

/// Passwords satisfying the registration policy: 6-50 chars, at least one
/// letter and one digit
fn valid_password() -> impl Strategy<Value = String> {
    ("[a-zA-Z]{1,10}", "[0-9]{1,10}", "[a-zA-Z0-9]{4,30}")
        .prop_map(|(letters, digits, rest)| format!("{}{}{}", letters, digits, rest))
}

proptest! {
    // bcrypt is deliberately slow; a handful of cases at minimum cost is
    // plenty for the salt/verify properties
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn props_verify_accepts_own_hash(password in valid_password()) {
        let hasher = PasswordHasher::with_cost(4);

        let h1 = hasher.hash(&password).unwrap();
        let h2 = hasher.hash(&password).unwrap();

        // Salt is embedded in the output, so two hashes of the same
        // password differ yet both verify
        prop_assert_ne!(&h1, &h2);
        prop_assert!(hasher.verify(&password, &h1));
        prop_assert!(hasher.verify(&password, &h2));
    }

    #[test]
    fn props_verify_rejects_other_password(
        p1 in valid_password(),
        p2 in valid_password(),
    ) {
        prop_assume!(p1 != p2);
        let hasher = PasswordHasher::with_cost(4);

        let hash = hasher.hash(&p2).unwrap();
        prop_assert!(!hasher.verify(&p1, &hash));
    }
}

proptest! {
    #[test]
    fn props_valid_usernames_accepted(name in "[A-Za-z0-9_]{3,20}") {
        prop_assert!(Username::new(&name).is_ok());
        prop_assert!(validate_username(&name).is_ok());
    }

    #[test]
    fn props_policy_passwords_accepted(password in valid_password()) {
        prop_assert!(validate_password(&password).is_ok());
    }

    #[test]
    fn props_token_roundtrip_preserves_claims(
        user_id in 1i64..1_000_000,
        name in "[A-Za-z0-9_]{3,20}",
    ) {
        let tokens = TokenService::new(b"props-secret").unwrap();
        let token = tokens.issue(user_id, &name, Role::Analyst).unwrap();

        let session = tokens.verify(&token).unwrap();
        prop_assert_eq!(session.user_id, user_id);
        prop_assert_eq!(session.username, name);
        prop_assert_eq!(session.role, Role::Analyst);
        prop_assert!(session.expires_at > session.issued_at);
    }
}
