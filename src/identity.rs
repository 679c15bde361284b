//! Static credential lookup gating entry into a session
//!
//! This is a placeholder gate, not a security boundary: plain-text
//! passwords, exact comparison, no lockout.

use std::collections::HashMap;

/// Built-in demo accounts
const DEMO_USERS: &[(&str, &str)] = &[("admin", "admin"), ("user", "password")];

/// Fixed mapping of username to password
#[derive(Debug, Clone)]
pub struct IdentityStore {
    users: HashMap<String, String>,
}

impl IdentityStore {
    /// Store populated with the demo accounts
    pub fn demo() -> Self {
        Self::from_pairs(DEMO_USERS.iter().copied())
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            users: pairs
                .into_iter()
                .map(|(user, pass)| (user.to_string(), pass.to_string()))
                .collect(),
        }
    }

    /// True only when `username` exists and its password matches exactly
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|stored| stored == password)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl Default for IdentityStore {
    fn default() -> Self {
        Self::demo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_demo_accounts_authenticate() {
        let store = IdentityStore::demo();
        for (user, pass) in DEMO_USERS {
            assert!(store.authenticate(user, pass), "{user} should authenticate");
        }
    }

    #[test]
    fn test_wrong_password_and_unknown_user_fail() {
        let store = IdentityStore::demo();
        assert!(!store.authenticate("admin", "password"));
        assert!(!store.authenticate("admin", "Admin"));
        assert!(!store.authenticate("root", "admin"));
        assert!(!store.authenticate("", ""));
    }

    proptest! {
        #[test]
        fn prop_only_exact_pairs_authenticate(user in "[a-z]{0,8}", pass in "[a-z]{0,8}") {
            let store = IdentityStore::demo();
            let expected = DEMO_USERS.iter().any(|(u, p)| *u == user && *p == pass);
            prop_assert_eq!(store.authenticate(&user, &pass), expected);
        }
    }
}
