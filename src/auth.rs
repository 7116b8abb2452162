use crate::error::AuthError;

struct Credential {
    username: String,
    password: String,
}

/// In-memory login/registration for the interactive shell
///
/// Plaintext, process-local, and not a credential system: registrations
/// vanish on exit and nothing is hashed or issued.
pub struct CredentialStore {
    users: Vec<Credential>,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self {
            users: vec![Credential {
                username: "user".to_string(),
                password: "password".to_string(),
            }],
        }
    }
}

impl CredentialStore {
    pub fn login(&self, username: &str, password: &str) -> bool {
        self.users
            .iter()
            .any(|u| u.username == username && u.password == password)
    }

    pub fn register(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::EmptyCredentials);
        }
        if self.users.iter().any(|u| u.username == username) {
            return Err(AuthError::UsernameTaken(username.to_string()));
        }

        self.users.push(Credential {
            username: username.to_string(),
            password: password.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_user_can_log_in() {
        let store = CredentialStore::default();

        assert!(store.login("user", "password"));
        assert!(!store.login("user", "wrong"));
        assert!(!store.login("nobody", "password"));
    }

    #[test]
    fn test_register_then_login() {
        let mut store = CredentialStore::default();

        store.register("alice", "s3cret").unwrap();

        assert!(store.login("alice", "s3cret"));
    }

    #[test]
    fn test_register_rejects_taken_username() {
        let mut store = CredentialStore::default();

        assert_eq!(
            store.register("user", "other"),
            Err(AuthError::UsernameTaken("user".to_string()))
        );
        assert!(store.login("user", "password"));
    }

    #[test]
    fn test_register_requires_both_fields() {
        let mut store = CredentialStore::default();

        assert_eq!(store.register("", "x"), Err(AuthError::EmptyCredentials));
        assert_eq!(store.register("bob", ""), Err(AuthError::EmptyCredentials));
    }
}
