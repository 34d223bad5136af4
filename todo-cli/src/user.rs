//! Username/password accounts kept in a JSON file.
//!
//! Passwords are stored and compared as plain text.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::storage::{JsonFile, StorageError};

/// Missing fields read back as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub username: String,
    pub password: String,
}

#[derive(Error, Debug)]
pub enum SignupError {
    #[error("Username cannot be empty.")]
    EmptyUsername,
    #[error("User already exists.")]
    UserAlreadyExists,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct UserStore {
    file: JsonFile<User>,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    /// All users, or none if the file is missing or corrupt.
    pub fn load(&self) -> Vec<User> {
        self.file.load()
    }

    pub fn save(&self, users: &[User]) -> Result<(), StorageError> {
        self.file.save(users)
    }

    /// First user with a matching name.
    pub fn find<'a>(users: &'a [User], username: &str) -> Option<&'a User> {
        users.iter().find(|u| u.username == username)
    }

    /// Registers a new user and persists the whole list.
    #[tracing::instrument(skip(self, password))]
    pub fn signup(&self, username: &str, password: &str) -> Result<User, SignupError> {
        if username.trim().is_empty() {
            return Err(SignupError::EmptyUsername);
        }

        let mut users = self.load();
        if Self::find(&users, username).is_some() {
            return Err(SignupError::UserAlreadyExists);
        }

        let user = User {
            username: username.to_string(),
            password: password.to_string(),
        };
        users.push(user.clone());
        self.save(&users)?;
        info!("user registered");
        Ok(user)
    }

    /// The matching user, or `None` for an unknown name or a wrong password.
    #[tracing::instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> Option<User> {
        let users = self.load();
        Self::find(&users, username)
            .filter(|u| u.password == password)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;

    fn store(dir: &TempDir) -> UserStore {
        UserStore::new(dir.child("users.json").path())
    }

    #[test]
    fn load_without_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).load().is_empty());
    }

    #[test]
    fn load_with_invalid_json_is_empty() {
        let dir = TempDir::new().unwrap();
        dir.child("users.json").write_str("[{\"username\":").unwrap();

        assert!(store(&dir).load().is_empty());
    }

    #[test]
    fn partial_records_are_kept_through_signup() {
        let dir = TempDir::new().unwrap();
        dir.child("users.json")
            .write_str(r#"[{"username": "alice", "password": "a"}, {"username": "legacy"}]"#)
            .unwrap();
        let users = store(&dir);

        assert_eq!(users.load().len(), 2);
        assert!(users.login("alice", "a").is_some());

        users.signup("bob", "b").unwrap();

        let names: Vec<String> = users.load().into_iter().map(|u| u.username).collect();
        assert_eq!(names, vec!["alice", "legacy", "bob"]);
        assert!(users.login("alice", "a").is_some());
        assert!(users.login("legacy", "").is_some());
    }

    #[test]
    fn signup_persists_user() {
        let dir = TempDir::new().unwrap();
        let users = store(&dir);

        let user = users.signup("alice", "secret").unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(users.load(), vec![user]);
    }

    #[test]
    fn signup_rejects_empty_username() {
        let dir = TempDir::new().unwrap();
        let users = store(&dir);

        assert!(matches!(users.signup("", "pw"), Err(SignupError::EmptyUsername)));
        assert!(matches!(users.signup("   ", "pw"), Err(SignupError::EmptyUsername)));
        dir.child("users.json").assert(predicates::path::missing());
    }

    #[test]
    fn signup_rejects_duplicate_username() {
        let dir = TempDir::new().unwrap();
        let users = store(&dir);
        users.signup("alice", "one").unwrap();

        let result = users.signup("alice", "two");

        assert!(matches!(result, Err(SignupError::UserAlreadyExists)));
        assert_eq!(users.load().len(), 1);
        assert_eq!(users.load()[0].password, "one");
    }

    #[test]
    fn find_returns_first_match() {
        let list = vec![
            User {
                username: "bob".to_string(),
                password: "1".to_string(),
            },
            User {
                username: "bob".to_string(),
                password: "2".to_string(),
            },
        ];

        assert_eq!(UserStore::find(&list, "bob").map(|u| u.password.as_str()), Some("1"));
        assert_eq!(UserStore::find(&list, "carol"), None);
    }

    #[test]
    fn login_with_correct_password_returns_user() {
        let dir = TempDir::new().unwrap();
        let users = store(&dir);
        users.signup("alice", "secret").unwrap();

        let user = users.login("alice", "secret");

        assert_eq!(user.map(|u| u.username), Some("alice".to_string()));
    }

    #[test]
    fn login_failures_are_indistinguishable() {
        let dir = TempDir::new().unwrap();
        let users = store(&dir);
        users.signup("alice", "secret").unwrap();

        assert_eq!(users.login("alice", "wrong"), None);
        assert_eq!(users.login("mallory", "secret"), None);
    }

    #[test]
    fn save_writes_pretty_json() {
        let dir = TempDir::new().unwrap();
        let users = store(&dir);

        users
            .save(&[User {
                username: "alice".to_string(),
                password: "pw".to_string(),
            }])
            .unwrap();

        dir.child("users.json").assert(
            "[\n  {\n    \"username\": \"alice\",\n    \"password\": \"pw\"\n  }\n]",
        );
    }
}
