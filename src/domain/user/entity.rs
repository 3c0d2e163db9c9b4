//! User entity

use serde::{Deserialize, Serialize};

use crate::domain::repository::{Entity, FieldValue};

/// Registered account. Owns auth tokens and transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Storage-assigned identity; `None` until saved.
    id: Option<i32>,
    /// Unique login name
    username: String,
    /// Unique email address
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
}

impl User {
    /// Create a new, not-yet-persisted user.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Rebuild a persisted user from storage columns.
    pub fn from_storage(
        id: i32,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
    }

    pub(crate) fn assign_id(&mut self, id: i32) {
        self.id = Some(id);
    }
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["id", "username", "email", "password_hash"];

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "id" => self.id.map(FieldValue::Int),
            "username" => Some(FieldValue::Text(self.username.clone())),
            "email" => Some(FieldValue::Text(self.email.clone())),
            "password_hash" => Some(FieldValue::Text(self.password_hash.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_has_no_id() {
        let user = User::new("alice", "alice@example.com", "$argon2$hash");

        assert_eq!(user.id(), None);
        assert_eq!(user.username(), "alice");
        assert_eq!(user.email(), "alice@example.com");
    }

    #[test]
    fn test_from_storage_restores_id() {
        let user = User::from_storage(3, "bob", "bob@example.com", "hash");
        assert_eq!(user.id(), Some(3));
    }

    #[test]
    fn test_serialization_excludes_password_hash() {
        let user = User::from_storage(1, "alice", "alice@example.com", "secret-hash");

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_field_access() {
        let user = User::from_storage(1, "alice", "alice@example.com", "hash");

        assert_eq!(user.field("id"), Some(FieldValue::Int(1)));
        assert_eq!(
            user.field("email"),
            Some(FieldValue::Text("alice@example.com".into()))
        );
        assert_eq!(user.field("nope"), None);
    }
}
