//! Auth token entity

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::repository::{Entity, FieldValue};

/// Lifetime of an auth token record, counted from its emission date.
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// A record of a token emission for a user.
///
/// The JWT itself is not stored; this row only tracks when a token was
/// issued and when it lapses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    id: Option<i32>,
    emission_date: DateTime<Utc>,
    expiration_date: DateTime<Utc>,
    user_id: i32,
}

impl AuthToken {
    /// Issue a token record for a user, expiring one hour from now.
    pub fn issue(user_id: i32) -> Self {
        let emission_date = Utc::now();
        Self {
            id: None,
            emission_date,
            expiration_date: emission_date + Duration::seconds(TOKEN_LIFETIME_SECS),
            user_id,
        }
    }

    /// Rebuild a persisted token record from storage columns.
    pub fn from_storage(
        id: i32,
        emission_date: DateTime<Utc>,
        expiration_date: DateTime<Utc>,
        user_id: i32,
    ) -> Self {
        Self {
            id: Some(id),
            emission_date,
            expiration_date,
            user_id,
        }
    }

    pub fn emission_date(&self) -> DateTime<Utc> {
        self.emission_date
    }

    pub fn expiration_date(&self) -> DateTime<Utc> {
        self.expiration_date
    }

    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    pub fn is_expired(&self, at: DateTime<Utc>) -> bool {
        at >= self.expiration_date
    }

    pub(crate) fn assign_id(&mut self, id: i32) {
        self.id = Some(id);
    }
}

impl Entity for AuthToken {
    const TABLE: &'static str = "auth_tokens";
    const COLUMNS: &'static [&'static str] =
        &["id", "emission_date", "expiration_date", "user_id"];

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "id" => self.id.map(FieldValue::Int),
            "emission_date" => Some(FieldValue::Timestamp(self.emission_date)),
            "expiration_date" => Some(FieldValue::Timestamp(self.expiration_date)),
            "user_id" => Some(FieldValue::Int(self.user_id)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_sets_one_hour_lifetime() {
        let token = AuthToken::issue(4);

        assert_eq!(token.id(), None);
        assert_eq!(token.user_id(), 4);
        assert_eq!(
            token.expiration_date() - token.emission_date(),
            Duration::seconds(TOKEN_LIFETIME_SECS)
        );
    }

    #[test]
    fn test_expiry_check() {
        let token = AuthToken::issue(1);

        assert!(!token.is_expired(token.emission_date()));
        assert!(token.is_expired(token.expiration_date()));
        assert!(token.is_expired(token.expiration_date() + Duration::seconds(1)));
    }
}
