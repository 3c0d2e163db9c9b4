//! Row-to-entity decoding for the SQL repositories

use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::domain::auth_token::AuthToken;
use crate::domain::item::Item;
use crate::domain::user::User;

impl FromRow<'_, PgRow> for User {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(User::from_storage(
            row.try_get("id")?,
            row.try_get::<String, _>("username")?,
            row.try_get::<String, _>("email")?,
            row.try_get::<String, _>("password_hash")?,
        ))
    }
}

impl FromRow<'_, PgRow> for Item {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Item::with_id(
            row.try_get("id")?,
            row.try_get::<String, _>("name")?,
            row.try_get::<String, _>("description")?,
            row.try_get("price")?,
        ))
    }
}

impl FromRow<'_, PgRow> for AuthToken {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(AuthToken::from_storage(
            row.try_get("id")?,
            row.try_get("emission_date")?,
            row.try_get("expiration_date")?,
            row.try_get("user_id")?,
        ))
    }
}
