use chrono::naive::NaiveDateTime;
use uuid::Uuid;

/// A portal account
///
/// Accounts are created through registration and are never edited or deleted
/// afterwards. The `session_id` is rotated on logout to invalidate any
/// outstanding access tokens.
#[derive(Clone, Debug)]
pub struct User {
    pub id: Uuid,
    pub session_id: Uuid,
    pub username: String,
    pub hashed_password: String,
    pub created_at: NaiveDateTime,
}
