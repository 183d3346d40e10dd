//! User types

use serde::{Deserialize, Serialize};

/// A registered user account.
///
/// `password` is an opaque, pre-hashed string; the data-access layer never
/// hashes or verifies credentials. Emails are stored lowercased so lookups
/// are case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// User creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}
