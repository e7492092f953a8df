use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// An account as seen by the rest of the system. The credential hash never
/// leaves the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub is_admin: bool,
    pub created_at: String, // ISO 8601 string for simplicity
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}
