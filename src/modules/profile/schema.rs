use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

pub const PROFILES_USERNAME_KEY: &str = "profiles_username_key";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
