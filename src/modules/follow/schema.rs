use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

pub const FOLLOWS_PAIR_KEY: &str = "follows_pair_key";
pub const FOLLOWS_NOT_SELF: &str = "follows_not_self";

/// A directed follow edge. `follower_id` follows `followee_id`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FollowEntity {
    pub follower_id: Uuid,
    pub followee_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
