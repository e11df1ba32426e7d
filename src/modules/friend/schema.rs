use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

pub const FRIENDS_PAIR_KEY: &str = "friends_pair_key";
pub const FRIENDS_NOT_SELF: &str = "friends_not_self";
pub const FRIEND_REQUESTS_PAIR_KEY: &str = "friend_requests_pair_key";
pub const FRIEND_REQUESTS_NOT_SELF: &str = "friend_requests_not_self";

/// A realized friendship. Stored once, read symmetrically: `from_profile_id`
/// is the profile that accepted, `to_profile_id` the one that asked.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FriendEntity {
    pub from_profile_id: Uuid,
    pub to_profile_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl FriendEntity {
    pub fn involves(&self, profile_id: &Uuid) -> bool {
        self.from_profile_id == *profile_id || self.to_profile_id == *profile_id
    }

    pub fn joins(&self, a: &Uuid, b: &Uuid) -> bool {
        (self.from_profile_id == *a && self.to_profile_id == *b)
            || (self.from_profile_id == *b && self.to_profile_id == *a)
    }

    /// The other side of the edge as seen from `profile_id`.
    pub fn other(&self, profile_id: &Uuid) -> Uuid {
        if self.from_profile_id == *profile_id {
            self.to_profile_id
        } else {
            self.from_profile_id
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FriendRequestEntity {
    pub id: Uuid,
    pub from_profile_id: Uuid,
    pub to_profile_id: Uuid,
    pub message: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub rejected_at: Option<chrono::DateTime<chrono::Utc>>,
    pub viewed_at: Option<chrono::DateTime<chrono::Utc>>,
}
