use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::follow::schema::FollowEntity;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct FollowListQuery {
    pub following: Option<String>,
}

impl FollowListQuery {
    /// A bare `?following` (or any value but `false`/`0`) lists who the
    /// profile follows instead of who follows it.
    pub fn lists_following(&self) -> bool {
        self.following.as_deref().is_some_and(|v| !matches!(v, "false" | "0"))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub follower_id: Uuid,
    pub followee_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<FollowEntity> for FollowResponse {
    fn from(entity: FollowEntity) -> Self {
        FollowResponse {
            follower_id: entity.follower_id,
            followee_id: entity.followee_id,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FollowCountResponse {
    pub followers: i64,
    pub following: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(following: Option<&str>) -> FollowListQuery {
        FollowListQuery { following: following.map(str::to_string) }
    }

    #[test]
    fn test_following_flag_is_presence() {
        assert!(!query(None).lists_following());
        assert!(query(Some("")).lists_following());
        assert!(query(Some("1")).lists_following());
        assert!(query(Some("true")).lists_following());
        assert!(!query(Some("false")).lists_following());
        assert!(!query(Some("0")).lists_following());
    }
}
