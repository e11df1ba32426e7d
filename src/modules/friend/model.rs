use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::friend::schema::{FriendEntity, FriendRequestEntity};

/// Which slice of a profile's friendship requests to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestFilter {
    #[default]
    Unread,
    Unrejected,
    Read,
    Rejected,
    Sent,
}

impl RequestFilter {
    /// SQL predicate over `friend_requests`, with the profile bound as `$1`.
    pub fn predicate(self) -> &'static str {
        match self {
            RequestFilter::Unread => {
                "to_profile_id = $1 AND viewed_at IS NULL AND rejected_at IS NULL"
            }
            RequestFilter::Unrejected => "to_profile_id = $1 AND rejected_at IS NULL",
            RequestFilter::Read => "to_profile_id = $1 AND viewed_at IS NOT NULL",
            RequestFilter::Rejected => "to_profile_id = $1 AND rejected_at IS NOT NULL",
            RequestFilter::Sent => "from_profile_id = $1",
        }
    }

    pub fn matches(self, request: &FriendRequestEntity, profile_id: &Uuid) -> bool {
        let received = request.to_profile_id == *profile_id;
        match self {
            RequestFilter::Unread => {
                received && request.viewed_at.is_none() && request.rejected_at.is_none()
            }
            RequestFilter::Unrejected => received && request.rejected_at.is_none(),
            RequestFilter::Read => received && request.viewed_at.is_some(),
            RequestFilter::Rejected => received && request.rejected_at.is_some(),
            RequestFilter::Sent => request.from_profile_id == *profile_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct RequestListQuery {
    #[serde(default)]
    pub status: RequestFilter,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FriendRequestBody {
    #[validate(length(max = 1000, message = "Message cannot exceed 1000 characters"))]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendResponse {
    pub profile_id: Uuid,
    pub since: chrono::DateTime<chrono::Utc>,
}

impl FriendResponse {
    pub fn from_edge(edge: &FriendEntity, viewer: &Uuid) -> Self {
        FriendResponse { profile_id: edge.other(viewer), since: edge.created_at }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestResponse {
    pub id: Uuid,
    pub from_profile_id: Uuid,
    pub to_profile_id: Uuid,
    pub message: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub rejected_at: Option<chrono::DateTime<chrono::Utc>>,
    pub viewed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<FriendRequestEntity> for FriendRequestResponse {
    fn from(entity: FriendRequestEntity) -> Self {
        FriendRequestResponse {
            id: entity.id,
            from_profile_id: entity.from_profile_id,
            to_profile_id: entity.to_profile_id,
            message: entity.message,
            created_at: entity.created_at,
            rejected_at: entity.rejected_at,
            viewed_at: entity.viewed_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipStatusResponse {
    pub are_friends: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RequestCountResponse {
    pub unread: i64,
    pub unrejected: i64,
}
