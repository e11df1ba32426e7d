use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::profile::schema::ProfileEntity;

#[derive(Deserialize, Validate)]
pub struct ProvisionProfileModel {
    #[validate(length(min = 3, max = 150, message = "Username must be 3 to 150 characters long"))]
    pub username: String,
}

#[derive(Deserialize, Validate)]
pub struct UsernameQuery {
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProfileEntity> for ProfileResponse {
    fn from(entity: ProfileEntity) -> Self {
        ProfileResponse { id: entity.id, username: entity.username, created_at: entity.created_at }
    }
}
