use uuid::Uuid;

use crate::api::error;
use crate::modules::follow::schema::FollowEntity;

#[async_trait::async_trait]
pub trait FollowRepository {
    #[allow(dead_code)]
    async fn find_follow(
        &self,
        follower_id: &Uuid,
        followee_id: &Uuid,
    ) -> Result<Option<FollowEntity>, error::SystemError>;

    /// Edges pointing at the profile, oldest first.
    async fn find_followers(
        &self,
        profile_id: &Uuid,
    ) -> Result<Vec<FollowEntity>, error::SystemError>;

    /// Edges leaving the profile, oldest first.
    async fn find_following(
        &self,
        profile_id: &Uuid,
    ) -> Result<Vec<FollowEntity>, error::SystemError>;

    async fn count_followers(&self, profile_id: &Uuid) -> Result<i64, error::SystemError>;

    async fn count_following(&self, profile_id: &Uuid) -> Result<i64, error::SystemError>;

    /// Fails with a `follows_pair_key` conflict when the edge already exists.
    async fn create_follow(
        &self,
        follower_id: &Uuid,
        followee_id: &Uuid,
    ) -> Result<FollowEntity, error::SystemError>;

    async fn delete_follow(
        &self,
        follower_id: &Uuid,
        followee_id: &Uuid,
    ) -> Result<bool, error::SystemError>;
}
