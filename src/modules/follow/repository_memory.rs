use std::sync::Mutex;

use uuid::Uuid;

use crate::{
    api::error,
    modules::follow::{
        repository::FollowRepository,
        schema::{FollowEntity, FOLLOWS_NOT_SELF, FOLLOWS_PAIR_KEY},
    },
    utils::lock,
};

#[derive(Default)]
pub struct FollowRepositoryMemory {
    follows: Mutex<Vec<FollowEntity>>,
}

impl FollowRepositoryMemory {
    pub fn new() -> Self {
        Self::default()
    }

    fn select(
        &self,
        pick: impl Fn(&FollowEntity) -> bool,
    ) -> Result<Vec<FollowEntity>, error::SystemError> {
        let follows = lock(&self.follows)?;
        Ok(follows.iter().filter(|f| pick(f)).cloned().collect())
    }
}

#[async_trait::async_trait]
impl FollowRepository for FollowRepositoryMemory {
    async fn find_follow(
        &self,
        follower_id: &Uuid,
        followee_id: &Uuid,
    ) -> Result<Option<FollowEntity>, error::SystemError> {
        let follows = lock(&self.follows)?;
        Ok(follows
            .iter()
            .find(|f| f.follower_id == *follower_id && f.followee_id == *followee_id)
            .cloned())
    }

    async fn find_followers(
        &self,
        profile_id: &Uuid,
    ) -> Result<Vec<FollowEntity>, error::SystemError> {
        self.select(|f| f.followee_id == *profile_id)
    }

    async fn find_following(
        &self,
        profile_id: &Uuid,
    ) -> Result<Vec<FollowEntity>, error::SystemError> {
        self.select(|f| f.follower_id == *profile_id)
    }

    async fn count_followers(&self, profile_id: &Uuid) -> Result<i64, error::SystemError> {
        let follows = lock(&self.follows)?;
        Ok(follows.iter().filter(|f| f.followee_id == *profile_id).count() as i64)
    }

    async fn count_following(&self, profile_id: &Uuid) -> Result<i64, error::SystemError> {
        let follows = lock(&self.follows)?;
        Ok(follows.iter().filter(|f| f.follower_id == *profile_id).count() as i64)
    }

    async fn create_follow(
        &self,
        follower_id: &Uuid,
        followee_id: &Uuid,
    ) -> Result<FollowEntity, error::SystemError> {
        let mut follows = lock(&self.follows)?;
        if follower_id == followee_id {
            return Err(error::SystemError::check_violation(FOLLOWS_NOT_SELF));
        }
        if follows.iter().any(|f| f.follower_id == *follower_id && f.followee_id == *followee_id) {
            return Err(error::SystemError::unique_violation(FOLLOWS_PAIR_KEY));
        }

        let follow = FollowEntity {
            follower_id: *follower_id,
            followee_id: *followee_id,
            created_at: chrono::Utc::now(),
        };
        follows.push(follow.clone());
        Ok(follow)
    }

    async fn delete_follow(
        &self,
        follower_id: &Uuid,
        followee_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let mut follows = lock(&self.follows)?;
        let before = follows.len();
        follows.retain(|f| !(f.follower_id == *follower_id && f.followee_id == *followee_id));
        Ok(follows.len() < before)
    }
}
