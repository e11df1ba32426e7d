use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error::{self, RelationKind},
    modules::follow::{
        repository::FollowRepository,
        schema::{FollowEntity, FOLLOWS_NOT_SELF, FOLLOWS_PAIR_KEY},
    },
};

#[derive(Clone)]
pub struct FollowService {
    follow_repo: Arc<dyn FollowRepository + Send + Sync>,
}

impl FollowService {
    pub fn with_dependencies(follow_repo: Arc<dyn FollowRepository + Send + Sync>) -> Self {
        log::info!("FollowService initialized with dependencies");
        FollowService { follow_repo }
    }

    /// Makes `follower_id` follow `followee_id`.
    pub async fn add_follower(
        &self,
        follower_id: Uuid,
        followee_id: Uuid,
    ) -> Result<FollowEntity, error::SystemError> {
        if follower_id == followee_id {
            return Err(error::SystemError::SelfRelation(RelationKind::Follow));
        }

        let follow =
            self.follow_repo.create_follow(&follower_id, &followee_id).await.map_err(|e| {
                if e.violates(FOLLOWS_PAIR_KEY) {
                    error::SystemError::AlreadyExists(RelationKind::Follow)
                } else if e.violates(FOLLOWS_NOT_SELF) {
                    error::SystemError::SelfRelation(RelationKind::Follow)
                } else {
                    e
                }
            })?;

        tracing::info!("{} now follows {}", follower_id, followee_id);
        Ok(follow)
    }

    /// Returns whether an edge was removed.
    pub async fn remove_follower(
        &self,
        follower_id: Uuid,
        followee_id: Uuid,
    ) -> Result<bool, error::SystemError> {
        let removed = self.follow_repo.delete_follow(&follower_id, &followee_id).await?;
        if removed {
            tracing::info!("{} no longer follows {}", follower_id, followee_id);
        }
        Ok(removed)
    }

    #[allow(dead_code)]
    pub async fn follows(
        &self,
        follower_id: Uuid,
        followee_id: Uuid,
    ) -> Result<bool, error::SystemError> {
        Ok(self.follow_repo.find_follow(&follower_id, &followee_id).await?.is_some())
    }

    #[allow(dead_code)]
    pub async fn followers(&self, profile_id: Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        let edges = self.follow_repo.find_followers(&profile_id).await?;
        Ok(edges.into_iter().map(|edge| edge.follower_id).collect())
    }

    #[allow(dead_code)]
    pub async fn following(&self, profile_id: Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        let edges = self.follow_repo.find_following(&profile_id).await?;
        Ok(edges.into_iter().map(|edge| edge.followee_id).collect())
    }

    pub async fn follower_edges(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<FollowEntity>, error::SystemError> {
        self.follow_repo.find_followers(&profile_id).await
    }

    pub async fn following_edges(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<FollowEntity>, error::SystemError> {
        self.follow_repo.find_following(&profile_id).await
    }

    pub async fn follower_count(&self, profile_id: Uuid) -> Result<i64, error::SystemError> {
        self.follow_repo.count_followers(&profile_id).await
    }

    pub async fn following_count(&self, profile_id: Uuid) -> Result<i64, error::SystemError> {
        self.follow_repo.count_following(&profile_id).await
    }

    /// `(followers, following)`.
    pub async fn counts(&self, profile_id: Uuid) -> Result<(i64, i64), error::SystemError> {
        tokio::try_join!(self.follower_count(profile_id), self.following_count(profile_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::follow::repository_memory::FollowRepositoryMemory;
    use crate::test::{BOB, STEVE, SUSAN};
    use futures_util::future::join;

    fn service() -> FollowService {
        FollowService::with_dependencies(Arc::new(FollowRepositoryMemory::new()))
    }

    #[actix_web::test]
    async fn test_follow_lifecycle() {
        let follows = service();

        let edge = follows.add_follower(BOB, STEVE).await.unwrap();
        assert_eq!(edge.follower_id, BOB);
        assert_eq!(edge.followee_id, STEVE);

        assert!(follows.follows(BOB, STEVE).await.unwrap());
        assert!(!follows.follows(STEVE, BOB).await.unwrap());
        assert_eq!(follows.followers(STEVE).await.unwrap(), vec![BOB]);
        assert_eq!(follows.following(BOB).await.unwrap(), vec![STEVE]);
        assert!(follows.followers(BOB).await.unwrap().is_empty());
        assert!(follows.following(STEVE).await.unwrap().is_empty());

        assert!(follows.remove_follower(BOB, STEVE).await.unwrap());
        assert!(!follows.follows(BOB, STEVE).await.unwrap());
        assert!(!follows.remove_follower(BOB, STEVE).await.unwrap());
    }

    #[actix_web::test]
    async fn test_follow_is_directed() {
        let follows = service();
        follows.add_follower(BOB, STEVE).await.unwrap();
        follows.add_follower(STEVE, BOB).await.unwrap();

        assert!(follows.remove_follower(STEVE, BOB).await.unwrap());
        assert!(follows.follows(BOB, STEVE).await.unwrap());
    }

    #[actix_web::test]
    async fn test_duplicate_follow_refused() {
        let follows = service();
        follows.add_follower(BOB, STEVE).await.unwrap();

        let err = follows.add_follower(BOB, STEVE).await.unwrap_err();
        assert!(matches!(err, error::SystemError::AlreadyExists(RelationKind::Follow)));
    }

    #[actix_web::test]
    async fn test_self_follow_refused() {
        let follows = service();

        let err = follows.add_follower(SUSAN, SUSAN).await.unwrap_err();
        assert!(matches!(err, error::SystemError::SelfRelation(RelationKind::Follow)));
        assert!(!follows.remove_follower(SUSAN, SUSAN).await.unwrap());
    }

    #[actix_web::test]
    async fn test_joined_follows_for_same_pair() {
        let follows = service();

        let (first, second) =
            join(follows.add_follower(BOB, SUSAN), follows.add_follower(BOB, SUSAN)).await;

        assert!(first.is_ok() != second.is_ok());
        assert_eq!(follows.follower_count(SUSAN).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_counts() {
        let follows = service();
        follows.add_follower(BOB, SUSAN).await.unwrap();
        follows.add_follower(STEVE, SUSAN).await.unwrap();
        follows.add_follower(SUSAN, BOB).await.unwrap();

        assert_eq!(follows.counts(SUSAN).await.unwrap(), (2, 1));
        assert_eq!(follows.counts(STEVE).await.unwrap(), (0, 1));
        assert_eq!(follows.follower_edges(SUSAN).await.unwrap().len(), 2);
        assert_eq!(follows.following_edges(BOB).await.unwrap().len(), 1);
    }
}
