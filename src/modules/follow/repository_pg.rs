use uuid::Uuid;

use crate::{
    api::error,
    modules::follow::{repository::FollowRepository, schema::FollowEntity},
};

#[derive(Clone)]
pub struct FollowRepositoryPg {
    pool: sqlx::PgPool,
}

impl FollowRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FollowRepository for FollowRepositoryPg {
    async fn find_follow(
        &self,
        follower_id: &Uuid,
        followee_id: &Uuid,
    ) -> Result<Option<FollowEntity>, error::SystemError> {
        let follow = sqlx::query_as::<_, FollowEntity>(
            "SELECT * FROM follows WHERE follower_id = $1 AND followee_id = $2",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(follow)
    }

    async fn find_followers(
        &self,
        profile_id: &Uuid,
    ) -> Result<Vec<FollowEntity>, error::SystemError> {
        let follows = sqlx::query_as::<_, FollowEntity>(
            "SELECT * FROM follows WHERE followee_id = $1 ORDER BY created_at",
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(follows)
    }

    async fn find_following(
        &self,
        profile_id: &Uuid,
    ) -> Result<Vec<FollowEntity>, error::SystemError> {
        let follows = sqlx::query_as::<_, FollowEntity>(
            "SELECT * FROM follows WHERE follower_id = $1 ORDER BY created_at",
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(follows)
    }

    async fn count_followers(&self, profile_id: &Uuid) -> Result<i64, error::SystemError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE followee_id = $1")
                .bind(profile_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn count_following(&self, profile_id: &Uuid) -> Result<i64, error::SystemError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
                .bind(profile_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn create_follow(
        &self,
        follower_id: &Uuid,
        followee_id: &Uuid,
    ) -> Result<FollowEntity, error::SystemError> {
        let follow = sqlx::query_as::<_, FollowEntity>(
            "INSERT INTO follows (follower_id, followee_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(follow)
    }

    async fn delete_follow(
        &self,
        follower_id: &Uuid,
        followee_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
            .bind(follower_id)
            .bind(followee_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures_util::future::join;

    use super::*;
    use crate::{
        api::error::RelationKind,
        modules::follow::{schema::FOLLOWS_NOT_SELF, service::FollowService},
        test::{database, provision_pg_profiles},
    };

    #[actix_web::test]
    async fn test_pg_follow_lifecycle() {
        let Some(pool) = database().await else { return };
        let repo = FollowRepositoryPg::new(pool.clone());
        let follows = FollowService::with_dependencies(Arc::new(repo.clone()));
        let [a, b] = provision_pg_profiles(&pool).await;

        let err = repo.create_follow(&a, &a).await.unwrap_err();
        assert!(err.violates(FOLLOWS_NOT_SELF));

        follows.add_follower(a, b).await.unwrap();
        let err = follows.add_follower(a, b).await.unwrap_err();
        assert!(matches!(err, error::SystemError::AlreadyExists(RelationKind::Follow)));

        assert!(follows.follows(a, b).await.unwrap());
        assert_eq!(follows.followers(b).await.unwrap(), vec![a]);
        assert_eq!(follows.counts(a).await.unwrap(), (0, 1));

        assert!(follows.remove_follower(a, b).await.unwrap());
        assert!(!follows.remove_follower(a, b).await.unwrap());
    }

    #[actix_web::test]
    async fn test_pg_concurrent_follows_for_same_pair() {
        let Some(pool) = database().await else { return };
        let follows =
            FollowService::with_dependencies(Arc::new(FollowRepositoryPg::new(pool.clone())));

        for _ in 0..10 {
            let [a, b] = provision_pg_profiles(&pool).await;
            let (first, second) =
                join(follows.add_follower(a, b), follows.add_follower(a, b)).await;

            assert!(first.is_ok() != second.is_ok());
            let loser = if first.is_ok() { second } else { first };
            assert!(matches!(loser, Err(error::SystemError::AlreadyExists(RelationKind::Follow))));
            assert_eq!(follows.follower_count(b).await.unwrap(), 1);
        }
    }
}
