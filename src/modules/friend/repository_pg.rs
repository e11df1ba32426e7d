use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{
        model::RequestFilter,
        repository::{FriendRepo, FriendRepository, FriendRequestRepository},
        schema::{FriendEntity, FriendRequestEntity},
    },
};

#[derive(Clone)]
pub struct FriendRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendRepository for FriendRepositoryPg {
    async fn find_friendship(
        &self,
        profile_a: &Uuid,
        profile_b: &Uuid,
    ) -> Result<Option<FriendEntity>, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendEntity>(
            r#"
            SELECT *
            FROM friends
            WHERE
                (from_profile_id = $1 AND to_profile_id = $2)
            OR (from_profile_id = $2 AND to_profile_id = $1)
            "#,
        )
        .bind(profile_a)
        .bind(profile_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn find_friends(
        &self,
        profile_id: &Uuid,
    ) -> Result<Vec<FriendEntity>, error::SystemError> {
        let friends = sqlx::query_as::<_, FriendEntity>(
            r#"
            SELECT *
            FROM friends
            WHERE from_profile_id = $1
               OR to_profile_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friends)
    }

    async fn create_friendship(
        &self,
        from_profile_id: &Uuid,
        to_profile_id: &Uuid,
    ) -> Result<FriendEntity, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendEntity>(
            "INSERT INTO friends (from_profile_id, to_profile_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(from_profile_id)
        .bind(to_profile_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn delete_friendship(
        &self,
        profile_a: &Uuid,
        profile_b: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            r#"
            DELETE FROM friends
            WHERE
                (from_profile_id = $1 AND to_profile_id = $2)
            OR (from_profile_id = $2 AND to_profile_id = $1)
            "#,
        )
        .bind(profile_a)
        .bind(profile_b)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for FriendRepositoryPg {
    async fn find_friend_requests(
        &self,
        profile_id: &Uuid,
        filter: RequestFilter,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        let sql = format!(
            "SELECT * FROM friend_requests WHERE {} ORDER BY created_at, id",
            filter.predicate()
        );
        let requests = sqlx::query_as::<_, FriendRequestEntity>(&sql)
            .bind(profile_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(requests)
    }

    async fn count_friend_requests(
        &self,
        profile_id: &Uuid,
        filter: RequestFilter,
    ) -> Result<i64, error::SystemError> {
        let sql = format!("SELECT COUNT(*) FROM friend_requests WHERE {}", filter.predicate());
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(profile_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn create_friend_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
        message: &str,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            INSERT INTO friend_requests (id, from_profile_id, to_profile_id, message)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(sender_id)
        .bind(receiver_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    async fn reject_friend_request(
        &self,
        request_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            UPDATE friend_requests
            SET rejected_at = NOW()
            WHERE id = $1 AND to_profile_id = $2
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(receiver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn mark_friend_request_viewed(
        &self,
        request_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            UPDATE friend_requests
            SET viewed_at = NOW()
            WHERE id = $1 AND to_profile_id = $2
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(receiver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn cancel_friend_request(
        &self,
        request_id: &Uuid,
        sender_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            "DELETE FROM friend_requests WHERE id = $1 AND from_profile_id = $2 RETURNING *",
        )
        .bind(request_id)
        .bind(sender_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn delete_friend_request(
        &self,
        request_id: &Uuid,
        participant_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            DELETE FROM friend_requests
            WHERE id = $1
              AND (from_profile_id = $2 OR to_profile_id = $2)
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(participant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }
}

#[async_trait::async_trait]
impl FriendRepo for FriendRepositoryPg {
    async fn accept_friend_request_atomic(
        &self,
        request_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<FriendEntity, error::SystemError> {
        let not_found = || error::SystemError::not_found("Friend request not found");

        let (sender_id, receiver_id) = sqlx::query_as::<_, (Uuid, Uuid)>(
            r#"
            SELECT from_profile_id, to_profile_id
            FROM friend_requests
            WHERE id = $1 AND to_profile_id = $2
            "#,
        )
        .bind(request_id)
        .bind(receiver_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)?;

        let mut tx = self.pool.begin().await?;

        // both directions of the pair, locked in id order before any write
        let locked = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            SELECT *
            FROM friend_requests
            WHERE (from_profile_id, to_profile_id) IN (($1, $2), ($2, $1))
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(sender_id)
        .bind(receiver_id)
        .fetch_all(&mut *tx)
        .await?;

        let request = locked
            .into_iter()
            .find(|r| r.id == *request_id && r.to_profile_id == receiver_id)
            .ok_or_else(not_found)?;

        let inserted = sqlx::query_as::<_, FriendEntity>(
            r#"
            INSERT INTO friends (from_profile_id, to_profile_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            RETURNING *
            "#,
        )
        .bind(request.to_profile_id)
        .bind(request.from_profile_id)
        .fetch_optional(&mut *tx)
        .await?;

        let friendship = match inserted {
            Some(friendship) => friendship,
            None => {
                sqlx::query_as::<_, FriendEntity>(
                    r#"
                    SELECT *
                    FROM friends
                    WHERE
                        (from_profile_id = $1 AND to_profile_id = $2)
                    OR (from_profile_id = $2 AND to_profile_id = $1)
                    "#,
                )
                .bind(request.to_profile_id)
                .bind(request.from_profile_id)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        sqlx::query(
            r#"
            DELETE FROM friend_requests
            WHERE id = $1
               OR (from_profile_id = $2 AND to_profile_id = $3)
            "#,
        )
        .bind(request_id)
        .bind(request.to_profile_id)
        .bind(request.from_profile_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(friendship)
    }
}
