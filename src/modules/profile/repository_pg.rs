use uuid::Uuid;

use crate::{
    api::error,
    modules::profile::{repository::ProfileRepository, schema::ProfileEntity},
};

#[derive(Clone)]
pub struct ProfileRepositoryPg {
    pool: sqlx::PgPool,
}

impl ProfileRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProfileRepository for ProfileRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ProfileEntity>, error::SystemError> {
        let profile = sqlx::query_as::<_, ProfileEntity>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ProfileEntity>, error::SystemError> {
        let profile = sqlx::query_as::<_, ProfileEntity>(
            "SELECT * FROM profiles WHERE lower(username) = lower($1)",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn create(&self, username: &str) -> Result<ProfileEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let profile = sqlx::query_as::<_, ProfileEntity>(
            "INSERT INTO profiles (id, username) VALUES ($1, $2) RETURNING *",
        )
        .bind(id)
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{modules::profile::schema::PROFILES_USERNAME_KEY, test::database};

    #[actix_web::test]
    async fn test_pg_usernames_are_unique_ignoring_case() {
        let Some(pool) = database().await else { return };
        let repo = ProfileRepositoryPg::new(pool);
        let username = format!("Steve{}", Uuid::now_v7().simple());

        let profile = repo.create(&username).await.unwrap();
        let found = repo.find_by_username(&username.to_lowercase()).await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(profile.id));

        let err = repo.create(&username.to_uppercase()).await.unwrap_err();
        assert!(err.violates(PROFILES_USERNAME_KEY));
    }
}
