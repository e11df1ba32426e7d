use std::sync::Mutex;

use uuid::Uuid;

use crate::{
    api::error,
    modules::profile::{
        repository::ProfileRepository,
        schema::{ProfileEntity, PROFILES_USERNAME_KEY},
    },
    utils::lock,
};

#[derive(Default)]
pub struct ProfileRepositoryMemory {
    profiles: Mutex<Vec<ProfileEntity>>,
}

impl ProfileRepositoryMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProfileRepository for ProfileRepositoryMemory {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ProfileEntity>, error::SystemError> {
        let profiles = lock(&self.profiles)?;
        Ok(profiles.iter().find(|p| p.id == *id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ProfileEntity>, error::SystemError> {
        let username = username.to_lowercase();
        let profiles = lock(&self.profiles)?;
        Ok(profiles.iter().find(|p| p.username.to_lowercase() == username).cloned())
    }

    async fn create(&self, username: &str) -> Result<ProfileEntity, error::SystemError> {
        let key = username.to_lowercase();
        let mut profiles = lock(&self.profiles)?;
        if profiles.iter().any(|p| p.username.to_lowercase() == key) {
            return Err(error::SystemError::unique_violation(PROFILES_USERNAME_KEY));
        }

        let profile = ProfileEntity {
            id: Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext)),
            username: username.to_string(),
            created_at: chrono::Utc::now(),
        };
        profiles.push(profile.clone());
        Ok(profile)
    }
}
