use uuid::Uuid;

use crate::{api::error, modules::profile::schema::ProfileEntity};

#[async_trait::async_trait]
pub trait ProfileRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ProfileEntity>, error::SystemError>;

    /// Case-insensitive lookup.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ProfileEntity>, error::SystemError>;

    async fn create(&self, username: &str) -> Result<ProfileEntity, error::SystemError>;
}
