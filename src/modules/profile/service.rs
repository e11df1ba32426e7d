use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error::{self, RelationKind},
    modules::profile::{
        repository::ProfileRepository,
        schema::{ProfileEntity, PROFILES_USERNAME_KEY},
    },
};

/// Identity directory in front of the relationship engines.
///
/// Companion records are provisioned by an explicit `provision` call when an
/// identity is created; nothing here listens for creation events.
#[derive(Clone)]
pub struct ProfileService {
    repo: Arc<dyn ProfileRepository + Send + Sync>,
}

impl ProfileService {
    pub fn with_dependencies(repo: Arc<dyn ProfileRepository + Send + Sync>) -> Self {
        log::info!("ProfileService initialized with dependencies");
        ProfileService { repo }
    }

    pub async fn provision(&self, username: &str) -> Result<ProfileEntity, error::SystemError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(error::SystemError::bad_request("Username cannot be empty"));
        }

        let profile = self.repo.create(username).await.map_err(|e| {
            if e.violates(PROFILES_USERNAME_KEY) {
                error::SystemError::AlreadyExists(RelationKind::Profile)
            } else {
                e
            }
        })?;

        tracing::info!(profile_id = %profile.id, "profile provisioned for {}", profile.username);
        Ok(profile)
    }

    /// Resolves the calling principal to its profile.
    pub async fn resolve(&self, principal: Uuid) -> Result<ProfileEntity, error::SystemError> {
        self.repo
            .find_by_id(&principal)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Profile not found"))
    }

    pub async fn resolve_username(
        &self,
        username: &str,
    ) -> Result<ProfileEntity, error::SystemError> {
        self.repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| error::SystemError::not_found(format!("{username} does not exist !")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::profile::repository_memory::ProfileRepositoryMemory;

    fn service() -> ProfileService {
        ProfileService::with_dependencies(Arc::new(ProfileRepositoryMemory::new()))
    }

    #[actix_web::test]
    async fn test_provision_then_resolve() {
        let profiles = service();
        let bob = profiles.provision("bob").await.unwrap();

        assert_eq!(profiles.resolve(bob.id).await.unwrap().username, "bob");
        assert_eq!(profiles.resolve_username("BOB").await.unwrap().id, bob.id);
    }

    #[actix_web::test]
    async fn test_provision_duplicate_username() {
        let profiles = service();
        profiles.provision("steve").await.unwrap();

        let err = profiles.provision("Steve").await.unwrap_err();
        assert!(matches!(err, error::SystemError::AlreadyExists(RelationKind::Profile)));
    }

    #[actix_web::test]
    async fn test_usernames_compare_case_insensitively_beyond_ascii() {
        let profiles = service();
        let emile = profiles.provision("Émile").await.unwrap();

        assert_eq!(profiles.resolve_username("émile").await.unwrap().id, emile.id);
        let err = profiles.provision("ÉMILE").await.unwrap_err();
        assert!(matches!(err, error::SystemError::AlreadyExists(RelationKind::Profile)));
    }

    #[actix_web::test]
    async fn test_provision_rejects_blank_username() {
        let err = service().provision("   ").await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));
    }

    #[actix_web::test]
    async fn test_unknown_identities_are_not_found() {
        let profiles = service();

        let err = profiles.resolve(Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));

        match profiles.resolve_username("tartanpion").await.unwrap_err() {
            error::SystemError::NotFound(msg) => assert_eq!(msg, "tartanpion does not exist !"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
