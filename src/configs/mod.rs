use std::sync::Arc;

use actix_web::{middleware::from_fn, web};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    api::error,
    middlewares::identify,
    modules::{
        follow::{
            repository_memory::FollowRepositoryMemory, repository_pg::FollowRepositoryPg,
            service::FollowService,
        },
        friend::{
            repository_memory::FriendRepositoryMemory, repository_pg::FriendRepositoryPg,
            service::FriendService,
        },
        profile::{
            repository_memory::ProfileRepositoryMemory, repository_pg::ProfileRepositoryPg,
            service::ProfileService,
        },
    },
    ENV,
};

pub async fn connect_database(database_url: &str) -> Result<PgPool, error::SystemError> {
    let pool = PgPoolOptions::new()
        .max_connections(ENV.database_max_connections)
        .min_connections(1)
        .acquire_slow_threshold(std::time::Duration::from_secs(3))
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Database migrations applied");

    Ok(pool)
}

/// The three services every worker shares.
#[derive(Clone)]
pub struct AppServices {
    pub profile_service: ProfileService,
    pub friend_service: FriendService,
    pub follow_service: FollowService,
}

impl AppServices {
    pub fn postgres(pool: PgPool) -> Self {
        AppServices {
            profile_service: ProfileService::with_dependencies(Arc::new(ProfileRepositoryPg::new(
                pool.clone(),
            ))),
            friend_service: FriendService::with_dependencies(Arc::new(FriendRepositoryPg::new(
                pool.clone(),
            ))),
            follow_service: FollowService::with_dependencies(Arc::new(FollowRepositoryPg::new(
                pool,
            ))),
        }
    }

    pub fn memory() -> Self {
        AppServices {
            profile_service: ProfileService::with_dependencies(Arc::new(
                ProfileRepositoryMemory::new(),
            )),
            friend_service: FriendService::with_dependencies(Arc::new(
                FriendRepositoryMemory::new(),
            )),
            follow_service: FollowService::with_dependencies(Arc::new(
                FollowRepositoryMemory::new(),
            )),
        }
    }

    /// Postgres when `DATABASE_URL` is set, process memory otherwise.
    pub async fn from_env() -> Result<Self, error::SystemError> {
        match ENV.database_url.as_deref() {
            Some(database_url) => Ok(Self::postgres(connect_database(database_url).await?)),
            None => {
                log::warn!("DATABASE_URL is not set, relationships are kept in memory only");
                Ok(Self::memory())
            }
        }
    }

    /// Registers the services and the `/api` routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.profile_service.clone()))
            .app_data(web::Data::new(self.friend_service.clone()))
            .app_data(web::Data::new(self.follow_service.clone()))
            .service(
                web::scope("/api")
                    .configure(crate::modules::profile::route::public_api_configure)
                    .service(
                        web::scope("")
                            .wrap(from_fn(identify))
                            .configure(crate::modules::friend::route::configure)
                            .configure(crate::modules::follow::route::configure),
                    ),
            );
    }
}
