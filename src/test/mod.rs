use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::modules::profile::{
    repository::ProfileRepository, repository_pg::ProfileRepositoryPg, schema::ProfileEntity,
    service::ProfileService,
};

// Fixed identities for engine tests that never touch the profile directory.
pub const BOB: Uuid = Uuid::from_u128(0x0b0b);
pub const STEVE: Uuid = Uuid::from_u128(0x57e7e);
pub const SUSAN: Uuid = Uuid::from_u128(0x5a5a);
pub const AMY: Uuid = Uuid::from_u128(0xa111);

/// Provisions bob, steve, susan and amy, in that order.
pub async fn provision_cast(profiles: &ProfileService) -> [ProfileEntity; 4] {
    let mut cast = Vec::with_capacity(4);
    for username in ["bob", "steve", "susan", "amy"] {
        cast.push(profiles.provision(username).await.unwrap());
    }
    cast.try_into().unwrap()
}

/// Pool on `DATABASE_URL` with the migrations applied, `None` when no
/// database is configured so the caller can skip.
pub async fn database() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let Some(database_url) = std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty())
    else {
        eprintln!("DATABASE_URL is not set, skipping Postgres test");
        return None;
    };

    let pool = PgPoolOptions::new().max_connections(4).connect(&database_url).await.unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    Some(pool)
}

/// Profiles with run-unique usernames, so tests can share one database.
pub async fn provision_pg_profiles<const N: usize>(pool: &PgPool) -> [Uuid; N] {
    let repo = ProfileRepositoryPg::new(pool.clone());
    let mut ids = [Uuid::nil(); N];
    for id in ids.iter_mut() {
        *id = repo.create(&format!("p{}", Uuid::now_v7().simple())).await.unwrap().id;
    }
    ids
}
