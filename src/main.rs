use actix_web::{self, middleware::Logger, App, HttpServer};
use std::sync::LazyLock;

use crate::configs::AppServices;

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let services = AppServices::from_env().await.map_err(|e| {
        log::error!("Failed to initialise storage: {e}");
        std::io::Error::other("Database connection error")
    })?;

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(Logger::default())
            .service(health_check)
            .configure(move |cfg| services.configure(cfg))
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
