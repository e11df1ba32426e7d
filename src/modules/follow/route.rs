use crate::modules::follow::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/follows")
            .service(count_follows)
            .service(list_follows)
            .service(add_follower)
            .service(remove_follower),
    );
}
