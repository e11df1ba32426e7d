use crate::modules::friend::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/friends")
            .service(list_friends)
            .service(count_friend_requests)
            .service(list_friend_requests)
            .service(send_friend_request)
            .service(accept_friend_request)
            .service(reject_friend_request)
            .service(cancel_friend_request)
            .service(view_friend_request)
            .service(delete_friend_request)
            .service(friendship_status)
            .service(remove_friend),
    );
}
