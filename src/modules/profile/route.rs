use crate::modules::profile::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/profiles").service(provision_profile).service(get_profile));
}
