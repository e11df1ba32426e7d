use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    Error, HttpMessage, HttpRequest,
};
use uuid::Uuid;

use crate::{api::error, constants::PROFILE_HEADER};

/// The profile on whose behalf a request acts.
///
/// Authentication happens upstream; the gateway forwards the authenticated
/// profile id in `X-Profile-Id`.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub profile_id: Uuid,
}

pub async fn identify<B>(req: ServiceRequest, next: Next<B>) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let header = req.headers().get(PROFILE_HEADER).and_then(|h| h.to_str().ok());
    let profile_id = match header.and_then(|h| Uuid::parse_str(h.trim()).ok()) {
        Some(id) => id,
        None => {
            return Err(
                error::Error::unauthorized("Authentication credentials were not provided").into()
            );
        }
    };

    req.extensions_mut().insert(Principal { profile_id });

    next.call(req).await
}

pub fn get_principal(req: &HttpRequest) -> Result<Principal, error::Error> {
    let extensions = req.extensions();

    let principal = extensions
        .get::<Principal>()
        .copied()
        .ok_or_else(|| error::Error::unauthorized("Unauthorized"))?;

    Ok(principal)
}
