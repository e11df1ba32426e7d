use actix_web::{get, post, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    modules::profile::{
        model::{ProfileResponse, ProvisionProfileModel},
        service::ProfileService,
    },
    utils::ValidatedJson,
};

#[post("")]
pub async fn provision_profile(
    profile_service: web::Data<ProfileService>,
    body: ValidatedJson<ProvisionProfileModel>,
) -> Result<success::Success<ProfileResponse>, error::Error> {
    let profile = profile_service.provision(&body.0.username).await?;
    Ok(success::Success::created(Some(ProfileResponse::from(profile)))
        .message("Profile created successfully"))
}

#[get("/{id:[0-9a-fA-F-]{36}}")]
pub async fn get_profile(
    profile_service: web::Data<ProfileService>,
    profile_id: web::Path<Uuid>,
) -> Result<success::Success<ProfileResponse>, error::Error> {
    let profile = profile_service.resolve(profile_id.into_inner()).await?;
    Ok(success::Success::ok(Some(ProfileResponse::from(profile)))
        .message("Profile retrieved successfully"))
}
