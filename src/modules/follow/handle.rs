use actix_web::{delete, get, post, web, HttpRequest};

use crate::{
    api::{
        error::{self, codes},
        success,
    },
    middlewares::get_principal,
    modules::{
        follow::{
            model::{FollowCountResponse, FollowListQuery, FollowResponse},
            service::FollowService,
        },
        profile::{model::UsernameQuery, service::ProfileService},
    },
    utils::ValidatedQuery,
};

#[get("")]
pub async fn list_follows(
    follow_service: web::Data<FollowService>,
    profile_service: web::Data<ProfileService>,
    query: ValidatedQuery<FollowListQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FollowResponse>>, error::Error> {
    let profile = profile_service.resolve(get_principal(&req)?.profile_id).await?;

    let edges = if query.0.lists_following() {
        follow_service.following_edges(profile.id).await?
    } else {
        follow_service.follower_edges(profile.id).await?
    };

    let follows = edges.into_iter().map(FollowResponse::from).collect();
    Ok(success::Success::ok(Some(follows)))
}

#[get("/count")]
pub async fn count_follows(
    follow_service: web::Data<FollowService>,
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
) -> Result<success::Success<FollowCountResponse>, error::Error> {
    let profile = profile_service.resolve(get_principal(&req)?.profile_id).await?;
    let (followers, following) = follow_service.counts(profile.id).await?;

    Ok(success::Success::ok(Some(FollowCountResponse { followers, following })))
}

#[post("")]
pub async fn add_follower(
    follow_service: web::Data<FollowService>,
    profile_service: web::Data<ProfileService>,
    query: ValidatedQuery<UsernameQuery>,
    req: HttpRequest,
) -> Result<success::Success<FollowResponse>, error::Error> {
    let profile = profile_service.resolve(get_principal(&req)?.profile_id).await?;
    let target = profile_service.resolve_username(&query.0.username).await?;

    let follow = follow_service.add_follower(profile.id, target.id).await?;
    Ok(success::Success::accepted(Some(FollowResponse::from(follow))).message("Follower added"))
}

#[delete("")]
pub async fn remove_follower(
    follow_service: web::Data<FollowService>,
    profile_service: web::Data<ProfileService>,
    query: ValidatedQuery<UsernameQuery>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let profile = profile_service.resolve(get_principal(&req)?.profile_id).await?;
    let target = profile_service.resolve_username(&query.0.username).await?;

    if !follow_service.remove_follower(profile.id, target.id).await? {
        return Err(error::Error::refused(codes::FOLLOW_MISSING, "Follower doesn't exist"));
    }
    Ok(success::Success::accepted(None).message("Follower removed"))
}
