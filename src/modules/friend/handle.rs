use actix_web::{delete, get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{
        error::{self, codes},
        success,
    },
    middlewares::get_principal,
    modules::{
        friend::{
            model::{
                FriendRequestBody, FriendRequestResponse, FriendResponse, FriendshipStatusResponse,
                RequestCountResponse, RequestListQuery,
            },
            service::FriendService,
        },
        profile::{model::UsernameQuery, service::ProfileService},
    },
    utils::{ValidatedJson, ValidatedQuery},
};

#[get("")]
pub async fn list_friends(
    friend_service: web::Data<FriendService>,
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendResponse>>, error::Error> {
    let profile = profile_service.resolve(get_principal(&req)?.profile_id).await?;
    let edges = friend_service.friendships(profile.id).await?;

    let friends = edges.iter().map(|edge| FriendResponse::from_edge(edge, &profile.id)).collect();
    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

#[get("/{friend_id:[0-9a-fA-F-]{36}}/status")]
pub async fn friendship_status(
    friend_service: web::Data<FriendService>,
    profile_service: web::Data<ProfileService>,
    friend_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipStatusResponse>, error::Error> {
    let profile = profile_service.resolve(get_principal(&req)?.profile_id).await?;
    let are_friends = friend_service.are_friends(profile.id, *friend_id).await?;

    Ok(success::Success::ok(Some(FriendshipStatusResponse { are_friends })))
}

#[delete("/{friend_id:[0-9a-fA-F-]{36}}")]
pub async fn remove_friend(
    friend_service: web::Data<FriendService>,
    profile_service: web::Data<ProfileService>,
    friend_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let profile = profile_service.resolve(get_principal(&req)?.profile_id).await?;

    if !friend_service.remove_friend(profile.id, *friend_id).await? {
        return Err(error::Error::refused(codes::FRIENDSHIP_MISSING, "Friendship doesn't exist"));
    }
    Ok(success::Success::accepted(None).message("Friend removed"))
}

/// Sends a request to `?username=` and answers with everything the caller
/// has pending.
#[post("/requests")]
pub async fn send_friend_request(
    friend_service: web::Data<FriendService>,
    profile_service: web::Data<ProfileService>,
    query: ValidatedQuery<UsernameQuery>,
    body: ValidatedJson<FriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let sender = profile_service.resolve(get_principal(&req)?.profile_id).await?;
    let receiver = profile_service.resolve_username(&query.0.username).await?;

    friend_service.add_friend(sender.id, receiver.id, body.0.message).await?;

    let sent = friend_service.sent_requests(sender.id).await?;
    Ok(success::Success::accepted(Some(sent.into_iter().map(FriendRequestResponse::from).collect()))
        .message("Friend request sent successfully"))
}

#[get("/requests")]
pub async fn list_friend_requests(
    friend_service: web::Data<FriendService>,
    profile_service: web::Data<ProfileService>,
    query: ValidatedQuery<RequestListQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let profile = profile_service.resolve(get_principal(&req)?.profile_id).await?;
    let requests = friend_service.list_requests(profile.id, query.0.status).await?;

    Ok(success::Success::ok(Some(requests.into_iter().map(FriendRequestResponse::from).collect()))
        .message("Friend requests retrieved successfully"))
}

#[get("/requests/count")]
pub async fn count_friend_requests(
    friend_service: web::Data<FriendService>,
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
) -> Result<success::Success<RequestCountResponse>, error::Error> {
    let profile = profile_service.resolve(get_principal(&req)?.profile_id).await?;
    let (unread, unrejected) = friend_service.request_counts(profile.id).await?;

    Ok(success::Success::ok(Some(RequestCountResponse { unread, unrejected })))
}

#[post("/requests/{request_id}/accept")]
pub async fn accept_friend_request(
    friend_service: web::Data<FriendService>,
    profile_service: web::Data<ProfileService>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let profile = profile_service.resolve(get_principal(&req)?.profile_id).await?;
    friend_service.accept(*request_id, profile.id).await?;

    Ok(success::Success::accepted(None).message("Request accepted"))
}

#[post("/requests/{request_id}/reject")]
pub async fn reject_friend_request(
    friend_service: web::Data<FriendService>,
    profile_service: web::Data<ProfileService>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let profile = profile_service.resolve(get_principal(&req)?.profile_id).await?;
    friend_service.reject(*request_id, profile.id).await?;

    Ok(success::Success::accepted(None).message("Request rejected"))
}

#[post("/requests/{request_id}/cancel")]
pub async fn cancel_friend_request(
    friend_service: web::Data<FriendService>,
    profile_service: web::Data<ProfileService>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let profile = profile_service.resolve(get_principal(&req)?.profile_id).await?;
    friend_service.cancel(*request_id, profile.id).await?;

    Ok(success::Success::accepted(None).message("Request cancelled"))
}

#[post("/requests/{request_id}/view")]
pub async fn view_friend_request(
    friend_service: web::Data<FriendService>,
    profile_service: web::Data<ProfileService>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let profile = profile_service.resolve(get_principal(&req)?.profile_id).await?;
    friend_service.mark_viewed(*request_id, profile.id).await?;

    Ok(success::Success::accepted(None).message("Request viewed"))
}

#[delete("/requests/{request_id}")]
pub async fn delete_friend_request(
    friend_service: web::Data<FriendService>,
    profile_service: web::Data<ProfileService>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let profile = profile_service.resolve(get_principal(&req)?.profile_id).await?;
    friend_service.delete_request(*request_id, profile.id).await?;
    Ok(success::Success::no_content())
}
