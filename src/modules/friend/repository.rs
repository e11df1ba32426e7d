use uuid::Uuid;

use crate::api::error;
use crate::modules::friend::model::RequestFilter;
use crate::modules::friend::schema::{FriendEntity, FriendRequestEntity};

#[async_trait::async_trait]
pub trait FriendRepository {
    /// Looks the pair up in either stored direction.
    async fn find_friendship(
        &self,
        profile_a: &Uuid,
        profile_b: &Uuid,
    ) -> Result<Option<FriendEntity>, error::SystemError>;

    async fn find_friends(&self, profile_id: &Uuid)
    -> Result<Vec<FriendEntity>, error::SystemError>;

    /// Inserts an edge without going through a request. Only used to check
    /// that the store itself refuses self edges.
    #[allow(dead_code)]
    async fn create_friendship(
        &self,
        from_profile_id: &Uuid,
        to_profile_id: &Uuid,
    ) -> Result<FriendEntity, error::SystemError>;

    /// Returns whether an edge was removed.
    async fn delete_friendship(
        &self,
        profile_a: &Uuid,
        profile_b: &Uuid,
    ) -> Result<bool, error::SystemError>;
}

#[async_trait::async_trait]
pub trait FriendRequestRepository {
    async fn find_friend_requests(
        &self,
        profile_id: &Uuid,
        filter: RequestFilter,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError>;

    async fn count_friend_requests(
        &self,
        profile_id: &Uuid,
        filter: RequestFilter,
    ) -> Result<i64, error::SystemError>;

    /// Fails with a `friend_requests_pair_key` conflict when the ordered pair
    /// already has a request, rejected or not.
    async fn create_friend_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
        message: &str,
    ) -> Result<FriendRequestEntity, error::SystemError>;

    async fn reject_friend_request(
        &self,
        request_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    async fn mark_friend_request_viewed(
        &self,
        request_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    async fn cancel_friend_request(
        &self,
        request_id: &Uuid,
        sender_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    /// Deletes a request the profile sent or received.
    async fn delete_friend_request(
        &self,
        request_id: &Uuid,
        participant_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;
}

#[async_trait::async_trait]
pub trait FriendRepo: FriendRepository + FriendRequestRepository + Send + Sync {
    /// Turns a request addressed to `receiver_id` into a friendship in one
    /// transaction, clearing any request the receiver had sent the other way.
    async fn accept_friend_request_atomic(
        &self,
        request_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<FriendEntity, error::SystemError>;
}
