use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error::{self, RelationKind},
    modules::friend::{
        model::RequestFilter,
        repository::FriendRepo,
        schema::{
            FriendEntity, FriendRequestEntity, FRIENDS_NOT_SELF, FRIENDS_PAIR_KEY,
            FRIEND_REQUESTS_NOT_SELF, FRIEND_REQUESTS_PAIR_KEY,
        },
    },
};

/// Maps the store's constraint failures onto the relationship errors.
/// Anything else is a storage fault and passes through untouched.
fn relation_error(err: error::SystemError) -> error::SystemError {
    if err.violates(FRIEND_REQUESTS_PAIR_KEY) {
        error::SystemError::AlreadyExists(RelationKind::FriendshipRequest)
    } else if err.violates(FRIEND_REQUESTS_NOT_SELF) {
        error::SystemError::SelfRelation(RelationKind::FriendshipRequest)
    } else if err.violates(FRIENDS_NOT_SELF) {
        error::SystemError::SelfRelation(RelationKind::Friendship)
    } else if err.violates(FRIENDS_PAIR_KEY) {
        error::SystemError::AlreadyFriends
    } else {
        err
    }
}

fn request_not_found() -> error::SystemError {
    error::SystemError::not_found("Friend request not found")
}

#[derive(Clone)]
pub struct FriendService {
    friend_repo: Arc<dyn FriendRepo>,
}

impl FriendService {
    pub fn with_dependencies(friend_repo: Arc<dyn FriendRepo>) -> Self {
        log::info!("FriendService initialized with dependencies");
        FriendService { friend_repo }
    }

    pub async fn add_friend(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        message: Option<String>,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        if sender_id == receiver_id {
            return Err(error::SystemError::SelfRelation(RelationKind::FriendshipRequest));
        }

        if self.friend_repo.find_friendship(&sender_id, &receiver_id).await?.is_some() {
            return Err(error::SystemError::AlreadyFriends);
        }

        // the unique key on (from, to) settles duplicates, including racing senders
        let request = self
            .friend_repo
            .create_friend_request(&sender_id, &receiver_id, &message.unwrap_or_default())
            .await
            .map_err(relation_error)?;

        tracing::info!(request_id = %request.id, "friendship requested {} -> {}", sender_id, receiver_id);
        Ok(request)
    }

    pub async fn accept(
        &self,
        request_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<FriendEntity, error::SystemError> {
        let friendship = self
            .friend_repo
            .accept_friend_request_atomic(&request_id, &receiver_id)
            .await
            .map_err(relation_error)?;

        tracing::info!(%request_id, "friendship accepted by {}", receiver_id);
        Ok(friendship)
    }

    pub async fn reject(
        &self,
        request_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let request = self
            .friend_repo
            .reject_friend_request(&request_id, &receiver_id)
            .await?
            .ok_or_else(request_not_found)?;

        tracing::info!(%request_id, "friendship request rejected by {}", receiver_id);
        Ok(request)
    }

    pub async fn cancel(
        &self,
        request_id: Uuid,
        sender_id: Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let request = self
            .friend_repo
            .cancel_friend_request(&request_id, &sender_id)
            .await?
            .ok_or_else(request_not_found)?;

        tracing::info!(%request_id, "friendship request cancelled by {}", sender_id);
        Ok(request)
    }

    pub async fn mark_viewed(
        &self,
        request_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        self.friend_repo
            .mark_friend_request_viewed(&request_id, &receiver_id)
            .await?
            .ok_or_else(request_not_found)
    }

    /// Removes a request either side holds, e.g. a rejected one that still
    /// blocks its sender from asking again.
    pub async fn delete_request(
        &self,
        request_id: Uuid,
        participant_id: Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let request = self
            .friend_repo
            .delete_friend_request(&request_id, &participant_id)
            .await?
            .ok_or_else(request_not_found)?;

        tracing::debug!(%request_id, "friendship request deleted by {}", participant_id);
        Ok(request)
    }

    pub async fn remove_friend(
        &self,
        profile_id: Uuid,
        friend_id: Uuid,
    ) -> Result<bool, error::SystemError> {
        let removed = self.friend_repo.delete_friendship(&profile_id, &friend_id).await?;
        if removed {
            tracing::info!("friendship {} <-> {} removed", profile_id, friend_id);
        }
        Ok(removed)
    }

    pub async fn are_friends(
        &self,
        profile_a: Uuid,
        profile_b: Uuid,
    ) -> Result<bool, error::SystemError> {
        Ok(self.friend_repo.find_friendship(&profile_a, &profile_b).await?.is_some())
    }

    pub async fn friendships(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<FriendEntity>, error::SystemError> {
        self.friend_repo.find_friends(&profile_id).await
    }

    #[allow(dead_code)]
    pub async fn friends(&self, profile_id: Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        let edges = self.friend_repo.find_friends(&profile_id).await?;
        Ok(edges.iter().map(|edge| edge.other(&profile_id)).collect())
    }

    pub async fn list_requests(
        &self,
        profile_id: Uuid,
        filter: RequestFilter,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        self.friend_repo.find_friend_requests(&profile_id, filter).await
    }

    /// Unread requests addressed to the profile.
    #[allow(dead_code)]
    pub async fn requests(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        self.unread_requests(profile_id).await
    }

    pub async fn sent_requests(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        self.list_requests(profile_id, RequestFilter::Sent).await
    }

    #[allow(dead_code)]
    pub async fn unread_requests(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        self.list_requests(profile_id, RequestFilter::Unread).await
    }

    #[allow(dead_code)]
    pub async fn read_requests(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        self.list_requests(profile_id, RequestFilter::Read).await
    }

    #[allow(dead_code)]
    pub async fn rejected_requests(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        self.list_requests(profile_id, RequestFilter::Rejected).await
    }

    #[allow(dead_code)]
    pub async fn unrejected_requests(
        &self,
        profile_id: Uuid,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        self.list_requests(profile_id, RequestFilter::Unrejected).await
    }

    pub async fn unread_request_count(&self, profile_id: Uuid) -> Result<i64, error::SystemError> {
        self.friend_repo.count_friend_requests(&profile_id, RequestFilter::Unread).await
    }

    pub async fn unrejected_request_count(
        &self,
        profile_id: Uuid,
    ) -> Result<i64, error::SystemError> {
        self.friend_repo.count_friend_requests(&profile_id, RequestFilter::Unrejected).await
    }

    /// `(unread, unrejected)`.
    pub async fn request_counts(&self, profile_id: Uuid) -> Result<(i64, i64), error::SystemError> {
        tokio::try_join!(
            self.unread_request_count(profile_id),
            self.unrejected_request_count(profile_id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::friend::repository::FriendRepository;
    use crate::modules::friend::repository_memory::FriendRepositoryMemory;
    use crate::test::{AMY, BOB, STEVE, SUSAN};
    use futures_util::future::join;

    fn service_with_repo() -> (FriendService, Arc<FriendRepositoryMemory>) {
        let repo = Arc::new(FriendRepositoryMemory::new());
        (FriendService::with_dependencies(repo.clone()), repo)
    }

    fn service() -> FriendService {
        service_with_repo().0
    }

    #[actix_web::test]
    async fn test_friendship_request_lifecycle() {
        let friends = service();

        let request = friends.add_friend(BOB, STEVE, None).await.unwrap();
        assert_eq!(request.from_profile_id, BOB);
        assert_eq!(request.to_profile_id, STEVE);
        assert_eq!(request.message, "");

        assert!(friends.friends(BOB).await.unwrap().is_empty());
        assert!(friends.friends(STEVE).await.unwrap().is_empty());

        assert_eq!(friends.unread_request_count(STEVE).await.unwrap(), 1);
        assert!(friends.requests(BOB).await.unwrap().is_empty());
        assert_eq!(friends.requests(STEVE).await.unwrap().len(), 1);
        assert_eq!(friends.sent_requests(BOB).await.unwrap().len(), 1);
        assert!(friends.sent_requests(STEVE).await.unwrap().is_empty());
        assert_eq!(friends.unread_requests(STEVE).await.unwrap().len(), 1);
        assert!(friends.rejected_requests(STEVE).await.unwrap().is_empty());
        assert_eq!(friends.unrejected_requests(STEVE).await.unwrap().len(), 1);
        assert_eq!(friends.unrejected_request_count(STEVE).await.unwrap(), 1);
        assert!(!friends.are_friends(BOB, STEVE).await.unwrap());

        let edge = friends.accept(request.id, STEVE).await.unwrap();
        assert_eq!(edge.from_profile_id, STEVE);
        assert_eq!(edge.to_profile_id, BOB);

        assert!(friends.sent_requests(BOB).await.unwrap().is_empty());
        assert!(friends.unread_requests(STEVE).await.unwrap().is_empty());
        assert_eq!(friends.friends(BOB).await.unwrap(), vec![STEVE]);
        assert_eq!(friends.friends(STEVE).await.unwrap(), vec![BOB]);
        assert!(friends.are_friends(BOB, STEVE).await.unwrap());
        assert!(friends.are_friends(STEVE, BOB).await.unwrap());

        assert!(friends.remove_friend(BOB, STEVE).await.unwrap());
        assert!(!friends.are_friends(BOB, STEVE).await.unwrap());
        assert!(!friends.remove_friend(BOB, STEVE).await.unwrap());
        assert!(!friends.remove_friend(BOB, BOB).await.unwrap());
    }

    #[actix_web::test]
    async fn test_remove_friend_from_either_side() {
        let friends = service();
        let request = friends.add_friend(BOB, STEVE, None).await.unwrap();
        friends.accept(request.id, STEVE).await.unwrap();

        assert!(friends.remove_friend(STEVE, BOB).await.unwrap());
        assert!(friends.friends(BOB).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_cancelled_request_disappears() {
        let friends = service();

        let request = friends.add_friend(SUSAN, AMY, None).await.unwrap();
        friends.cancel(request.id, SUSAN).await.unwrap();

        assert!(friends.requests(SUSAN).await.unwrap().is_empty());
        assert!(friends.requests(AMY).await.unwrap().is_empty());
        assert!(friends.sent_requests(SUSAN).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_rejected_request_blocks_until_deleted() {
        let friends = service();

        let request = friends.add_friend(SUSAN, AMY, None).await.unwrap();
        let rejected = friends.reject(request.id, AMY).await.unwrap();
        assert!(rejected.rejected_at.is_some());

        let err = friends.add_friend(SUSAN, AMY, None).await.unwrap_err();
        assert!(matches!(err, error::SystemError::AlreadyExists(RelationKind::FriendshipRequest)));
        assert!(!friends.are_friends(SUSAN, AMY).await.unwrap());
        assert_eq!(friends.rejected_requests(AMY).await.unwrap().len(), 1);
        assert!(friends.unrejected_requests(AMY).await.unwrap().is_empty());

        friends.delete_request(request.id, AMY).await.unwrap();

        let retry = friends.add_friend(SUSAN, AMY, None).await.unwrap();
        friends.mark_viewed(retry.id, AMY).await.unwrap();

        assert!(!friends.are_friends(SUSAN, AMY).await.unwrap());
        assert_eq!(friends.read_requests(AMY).await.unwrap().len(), 1);
        assert!(friends.unread_requests(AMY).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_mark_viewed_keeps_rejection() {
        let friends = service();
        let request = friends.add_friend(SUSAN, AMY, None).await.unwrap();
        friends.reject(request.id, AMY).await.unwrap();

        let viewed = friends.mark_viewed(request.id, AMY).await.unwrap();
        assert!(viewed.viewed_at.is_some());
        assert!(viewed.rejected_at.is_some());
        assert_eq!(friends.rejected_requests(AMY).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_self_friendship_refused() {
        let (friends, repo) = service_with_repo();

        let err = friends.add_friend(BOB, BOB, None).await.unwrap_err();
        assert!(matches!(err, error::SystemError::SelfRelation(RelationKind::FriendshipRequest)));

        // writing the edge directly is refused by the store as well
        let err = repo.create_friendship(&BOB, &BOB).await.unwrap_err();
        assert!(err.violates(FRIENDS_NOT_SELF));
        assert!(matches!(
            relation_error(err),
            error::SystemError::SelfRelation(RelationKind::Friendship)
        ));
    }

    #[actix_web::test]
    async fn test_already_friends() {
        let friends = service();
        let request = friends.add_friend(BOB, STEVE, None).await.unwrap();
        friends.accept(request.id, STEVE).await.unwrap();

        let err = friends.add_friend(BOB, STEVE, None).await.unwrap_err();
        assert!(matches!(err, error::SystemError::AlreadyFriends));
        let err = friends.add_friend(STEVE, BOB, None).await.unwrap_err();
        assert!(matches!(err, error::SystemError::AlreadyFriends));
    }

    #[actix_web::test]
    async fn test_duplicate_request_ignores_message() {
        let friends = service();
        friends.add_friend(BOB, STEVE, Some("Testing".into())).await.unwrap();

        let err = friends.add_friend(BOB, STEVE, Some("Foo Bar".into())).await.unwrap_err();
        assert!(matches!(err, error::SystemError::AlreadyExists(RelationKind::FriendshipRequest)));
    }

    #[actix_web::test]
    async fn test_reverse_requests_coexist_and_accept_clears_both() {
        let friends = service();

        let request = friends.add_friend(BOB, STEVE, None).await.unwrap();
        friends.add_friend(STEVE, BOB, None).await.unwrap();
        assert!(!friends.are_friends(BOB, STEVE).await.unwrap());
        assert_eq!(friends.sent_requests(STEVE).await.unwrap().len(), 1);

        friends.accept(request.id, STEVE).await.unwrap();

        assert!(friends.sent_requests(BOB).await.unwrap().is_empty());
        assert!(friends.sent_requests(STEVE).await.unwrap().is_empty());
        assert!(friends.unrejected_requests(BOB).await.unwrap().is_empty());
        assert!(friends.unrejected_requests(STEVE).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_request_operations_are_scoped_to_their_side() {
        let friends = service();
        let request = friends.add_friend(STEVE, BOB, None).await.unwrap();

        // only the receiver answers, only the sender cancels
        for err in [
            friends.accept(request.id, STEVE).await.unwrap_err(),
            friends.reject(request.id, STEVE).await.unwrap_err(),
            friends.mark_viewed(request.id, AMY).await.unwrap_err(),
            friends.cancel(request.id, BOB).await.unwrap_err(),
            friends.delete_request(request.id, AMY).await.unwrap_err(),
        ] {
            assert!(matches!(err, error::SystemError::NotFound(_)));
        }

        assert_eq!(friends.unread_request_count(BOB).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_joined_requests_for_same_pair() {
        let friends = service();

        let (first, second) =
            join(friends.add_friend(BOB, STEVE, None), friends.add_friend(BOB, STEVE, None)).await;

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes.iter().any(|r| matches!(
            r,
            Err(error::SystemError::AlreadyExists(RelationKind::FriendshipRequest))
        )));
        assert_eq!(friends.sent_requests(BOB).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_joined_accept_and_cancel_has_one_winner() {
        let friends = service();
        let request = friends.add_friend(BOB, STEVE, None).await.unwrap();

        let (accepted, cancelled) =
            join(friends.accept(request.id, STEVE), friends.cancel(request.id, BOB)).await;

        assert!(accepted.is_ok() != cancelled.is_ok());
        if accepted.is_ok() {
            assert!(matches!(cancelled, Err(error::SystemError::NotFound(_))));
            assert!(friends.are_friends(BOB, STEVE).await.unwrap());
        } else {
            assert!(matches!(accepted, Err(error::SystemError::NotFound(_))));
            assert!(!friends.are_friends(BOB, STEVE).await.unwrap());
        }
    }

    #[actix_web::test]
    async fn test_request_counts() {
        let friends = service();
        let from_bob = friends.add_friend(BOB, AMY, None).await.unwrap();
        friends.add_friend(STEVE, AMY, None).await.unwrap();
        friends.add_friend(SUSAN, AMY, None).await.unwrap();

        friends.mark_viewed(from_bob.id, AMY).await.unwrap();
        assert_eq!(friends.request_counts(AMY).await.unwrap(), (2, 3));

        friends.reject(from_bob.id, AMY).await.unwrap();
        assert_eq!(friends.request_counts(AMY).await.unwrap(), (2, 2));
    }

    #[test]
    fn test_storage_faults_are_not_translated() {
        let err = relation_error(error::SystemError::DatabaseError("connection reset".into()));
        assert!(matches!(err, error::SystemError::DatabaseError(_)));

        let err = relation_error(error::SystemError::unique_violation("some_other_key"));
        assert!(matches!(err, error::SystemError::Conflict(_)));
    }
}
