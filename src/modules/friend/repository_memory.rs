use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{
        model::RequestFilter,
        repository::{FriendRepo, FriendRepository, FriendRequestRepository},
        schema::{
            FriendEntity, FriendRequestEntity, FRIENDS_NOT_SELF, FRIENDS_PAIR_KEY,
            FRIEND_REQUESTS_NOT_SELF, FRIEND_REQUESTS_PAIR_KEY,
        },
    },
    utils::lock,
};

#[derive(Default)]
struct FriendTables {
    friends: Vec<FriendEntity>,
    requests: Vec<FriendRequestEntity>,
}

impl FriendTables {
    fn insert_friendship(
        &mut self,
        from_profile_id: &Uuid,
        to_profile_id: &Uuid,
    ) -> Result<FriendEntity, error::SystemError> {
        if from_profile_id == to_profile_id {
            return Err(error::SystemError::check_violation(FRIENDS_NOT_SELF));
        }
        if self.friends.iter().any(|f| f.joins(from_profile_id, to_profile_id)) {
            return Err(error::SystemError::unique_violation(FRIENDS_PAIR_KEY));
        }

        let friendship = FriendEntity {
            from_profile_id: *from_profile_id,
            to_profile_id: *to_profile_id,
            created_at: Utc::now(),
        };
        self.friends.push(friendship.clone());
        Ok(friendship)
    }

    fn remove_request(
        &mut self,
        matches: impl Fn(&FriendRequestEntity) -> bool,
    ) -> Option<FriendRequestEntity> {
        let index = self.requests.iter().position(matches)?;
        Some(self.requests.remove(index))
    }
}

/// Friendship tables held in process memory.
///
/// Every operation runs under one lock, which gives the same all-or-nothing
/// behaviour the Postgres transaction does.
#[derive(Default)]
pub struct FriendRepositoryMemory {
    tables: Mutex<FriendTables>,
}

impl FriendRepositoryMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl FriendRepository for FriendRepositoryMemory {
    async fn find_friendship(
        &self,
        profile_a: &Uuid,
        profile_b: &Uuid,
    ) -> Result<Option<FriendEntity>, error::SystemError> {
        let tables = lock(&self.tables)?;
        Ok(tables.friends.iter().find(|f| f.joins(profile_a, profile_b)).cloned())
    }

    async fn find_friends(
        &self,
        profile_id: &Uuid,
    ) -> Result<Vec<FriendEntity>, error::SystemError> {
        let tables = lock(&self.tables)?;
        Ok(tables.friends.iter().filter(|f| f.involves(profile_id)).cloned().collect())
    }

    async fn create_friendship(
        &self,
        from_profile_id: &Uuid,
        to_profile_id: &Uuid,
    ) -> Result<FriendEntity, error::SystemError> {
        lock(&self.tables)?.insert_friendship(from_profile_id, to_profile_id)
    }

    async fn delete_friendship(
        &self,
        profile_a: &Uuid,
        profile_b: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let mut tables = lock(&self.tables)?;
        let before = tables.friends.len();
        tables.friends.retain(|f| !f.joins(profile_a, profile_b));
        Ok(tables.friends.len() < before)
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for FriendRepositoryMemory {
    async fn find_friend_requests(
        &self,
        profile_id: &Uuid,
        filter: RequestFilter,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        let tables = lock(&self.tables)?;
        Ok(tables.requests.iter().filter(|r| filter.matches(r, profile_id)).cloned().collect())
    }

    async fn count_friend_requests(
        &self,
        profile_id: &Uuid,
        filter: RequestFilter,
    ) -> Result<i64, error::SystemError> {
        let tables = lock(&self.tables)?;
        Ok(tables.requests.iter().filter(|r| filter.matches(r, profile_id)).count() as i64)
    }

    async fn create_friend_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
        message: &str,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let mut tables = lock(&self.tables)?;
        if sender_id == receiver_id {
            return Err(error::SystemError::check_violation(FRIEND_REQUESTS_NOT_SELF));
        }
        if tables
            .requests
            .iter()
            .any(|r| r.from_profile_id == *sender_id && r.to_profile_id == *receiver_id)
        {
            return Err(error::SystemError::unique_violation(FRIEND_REQUESTS_PAIR_KEY));
        }

        let request = FriendRequestEntity {
            id: Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext)),
            from_profile_id: *sender_id,
            to_profile_id: *receiver_id,
            message: message.to_string(),
            created_at: Utc::now(),
            rejected_at: None,
            viewed_at: None,
        };
        tables.requests.push(request.clone());
        Ok(request)
    }

    async fn reject_friend_request(
        &self,
        request_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let mut tables = lock(&self.tables)?;
        let request = tables
            .requests
            .iter_mut()
            .find(|r| r.id == *request_id && r.to_profile_id == *receiver_id)
            .map(|r| {
                r.rejected_at = Some(Utc::now());
                r.clone()
            });
        Ok(request)
    }

    async fn mark_friend_request_viewed(
        &self,
        request_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let mut tables = lock(&self.tables)?;
        let request = tables
            .requests
            .iter_mut()
            .find(|r| r.id == *request_id && r.to_profile_id == *receiver_id)
            .map(|r| {
                r.viewed_at = Some(Utc::now());
                r.clone()
            });
        Ok(request)
    }

    async fn cancel_friend_request(
        &self,
        request_id: &Uuid,
        sender_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let mut tables = lock(&self.tables)?;
        Ok(tables.remove_request(|r| r.id == *request_id && r.from_profile_id == *sender_id))
    }

    async fn delete_friend_request(
        &self,
        request_id: &Uuid,
        participant_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let mut tables = lock(&self.tables)?;
        Ok(tables.remove_request(|r| {
            r.id == *request_id
                && (r.from_profile_id == *participant_id || r.to_profile_id == *participant_id)
        }))
    }
}

#[async_trait::async_trait]
impl FriendRepo for FriendRepositoryMemory {
    async fn accept_friend_request_atomic(
        &self,
        request_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<FriendEntity, error::SystemError> {
        let mut tables = lock(&self.tables)?;

        let request = tables
            .requests
            .iter()
            .find(|r| r.id == *request_id && r.to_profile_id == *receiver_id)
            .cloned()
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        let existing = tables
            .friends
            .iter()
            .find(|f| f.joins(&request.from_profile_id, &request.to_profile_id))
            .cloned();
        let friendship = match existing {
            Some(friendship) => friendship,
            None => tables.insert_friendship(&request.to_profile_id, &request.from_profile_id)?,
        };

        tables.requests.retain(|r| {
            r.id != request.id
                && !(r.from_profile_id == request.to_profile_id
                    && r.to_profile_id == request.from_profile_id)
        });

        Ok(friendship)
    }
}
