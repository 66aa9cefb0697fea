//! Friendship requests and friendships.
//!
//! A request moves from sent to accepted (becoming a friendship) or is
//! cancelled by either side. `target` is always the other user; who acts is
//! taken from the session.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::Transport;
use crate::relationship::{RelationshipCommand, RelationshipQuery, SocialClient};
use crate::session::SessionProvider;
use crate::types::{PageRequest, UserCard};

/// Friend operations, borrowed from a `SocialClient`.
pub struct FriendService<'a, T, P> {
    client: &'a SocialClient<T, P>,
}

impl<'a, T: Transport, P: SessionProvider> FriendService<'a, T, P> {
    pub(crate) fn new(client: &'a SocialClient<T, P>) -> Self {
        Self { client }
    }

    pub fn send_request_friendship(&self, target: &str) -> Result<Option<Value>, ApiError> {
        self.client
            .execute_command(RelationshipCommand::SendFriendRequest, target)
    }

    /// Withdraw a request the session user sent to `target`.
    pub fn cancel_send_request_friendship(&self, target: &str) -> Result<Option<Value>, ApiError> {
        self.client
            .execute_command(RelationshipCommand::CancelSentFriendRequest, target)
    }

    /// Decline a request `target` sent to the session user.
    pub fn cancel_received_request_friendship(
        &self,
        target: &str,
    ) -> Result<Option<Value>, ApiError> {
        self.client
            .execute_command(RelationshipCommand::CancelReceivedFriendRequest, target)
    }

    pub fn accept_received_request_friendship(
        &self,
        target: &str,
    ) -> Result<Option<Value>, ApiError> {
        self.client
            .execute_command(RelationshipCommand::AcceptFriendRequest, target)
    }

    pub fn cancel_friendship(&self, target: &str) -> Result<Option<Value>, ApiError> {
        self.client
            .execute_command(RelationshipCommand::DeleteFriendship, target)
    }

    pub fn get_friends(&self, page: &PageRequest) -> Result<Vec<UserCard>, ApiError> {
        self.client.execute_query(RelationshipQuery::Friends, page)
    }

    pub fn get_friend_recommendations(&self, user_id: &str) -> Result<Vec<UserCard>, ApiError> {
        self.client
            .execute_query(RelationshipQuery::FriendRecommendations, &PageRequest::new(user_id))
    }
}
