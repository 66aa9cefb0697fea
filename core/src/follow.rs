//! Follow relationships.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::Transport;
use crate::relationship::{RelationshipCommand, RelationshipQuery, SocialClient};
use crate::session::SessionProvider;
use crate::types::{PageRequest, UserCard};

/// Follow operations, borrowed from a `SocialClient`.
pub struct FollowService<'a, T, P> {
    client: &'a SocialClient<T, P>,
}

impl<'a, T: Transport, P: SessionProvider> FollowService<'a, T, P> {
    pub(crate) fn new(client: &'a SocialClient<T, P>) -> Self {
        Self { client }
    }

    pub fn follow_user(&self, target: &str) -> Result<Option<Value>, ApiError> {
        self.client.execute_command(RelationshipCommand::Follow, target)
    }

    pub fn unfollow_user(&self, target: &str) -> Result<Option<Value>, ApiError> {
        self.client.execute_command(RelationshipCommand::Unfollow, target)
    }

    /// Users that `page.user_id` follows.
    pub fn get_follows(&self, page: &PageRequest) -> Result<Vec<UserCard>, ApiError> {
        self.client.execute_query(RelationshipQuery::Following, page)
    }

    /// Users following `page.user_id`.
    pub fn get_followers(&self, page: &PageRequest) -> Result<Vec<UserCard>, ApiError> {
        self.client.execute_query(RelationshipQuery::Followers, page)
    }

    pub fn get_follow_recommendations(&self, user_id: &str) -> Result<Vec<UserCard>, ApiError> {
        self.client
            .execute_query(RelationshipQuery::FollowRecommendations, &PageRequest::new(user_id))
    }
}
