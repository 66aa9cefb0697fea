//! Relationship commands and queries, and the client that runs them.
//!
//! # Design
//! The backend models every relationship change the same way: a bodiless
//! POST whose path names the action and the counterpart, with the actor in
//! the `userId` header. `RelationshipCommand` captures the action and
//! `SocialClient::execute_command` is the single routine that fires one.
//! Reads are the mirror image: `RelationshipQuery` names the list and
//! `SocialClient::execute_query` fetches and unwraps it. The per-service
//! methods in `follow` and `friend` are one-line bindings onto these two.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;
use tracing::debug;

use crate::client::AuthenticatedClient;
use crate::envelope::decode_cards;
use crate::error::ApiError;
use crate::follow::FollowService;
use crate::friend::FriendService;
use crate::http::{HttpMethod, HttpRequest, RequestConfig, Transport};
use crate::session::SessionProvider;
use crate::types::{PageRequest, UserCard};

/// Characters escaped when an id is placed in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn fill(template: &str, id: &str) -> String {
    template.replace("{id}", &utf8_percent_encode(id, PATH_SEGMENT).to_string())
}

/// A relationship change aimed at another user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipCommand {
    Follow,
    Unfollow,
    SendFriendRequest,
    CancelSentFriendRequest,
    CancelReceivedFriendRequest,
    AcceptFriendRequest,
    DeleteFriendship,
}

impl RelationshipCommand {
    pub fn method(self) -> HttpMethod {
        HttpMethod::Post
    }

    /// Path relative to the API base; `{id}` is the target user.
    pub fn path_template(self) -> &'static str {
        match self {
            RelationshipCommand::Follow => "follow/follow/{id}",
            RelationshipCommand::Unfollow => "follow/unfollow/{id}",
            RelationshipCommand::SendFriendRequest => "friend/createRequest/{id}",
            RelationshipCommand::CancelSentFriendRequest => "friend/cancelRequest/{id}",
            RelationshipCommand::CancelReceivedFriendRequest => "friend/cancelReceivedRequest/{id}",
            RelationshipCommand::AcceptFriendRequest => "friend/acceptedRequest/{id}",
            RelationshipCommand::DeleteFriendship => "friend/deleteFriendship/{id}",
        }
    }

    pub fn path(self, target: &str) -> String {
        fill(self.path_template(), target)
    }
}

/// A list of users related to a subject user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipQuery {
    Following,
    Followers,
    Friends,
    FollowRecommendations,
    FriendRecommendations,
}

impl RelationshipQuery {
    /// Path relative to the API base; `{id}` is the subject user.
    pub fn path_template(self) -> &'static str {
        match self {
            RelationshipQuery::Following => "follow/following/{id}",
            RelationshipQuery::Followers => "follow/followers/{id}",
            RelationshipQuery::Friends => "friend/friendsOf/{id}",
            RelationshipQuery::FollowRecommendations => "follow/follow-recommendations-lite/{id}",
            RelationshipQuery::FriendRecommendations => "friend/friend-recommendations-lite/{id}",
        }
    }

    /// Recommendation endpoints return a fixed-size page and take no paging.
    pub fn is_paginated(self) -> bool {
        !matches!(
            self,
            RelationshipQuery::FollowRecommendations | RelationshipQuery::FriendRecommendations
        )
    }

    pub fn path(self, subject: &str) -> String {
        fill(self.path_template(), subject)
    }
}

/// Entry point for relationship operations.
pub struct SocialClient<T, P> {
    http: AuthenticatedClient<T, P>,
}

impl<T: Transport, P: SessionProvider> SocialClient<T, P> {
    pub fn new(base_url: &str, transport: T, session: P) -> Self {
        Self {
            http: AuthenticatedClient::new(base_url, transport, session),
        }
    }

    pub fn http(&self) -> &AuthenticatedClient<T, P> {
        &self.http
    }

    pub fn follows(&self) -> FollowService<'_, T, P> {
        FollowService::new(self)
    }

    pub fn friends(&self) -> FriendService<'_, T, P> {
        FriendService::new(self)
    }

    /// The request `execute_command` sends.
    pub fn build_command(&self, command: RelationshipCommand, target: &str) -> HttpRequest {
        self.http
            .build_command(command.method(), &self.http.url(&command.path(target)))
    }

    /// Fire `command` at `target`. `Some(body)` on 200, `None` on other 2xx.
    pub fn execute_command(
        &self,
        command: RelationshipCommand,
        target: &str,
    ) -> Result<Option<Value>, ApiError> {
        debug!(?command, target_id = target, "relationship command");
        self.http.dispatch(&self.build_command(command, target))
    }

    /// The request `execute_query` sends. Fails before building when the
    /// page size is invalid.
    pub fn build_query(
        &self,
        query: RelationshipQuery,
        page: &PageRequest,
    ) -> Result<HttpRequest, ApiError> {
        let config = query_config(query, page)?;
        self.http
            .build_get(&self.http.url(&query.path(&page.user_id)), &config)
    }

    /// Fetch one page of `query`. A missing or malformed envelope is an
    /// empty list.
    pub fn execute_query(
        &self,
        query: RelationshipQuery,
        page: &PageRequest,
    ) -> Result<Vec<UserCard>, ApiError> {
        let request = self.build_query(query, page)?;
        debug!(?query, user_id = %page.user_id, page = page.page, size = page.page_size, "relationship query");
        let body = self.http.fetch(&request)?;
        decode_cards(&body)
    }
}

fn query_config(query: RelationshipQuery, page: &PageRequest) -> Result<RequestConfig, ApiError> {
    if !query.is_paginated() {
        return Ok(RequestConfig::default());
    }
    page.validate()?;
    Ok(RequestConfig::default()
        .param("page", page.page)
        .param("size", page.page_size))
}
