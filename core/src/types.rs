//! Domain DTOs for the SocialSeed API.
//!
//! # Design
//! Field names follow the backend's camelCase JSON. These types are defined
//! independently from the mock-server crate; integration tests catch any
//! schema drift between the two.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const DEFAULT_PAGE: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// The locally cached authenticated user.
///
/// Only `id` is required. The backend sends `null` for anything it has not
/// filled in, so every other field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionUser {
    pub id: String,
    /// ISO 8601, as sent by the backend.
    pub date_born: Option<String>,
    pub registration_date: Option<String>,
    pub full_name: Option<String>,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub language: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub on_vacation: Option<bool>,
    pub is_active: Option<bool>,
    pub is_deleted: Option<bool>,
    pub friend_count: Option<u32>,
    pub followers_count: Option<u32>,
    pub following_count: Option<u32>,
    pub friend_request_count: Option<u32>,
}

/// A relationship summary as carried in list envelopes.
///
/// Everything except `id` describes the user *as seen by the requester*
/// (`is_follow` means "the requester follows this user"). All fields default
/// so partial records still decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserCard {
    pub id: String,
    pub date_born: Option<String>,
    pub registration_date: Option<String>,
    pub full_name: Option<String>,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub language: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub on_vacation: Option<bool>,
    pub is_active: Option<bool>,
    pub is_deleted: Option<bool>,
    pub friend_count: Option<u32>,
    pub followers_count: Option<u32>,
    pub following_count: Option<u32>,
    pub friend_request_count: Option<u32>,
    pub is_friend: Option<bool>,
    pub is_request_friendship_sending: Option<bool>,
    pub is_request_friendship_received: Option<bool>,
    pub is_follower: Option<bool>,
    pub is_follow: Option<bool>,
    pub mutual_friends: Option<u32>,
}

/// A paginated list query about `user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub user_id: String,
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// First page with the default page size.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        if self.page_size == 0 {
            return Err(ApiError::InvalidPageSize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_defaults() {
        let req = PageRequest::new("u1");
        assert_eq!(req.page, 0);
        assert_eq!(req.page_size, 12);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = PageRequest::new("u1").page_size(0).validate().unwrap_err();
        assert!(matches!(err, ApiError::InvalidPageSize));
    }

    #[test]
    fn session_user_uses_camel_case() {
        let user = SessionUser {
            id: "u1".to_string(),
            full_name: Some("Ana Pérez".to_string()),
            friend_request_count: Some(2),
            ..Default::default()
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["fullName"], "Ana Pérez");
        assert_eq!(json["friendRequestCount"], 2);
        assert!(json.get("full_name").is_none());
    }

    #[test]
    fn session_user_accepts_backend_nulls() {
        let raw = r#"{"id":"u1","userName":"ana","fullName":null,"email":null,
            "onVacation":null,"isActive":true,"isDeleted":null,"friendCount":null,
            "followersCount":4,"followingCount":null,"friendRequestCount":null,
            "language":null,"dateBorn":null}"#;
        let user: SessionUser = serde_json::from_str(raw).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.user_name.as_deref(), Some("ana"));
        assert_eq!(user.friend_count, None);
        assert_eq!(user.followers_count, Some(4));
        assert_eq!(user.is_active, Some(true));
    }

    #[test]
    fn partial_card_decodes() {
        let card: UserCard = serde_json::from_str(r#"{"id":"u3","isFollow":true}"#).unwrap();
        assert_eq!(card.id, "u3");
        assert_eq!(card.is_follow, Some(true));
        assert!(card.user_name.is_none());
    }
}
