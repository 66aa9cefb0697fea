//! Client core for the SocialSeed social network.
//!
//! # Overview
//! Follow and friend operations against the SocialSeed REST API, the
//! authenticated HTTP client underneath them, and the persisted session
//! that supplies the acting user's identity. Locale bundles and the route
//! table, which also read the session, live here too.
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest`, `HttpResponse`);
//!   a `Transport` performs the round-trip, `UreqTransport` by default.
//! - Identity is injected as a `SessionProvider`, never read from a global.
//! - Every relationship mutation is a `RelationshipCommand` run through one
//!   helper; every list is a `RelationshipQuery`.
//! - Errors are logged once where they happen and returned unchanged.
//! - DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod follow;
pub mod friend;
pub mod http;
pub mod locale;
pub mod relationship;
pub mod router;
pub mod session;
pub mod transport;
pub mod types;

pub use client::AuthenticatedClient;
pub use config::ClientConfig;
pub use envelope::{unwrap_content_or_empty, ResponseEnvelope};
pub use error::{ApiError, LocaleError, SessionError};
pub use follow::FollowService;
pub use friend::FriendService;
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestConfig, Transport};
pub use locale::{LocaleCatalog, DEFAULT_LOCALE, SUPPORTED_LOCALES};
pub use relationship::{RelationshipCommand, RelationshipQuery, SocialClient};
pub use session::{
    FileStorage, MemoryStorage, SessionProvider, SessionStore, StaticSession, Storage,
};
pub use transport::UreqTransport;
pub use types::{PageRequest, SessionUser, UserCard};
