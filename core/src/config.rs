//! Client configuration from the environment.

use std::env;
use std::path::PathBuf;

use crate::relationship::SocialClient;
use crate::session::{FileStorage, SessionProvider, SessionStore};
use crate::transport::UreqTransport;

pub const DEFAULT_API_URL: &str = "http://localhost:8081/api/v0.0.1/";
pub const DEFAULT_SESSION_DIR: &str = ".socialseed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root every endpoint path is joined onto.
    pub api_url: String,
    /// Directory backing the persisted session.
    pub session_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
        }
    }
}

impl ClientConfig {
    /// Reads `SOCIALSEED_API_URL` and `SOCIALSEED_SESSION_DIR`, falling back
    /// to the defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("SOCIALSEED_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            session_dir: env::var("SOCIALSEED_SESSION_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_DIR)),
        }
    }

    pub fn session_store(&self) -> SessionStore<FileStorage> {
        SessionStore::new(FileStorage::new(&self.session_dir))
    }

    /// A client talking to `api_url` over ureq.
    pub fn client<P: SessionProvider>(&self, session: P) -> SocialClient<UreqTransport, P> {
        SocialClient::new(&self.api_url, UreqTransport::new(), session)
    }
}
