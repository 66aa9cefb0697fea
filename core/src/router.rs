//! The application's route table and navigation hook.
//!
//! Patterns are `/`-separated; a segment starting with `:` captures one path
//! segment. Paths nothing matches resolve to `NOT_FOUND`.

use std::collections::HashMap;

use crate::error::LocaleError;
use crate::locale::{resolve_locale, LocaleCatalog};
use crate::session::SessionProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    /// `None` for the catch-all.
    pub pattern: Option<&'static str>,
    pub show_header: bool,
    /// Enclosing layout route, for the profile sub-views.
    pub parent: Option<&'static str>,
}

const fn route(name: &'static str, pattern: &'static str, show_header: bool) -> Route {
    Route {
        name,
        pattern: Some(pattern),
        show_header,
        parent: None,
    }
}

const fn profile_view(name: &'static str, pattern: &'static str) -> Route {
    Route {
        name,
        pattern: Some(pattern),
        show_header: true,
        parent: Some("SocialUserProfile"),
    }
}

pub const ROUTES: &[Route] = &[
    route("login", "/login", false),
    route("feed", "/", true),
    profile_view("SocialUserDetails", "/su-profile/:id"),
    profile_view("SocialUserFriends", "/su-profile/:id/friends"),
    profile_view("SocialUserFollows", "/su-profile/:id/follows"),
    profile_view("SocialUserFollowers", "/su-profile/:id/followers"),
    route("post-details", "/post/:id", true),
    route(
        "list-of-friends-recommendations",
        "/list/friends-Recommendations",
        true,
    ),
    route(
        "list-of-follow-recommendations",
        "/list/follow-Recommendations",
        true,
    ),
    NOT_FOUND,
];

/// Matches whatever nothing else in `ROUTES` does.
pub const NOT_FOUND: Route = Route {
    name: "notFound",
    pattern: None,
    show_header: true,
    parent: None,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: Route,
    pub params: HashMap<String, String>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Match `path` (query and fragment ignored) against the table.
pub fn resolve(path: &str) -> RouteMatch {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    ROUTES
        .iter()
        .find_map(|route| {
            let params = match_pattern(route.pattern?, &segments)?;
            Some(RouteMatch {
                route: *route,
                params,
            })
        })
        .unwrap_or_else(|| RouteMatch {
            route: NOT_FOUND,
            params: HashMap::from([("pathMatch".to_string(), path.to_string())]),
        })
}

fn match_pattern(pattern: &str, segments: &[&str]) -> Option<HashMap<String, String>> {
    let parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() != segments.len() {
        return None;
    }
    let mut params = HashMap::new();
    for (part, segment) in parts.iter().zip(segments) {
        match part.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), segment.to_string());
            }
            None if part == segment => {}
            None => return None,
        }
    }
    Some(params)
}

/// Before rendering: make the session's locale loaded and active, then
/// resolve the route.
pub fn navigate(
    path: &str,
    session: &impl SessionProvider,
    catalog: &mut LocaleCatalog,
) -> Result<RouteMatch, LocaleError> {
    let locale = resolve_locale(session);
    catalog.activate(locale)?;
    Ok(resolve(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::StaticSession;
    use crate::types::SessionUser;

    #[test]
    fn static_routes() {
        assert_eq!(resolve("/").route.name, "feed");
        let login = resolve("/login");
        assert_eq!(login.route.name, "login");
        assert!(!login.route.show_header);
        assert_eq!(
            resolve("/list/follow-Recommendations?x=1").route.name,
            "list-of-follow-recommendations"
        );
    }

    #[test]
    fn profile_views_capture_id() {
        let m = resolve("/su-profile/u42/followers");
        assert_eq!(m.route.name, "SocialUserFollowers");
        assert_eq!(m.route.parent, Some("SocialUserProfile"));
        assert_eq!(m.param("id"), Some("u42"));

        let m = resolve("/su-profile/u42/");
        assert_eq!(m.route.name, "SocialUserDetails");
        assert_eq!(m.param("id"), Some("u42"));
    }

    #[test]
    fn unknown_paths_fall_through() {
        let m = resolve("/su-profile/u42/photos");
        assert_eq!(m.route.name, "notFound");
        assert_eq!(m.param("pathMatch"), Some("/su-profile/u42/photos"));
        assert_eq!(resolve("/post").route.name, "notFound");
    }

    #[test]
    fn catch_all_is_last_and_never_matched_by_pattern() {
        assert_eq!(ROUTES.last(), Some(&NOT_FOUND));
        let m = resolve("/a/b/c/d");
        assert_eq!(m.route, NOT_FOUND);
        assert_eq!(m.params.len(), 1);
    }

    #[test]
    fn navigate_activates_session_locale() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.json"), r#"{"feed":"Feed"}"#).unwrap();
        std::fs::write(dir.path().join("es.json"), r#"{"feed":"Inicio"}"#).unwrap();
        let mut catalog = LocaleCatalog::open(dir.path()).unwrap();

        let session = StaticSession::signed_in(SessionUser {
            id: "u1".to_string(),
            language: Some("ES".to_string()),
            ..Default::default()
        });
        let m = navigate("/post/p1", &session, &mut catalog).unwrap();
        assert_eq!(m.route.name, "post-details");
        assert_eq!(catalog.active(), "ES");
        assert_eq!(catalog.t("feed"), "Inicio");

        navigate("/", &StaticSession::anonymous(), &mut catalog).unwrap();
        assert_eq!(catalog.active(), "EN");
    }
}
