use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const API_PREFIX: &str = "/api/v0.0.1";
pub const API_VERSION: &str = "v0.0.1";
const RECOMMENDATIONS_LITE: usize = 6;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub language: String,
}

impl User {
    pub fn new(id: &str, user_name: &str) -> Self {
        Self {
            id: id.to_string(),
            user_name: user_name.to_string(),
            full_name: user_name.to_string(),
            email: format!("{user_name}@socialseed.test"),
            language: "EN".to_string(),
        }
    }
}

/// The backend's response DTO.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResponseDto {
    pub status: String,
    pub response: Value,
    pub message: String,
    pub version: String,
}

/// One page of a list, shaped like the backend's page object.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserCard {
    pub id: String,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub language: String,
    pub friend_count: usize,
    pub followers_count: usize,
    pub following_count: usize,
    pub friend_request_count: usize,
    pub is_friend: bool,
    pub is_request_friendship_sending: bool,
    pub is_request_friendship_received: bool,
    pub is_follower: bool,
    pub is_follow: bool,
    pub mutual_friends: usize,
}

#[derive(Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_size() -> usize {
    12
}

/// In-memory social graph. Users are kept ordered by id so pages are stable.
#[derive(Debug, Default)]
pub struct Graph {
    users: BTreeMap<String, User>,
    /// (follower, followed)
    follows: HashSet<(String, String)>,
    /// (sender, receiver)
    requests: HashSet<(String, String)>,
    /// Unordered pairs, stored with the smaller id first.
    friendships: HashSet<(String, String)>,
}

fn pair(a: &str, b: &str) -> (String, String) {
    (a.to_string(), b.to_string())
}

fn friend_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        pair(a, b)
    } else {
        pair(b, a)
    }
}

impl Graph {
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            ..Default::default()
        }
    }

    pub fn follows(&self, follower: &str, followed: &str) -> bool {
        self.follows.contains(&pair(follower, followed))
    }

    pub fn has_request(&self, sender: &str, receiver: &str) -> bool {
        self.requests.contains(&pair(sender, receiver))
    }

    pub fn are_friends(&self, a: &str, b: &str) -> bool {
        self.friendships.contains(&friend_pair(a, b))
    }

    fn friends_of(&self, id: &str) -> impl Iterator<Item = &str> + '_ {
        let id = id.to_string();
        self.friendships.iter().filter_map(move |(a, b)| {
            if *a == id {
                Some(b.as_str())
            } else if *b == id {
                Some(a.as_str())
            } else {
                None
            }
        })
    }

    fn card(&self, user: &User, viewer: Option<&str>) -> UserCard {
        let id = user.id.as_str();
        let viewer = viewer.unwrap_or_default();
        let viewer_friends: HashSet<&str> = self.friends_of(viewer).collect();
        UserCard {
            id: user.id.clone(),
            user_name: user.user_name.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            language: user.language.clone(),
            friend_count: self.friends_of(id).count(),
            followers_count: self.follows.iter().filter(|(_, b)| b == id).count(),
            following_count: self.follows.iter().filter(|(a, _)| a == id).count(),
            friend_request_count: self.requests.iter().filter(|(_, to)| to == id).count(),
            is_friend: self.are_friends(viewer, id),
            is_request_friendship_sending: self.has_request(viewer, id),
            is_request_friendship_received: self.has_request(id, viewer),
            is_follower: self.follows(id, viewer),
            is_follow: self.follows(viewer, id),
            mutual_friends: self
                .friends_of(id)
                .filter(|f| viewer_friends.contains(f))
                .count(),
        }
    }

    fn cards<'a>(
        &'a self,
        ids: impl Iterator<Item = &'a str>,
        viewer: Option<&str>,
    ) -> Vec<UserCard> {
        let mut ids: Vec<&str> = ids.collect();
        ids.sort_unstable();
        ids.into_iter()
            .filter_map(|id| self.users.get(id))
            .map(|user| self.card(user, viewer))
            .collect()
    }
}

pub type Db = Arc<RwLock<Graph>>;

type Reply = (StatusCode, Json<ResponseDto>);

fn reply(status: StatusCode, response: Value, message: &str) -> Reply {
    let name = status
        .canonical_reason()
        .unwrap_or("UNKNOWN")
        .to_uppercase()
        .replace(' ', "_");
    (
        status,
        Json(ResponseDto {
            status: name,
            response,
            message: message.to_string(),
            version: API_VERSION.to_string(),
        }),
    )
}

fn ok(message: &str) -> Reply {
    reply(StatusCode::OK, json!(message), "Successful")
}

fn error(status: StatusCode, message: impl Into<String>) -> Reply {
    reply(status, Value::Null, &message.into())
}

fn paged(cards: Vec<UserCard>, params: &PageParams) -> Reply {
    let size = params.size.max(1);
    let total_elements = cards.len();
    let content = cards
        .into_iter()
        .skip(params.page.saturating_mul(size))
        .take(size)
        .collect();
    let page = Page {
        content,
        number: params.page,
        size,
        total_elements,
        total_pages: total_elements.div_ceil(size),
    };
    reply(StatusCode::OK, json!(page), "Successful")
}

fn requester(headers: &HeaderMap) -> Result<String, Reply> {
    headers
        .get("userid")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "Missing userId header"))
}

fn viewer(headers: &HeaderMap) -> Option<String> {
    requester(headers).ok()
}

/// Checks shared by every relationship command.
fn check_parties(graph: &Graph, me: &str, target: &str) -> Result<(), Reply> {
    if me == target {
        return Err(error(
            StatusCode::FORBIDDEN,
            "The user making the request and the target user are the same.",
        ));
    }
    for id in [me, target] {
        if !graph.users.contains_key(id) {
            return Err(error(
                StatusCode::NOT_FOUND,
                format!("The user with id: {id} not found."),
            ));
        }
    }
    Ok(())
}

fn check_subject(graph: &Graph, id: &str) -> Result<(), Reply> {
    if graph.users.contains_key(id) {
        Ok(())
    } else {
        Err(error(
            StatusCode::NOT_FOUND,
            format!("The user with id: {id} not found."),
        ))
    }
}

pub fn app() -> Router {
    app_with(Graph::default())
}

pub fn app_with(graph: Graph) -> Router {
    router(Arc::new(RwLock::new(graph)))
}

pub fn router(db: Db) -> Router {
    let follow = Router::new()
        .route("/follow/{id}", post(follow_user))
        .route("/unfollow/{id}", post(unfollow_user))
        .route("/following/{id}", get(following))
        .route("/followers/{id}", get(followers))
        .route("/follow-recommendations-lite/{id}", get(follow_recommendations));
    let friend = Router::new()
        .route("/createRequest/{id}", post(create_request))
        .route("/cancelRequest/{id}", post(cancel_request))
        .route("/cancelReceivedRequest/{id}", post(cancel_received_request))
        .route("/acceptedRequest/{id}", post(accept_request))
        .route("/deleteFriendship/{id}", post(delete_friendship))
        .route("/friendsOf/{id}", get(friends_of))
        .route("/friend-recommendations-lite/{id}", get(friend_recommendations));

    Router::new()
        .nest(
            API_PREFIX,
            Router::new().nest("/follow", follow).nest("/friend", friend),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock backend listening");
    }
    axum::serve(listener, app).await
}

// --- follow ---

async fn follow_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Reply, Reply> {
    let me = requester(&headers)?;
    let mut graph = db.write().await;
    check_parties(&graph, &me, &id)?;
    if graph.follows(&me, &id) {
        return Err(error(StatusCode::CONFLICT, "You are already following the user"));
    }
    graph.follows.insert(pair(&me, &id));
    debug!(%me, followed = %id, "follow");
    Ok(ok("The user was followed successfully."))
}

async fn unfollow_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Reply, Reply> {
    let me = requester(&headers)?;
    let mut graph = db.write().await;
    check_parties(&graph, &me, &id)?;
    if !graph.follows.remove(&pair(&me, &id)) {
        return Err(error(StatusCode::CONFLICT, "Doesn't follow the user yet"));
    }
    Ok(ok("The user was unfollowed successfully."))
}

async fn following(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Reply, Reply> {
    let graph = db.read().await;
    check_subject(&graph, &id)?;
    let ids = graph
        .follows
        .iter()
        .filter(|(a, _)| *a == id)
        .map(|(_, b)| b.as_str());
    Ok(paged(graph.cards(ids, viewer(&headers).as_deref()), &params))
}

async fn followers(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Reply, Reply> {
    let graph = db.read().await;
    check_subject(&graph, &id)?;
    let ids = graph
        .follows
        .iter()
        .filter(|(_, b)| *b == id)
        .map(|(a, _)| a.as_str());
    Ok(paged(graph.cards(ids, viewer(&headers).as_deref()), &params))
}

async fn follow_recommendations(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Reply, Reply> {
    let graph = db.read().await;
    check_subject(&graph, &id)?;
    let ids = graph
        .users
        .keys()
        .map(String::as_str)
        .filter(|other| *other != id && !graph.follows(&id, other));
    let cards = graph.cards(ids, Some(&id));
    Ok(paged(
        cards,
        &PageParams {
            page: 0,
            size: RECOMMENDATIONS_LITE,
        },
    ))
}

// --- friend ---

async fn create_request(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Reply, Reply> {
    let me = requester(&headers)?;
    let mut graph = db.write().await;
    check_parties(&graph, &me, &id)?;
    if graph.has_request(&me, &id) || graph.has_request(&id, &me) {
        return Err(error(StatusCode::CONFLICT, "The Friend Request already exists"));
    }
    if graph.are_friends(&me, &id) {
        return Err(error(StatusCode::CONFLICT, "The Friendship already exists"));
    }
    graph.requests.insert(pair(&me, &id));
    Ok(ok("The friend request was sent successfully."))
}

async fn cancel_request(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Reply, Reply> {
    let me = requester(&headers)?;
    let mut graph = db.write().await;
    check_parties(&graph, &me, &id)?;
    if !graph.requests.remove(&pair(&me, &id)) {
        return Err(error(StatusCode::NOT_FOUND, "The Friend Request does not exist"));
    }
    Ok(ok("The friend request was cancelled successfully."))
}

async fn cancel_received_request(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Reply, Reply> {
    let me = requester(&headers)?;
    let mut graph = db.write().await;
    check_parties(&graph, &me, &id)?;
    if !graph.requests.remove(&pair(&id, &me)) {
        return Err(error(StatusCode::NOT_FOUND, "The Friend Request does not exist"));
    }
    Ok(ok("The received friend request was declined successfully."))
}

async fn accept_request(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Reply, Reply> {
    let me = requester(&headers)?;
    let mut graph = db.write().await;
    check_parties(&graph, &me, &id)?;
    if !graph.has_request(&id, &me) {
        return Err(error(
            StatusCode::NOT_FOUND,
            "The Friendship Request does not exist.",
        ));
    }
    if graph.are_friends(&me, &id) {
        return Err(error(StatusCode::CONFLICT, "The Friendship already exists."));
    }
    graph.requests.remove(&pair(&id, &me));
    graph.friendships.insert(friend_pair(&me, &id));
    Ok(ok("The friend request was accepted successfully."))
}

async fn delete_friendship(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Reply, Reply> {
    let me = requester(&headers)?;
    let mut graph = db.write().await;
    check_parties(&graph, &me, &id)?;
    if !graph.friendships.remove(&friend_pair(&me, &id)) {
        return Err(error(
            StatusCode::CONFLICT,
            "There is no friendship relationship between users.",
        ));
    }
    Ok(ok("The friendship was deleted successfully."))
}

async fn friends_of(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Reply, Reply> {
    let graph = db.read().await;
    check_subject(&graph, &id)?;
    Ok(paged(
        graph.cards(graph.friends_of(&id), viewer(&headers).as_deref()),
        &params,
    ))
}

async fn friend_recommendations(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Reply, Reply> {
    let graph = db.read().await;
    check_subject(&graph, &id)?;
    let ids = graph.users.keys().map(String::as_str).filter(|other| {
        *other != id
            && !graph.are_friends(&id, other)
            && !graph.has_request(&id, other)
            && !graph.has_request(other, &id)
    });
    let cards = graph.cards(ids, Some(&id));
    Ok(paged(
        cards,
        &PageParams {
            page: 0,
            size: RECOMMENDATIONS_LITE,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> Graph {
        Graph::with_users([User::new("u1", "ana"), User::new("u2", "bob"), User::new("u3", "cai")])
    }

    #[test]
    fn friend_pairs_are_unordered() {
        assert_eq!(friend_pair("u2", "u1"), friend_pair("u1", "u2"));
    }

    #[test]
    fn card_reflects_viewer_relationships() {
        let mut g = graph();
        g.follows.insert(pair("u1", "u2"));
        g.follows.insert(pair("u2", "u1"));
        g.friendships.insert(friend_pair("u1", "u3"));
        g.friendships.insert(friend_pair("u2", "u3"));
        g.requests.insert(pair("u1", "u2"));

        let card = g.card(&g.users["u2"], Some("u1"));
        assert!(card.is_follow);
        assert!(card.is_follower);
        assert!(card.is_request_friendship_sending);
        assert!(!card.is_request_friendship_received);
        assert!(!card.is_friend);
        assert_eq!(card.mutual_friends, 1);
        assert_eq!(card.followers_count, 1);
        assert_eq!(card.friend_request_count, 1);
    }

    #[test]
    fn card_serializes_camel_case() {
        let g = graph();
        let json = serde_json::to_value(g.card(&g.users["u1"], None)).unwrap();
        assert_eq!(json["userName"], "ana");
        assert_eq!(json["isFollow"], false);
        assert!(json.get("user_name").is_none());
    }

    #[test]
    fn paging_slices_and_counts() {
        let g = graph();
        let cards = g.cards(g.users.keys().map(String::as_str), None);
        let (status, Json(dto)) = paged(cards, &PageParams { page: 1, size: 2 });
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dto.status, "OK");
        assert_eq!(dto.response["content"].as_array().unwrap().len(), 1);
        assert_eq!(dto.response["content"][0]["id"], "u3");
        assert_eq!(dto.response["totalElements"], 3);
        assert_eq!(dto.response["totalPages"], 2);
    }

    #[test]
    fn error_status_names_match_backend() {
        let (_, Json(dto)) = error(StatusCode::NOT_FOUND, "gone");
        assert_eq!(dto.status, "NOT_FOUND");
        assert_eq!(dto.message, "gone");
        assert_eq!(dto.version, "v0.0.1");
    }
}
