use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app_with, Graph, Page, ResponseDto, User, UserCard};
use tower::ServiceExt;

fn graph() -> Graph {
    Graph::with_users([
        User::new("u1", "ana"),
        User::new("u2", "bruno"),
        User::new("u3", "carla"),
    ])
}

async fn body_dto(response: axum::response::Response) -> ResponseDto {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn command(uri: &str, user_id: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/v0.0.1/{uri}"))
        .header("userId", user_id)
        .body(String::new())
        .unwrap()
}

fn list(uri: &str) -> Request<String> {
    Request::builder()
        .uri(format!("/api/v0.0.1/{uri}"))
        .header("Content-Type", "application/json")
        .header("userId", "u1")
        .body(String::new())
        .unwrap()
}

/// Run one request against a fresh router over the given graph.
async fn send_once(graph: Graph, request: Request<String>) -> axum::response::Response {
    app_with(graph).oneshot(request).await.unwrap()
}

// --- follow ---

#[tokio::test]
async fn follow_returns_200_with_envelope() {
    let resp = send_once(graph(), command("follow/follow/u2", "u1")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let dto = body_dto(resp).await;
    assert_eq!(dto.status, "OK");
    assert_eq!(dto.response, "The user was followed successfully.");
    assert_eq!(dto.version, "v0.0.1");
}

#[tokio::test]
async fn follow_self_is_forbidden() {
    let resp = send_once(graph(), command("follow/follow/u1", "u1")).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn follow_unknown_user_is_404() {
    let resp = send_once(graph(), command("follow/follow/nobody", "u1")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let dto = body_dto(resp).await;
    assert_eq!(dto.status, "NOT_FOUND");
    assert!(dto.message.contains("nobody"));
}

#[tokio::test]
async fn missing_user_id_header_is_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v0.0.1/follow/follow/u2")
        .body(String::new())
        .unwrap();
    let resp = send_once(graph(), request).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unfollow_without_follow_is_conflict() {
    let resp = send_once(graph(), command("follow/unfollow/u2", "u1")).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn list_of_unknown_subject_is_404() {
    let resp = send_once(graph(), list("follow/followers/nobody")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_list_is_an_empty_page() {
    let resp = send_once(graph(), list("friend/friendsOf/u2")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let dto = body_dto(resp).await;
    let page: Page<UserCard> = serde_json::from_value(dto.response).unwrap();
    assert!(page.content.is_empty());
    assert_eq!(page.size, 12);
}

// --- full relationship lifecycle ---

#[tokio::test]
async fn relationship_lifecycle() {
    use tower::Service;

    let mut app = app_with(graph()).into_service();

    macro_rules! call {
        ($request:expr) => {
            ServiceExt::<Request<String>>::ready(&mut app)
                .await
                .unwrap()
                .call($request)
                .await
                .unwrap()
        };
    }

    // u1 and u3 follow u2
    assert_eq!(call!(command("follow/follow/u2", "u1")).status(), StatusCode::OK);
    assert_eq!(call!(command("follow/follow/u2", "u3")).status(), StatusCode::OK);
    assert_eq!(
        call!(command("follow/follow/u2", "u1")).status(),
        StatusCode::CONFLICT
    );

    // followers of u2, seen by u1, one per page
    let resp = call!(list("follow/followers/u2?page=1&size=1"));
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Page<UserCard> = serde_json::from_value(body_dto(resp).await.response).unwrap();
    assert_eq!(page.total_elements, 2);
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].id, "u3");

    // friend request u1 -> u2, then accepted by u2
    assert_eq!(
        call!(command("friend/createRequest/u2", "u1")).status(),
        StatusCode::OK
    );
    assert_eq!(
        call!(command("friend/createRequest/u1", "u2")).status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        call!(command("friend/acceptedRequest/u2", "u1")).status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        call!(command("friend/acceptedRequest/u1", "u2")).status(),
        StatusCode::OK
    );

    let resp = call!(list("friend/friendsOf/u2"));
    let page: Page<UserCard> = serde_json::from_value(body_dto(resp).await.response).unwrap();
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].id, "u1");
    assert_eq!(page.content[0].friend_count, 1);

    // u3 is recommended to u1 as a friend, u2 no longer is
    let resp = call!(list("friend/friend-recommendations-lite/u1"));
    let page: Page<UserCard> = serde_json::from_value(body_dto(resp).await.response).unwrap();
    let ids: Vec<_> = page.content.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["u3"]);

    // friendship ends; a second delete conflicts
    assert_eq!(
        call!(command("friend/deleteFriendship/u2", "u1")).status(),
        StatusCode::OK
    );
    assert_eq!(
        call!(command("friend/deleteFriendship/u2", "u1")).status(),
        StatusCode::CONFLICT
    );

    // request sent then withdrawn, or declined by the receiver
    assert_eq!(
        call!(command("friend/createRequest/u3", "u1")).status(),
        StatusCode::OK
    );
    assert_eq!(
        call!(command("friend/cancelRequest/u3", "u1")).status(),
        StatusCode::OK
    );
    assert_eq!(
        call!(command("friend/cancelRequest/u3", "u1")).status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        call!(command("friend/createRequest/u3", "u1")).status(),
        StatusCode::OK
    );
    assert_eq!(
        call!(command("friend/cancelReceivedRequest/u1", "u3")).status(),
        StatusCode::OK
    );

    // unfollow, then follow recommendations for u1 include u2 again
    assert_eq!(
        call!(command("follow/unfollow/u2", "u1")).status(),
        StatusCode::OK
    );
    let resp = call!(list("follow/follow-recommendations-lite/u1"));
    let page: Page<UserCard> = serde_json::from_value(body_dto(resp).await.response).unwrap();
    let ids: Vec<_> = page.content.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["u2", "u3"]);
}
