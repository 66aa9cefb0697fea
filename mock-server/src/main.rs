use mock_server::{app_with, Graph, User};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const DEMO_USERS: [&str; 4] = ["ana", "bruno", "carla", "diego"];

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "mock_server=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let users: Vec<User> = DEMO_USERS
        .iter()
        .map(|name| User::new(&Uuid::new_v4().to_string(), name))
        .collect();
    for user in &users {
        info!(id = %user.id, user_name = %user.user_name, "seeded user");
    }

    let port = std::env::var("PORT").unwrap_or_else(|_| "8081".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    mock_server::run(listener, app_with(Graph::with_users(users))).await
}
