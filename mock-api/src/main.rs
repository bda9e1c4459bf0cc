use std::env;

use mock_api::{router, service::NoteService};

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    let addr = env::var("MOCK_API_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");
    let local_addr = listener
        .local_addr()
        .expect("Failed to read listener address");

    tracing::info!("Mock notes API starting, listening on {}", local_addr);
    tracing::info!("Notes collection served at http://{}/notes", local_addr);

    axum::serve(listener, router(NoteService::default()))
        .await
        .expect("Failed to start server");
}
