pub mod config;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod ingest;
pub mod types;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use config::CorsOrigins;
use handlers::AppState;

pub fn build_router(state: Arc<AppState>, origins: &CorsOrigins) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/upload_csv", post(handlers::upload_csv))
        .route("/send_sms", post(handlers::send_sms))
        // Uploads are buffered whole, with no size cap.
        .layer(DefaultBodyLimit::disable())
        .layer(origins.layer())
        .with_state(state)
}
