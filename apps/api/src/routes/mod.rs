pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::intake::{MAX_UPLOAD_BYTES, MULTIPART_OVERHEAD_BYTES};
use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route(
            "/api/v1/session/resume",
            post(handlers::handle_upload)
                .delete(handlers::handle_remove)
                .layer(DefaultBodyLimit::max(
                    MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES,
                )),
        )
        .route("/api/v1/session/retry", post(handlers::handle_retry))
        .with_state(state)
}
