//! Axum route handlers for the session API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::{error, info};

use crate::errors::AppError;
use crate::intake;
use crate::session::view::{render, SessionView};
use crate::session::Run;
use crate::state::AppState;

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(render(&*state.session.lock().await))
}

/// POST /api/v1/session/resume
///
/// Validates the uploaded resume, then runs analysis and search before
/// answering with the resulting view. Invalid uploads are answered with 400
/// and leave the session where it was.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let document = match intake::from_multipart(&mut multipart).await {
        Ok(document) => document,
        Err(e) => {
            if e.is_validation() {
                info!("Rejected upload: {e}");
                state.session.lock().await.reject_upload(e.user_message());
            }
            return Err(e.into());
        }
    };

    let run = state.session.lock().await.start_upload(document)?;
    drive(&state, run).await;

    Ok(Json(render(&*state.session.lock().await)))
}

/// POST /api/v1/session/retry
///
/// Replays the held resume through the whole flow.
pub async fn handle_retry(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let run = state.session.lock().await.retry()?;
    if let Some(run) = run {
        info!("Retrying run for '{}'", run.document.name());
        drive(&state, run).await;
    }

    Ok(Json(render(&*state.session.lock().await)))
}

/// Runs `run` on its own task and waits for it. The task is not tied to the
/// request, so the session still reaches Results or Failed when the client
/// goes away mid-run.
async fn drive(state: &AppState, run: Run) {
    let pipeline = state.pipeline.clone();
    let session = state.session.clone();
    let task = tokio::spawn(async move { pipeline.run(&session, run).await });
    if let Err(e) = task.await {
        error!("Pipeline task ended abnormally: {e}");
    }
}

/// DELETE /api/v1/session/resume
pub async fn handle_remove(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.remove_document();
    Json(render(&session))
}
