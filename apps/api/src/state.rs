use std::sync::Arc;

use tokio::sync::Mutex;

use crate::session::pipeline::Pipeline;
use crate::session::Session;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one session this service drives.
    pub session: Arc<Mutex<Session>>,
    /// Analysis and search clients. Swappable for in-memory fakes in tests.
    pub pipeline: Pipeline,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            pipeline,
        }
    }
}
