use tracing::debug;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a static health payload and the number of running tests.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let active_sessions = state.sessions().len();
    debug!(active_sessions, "health check");
    HealthResponse::ok(active_sessions)
}
