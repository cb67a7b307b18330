// libs/doctor-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

/// Doctor directory routes are public: browsing doctors and their free
/// slots requires no account.
pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}/slots", get(handlers::get_doctor_slots))
        .with_state(state)
}
