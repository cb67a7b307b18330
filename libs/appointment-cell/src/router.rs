// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/", get(handlers::get_patient_appointments))
        .route("/book", post(handlers::book_appointment))
        .route("/{appointment_id}", delete(handlers::cancel_appointment))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Nearest-availability lookup is deliberately public: prospective
    // patients check coverage before they have an account.
    Router::new()
        .route("/nearest/{specialty}", get(handlers::find_nearest_available_date))
        .merge(protected_routes)
        .with_state(state)
}
