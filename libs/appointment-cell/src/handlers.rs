// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use scheduling_cell::models::SchedulingError;

use crate::models::BookAppointmentRequest;
use crate::services::booking::AppointmentBookingService;

/// One mapping from core outcomes to HTTP for every handler: conflicts and
/// validation failures are client errors, only store failures become a 500.
fn map_scheduling_error(err: SchedulingError) -> AppError {
    match err {
        SchedulingError::Validation(msg) => AppError::BadRequest(msg),
        SchedulingError::Conflict => AppError::BadRequest(
            "The doctor is not available on the specified date and time".to_string(),
        ),
        SchedulingError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
        SchedulingError::Store(msg) => AppError::Internal(msg),
    }
}

fn patient_id(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id)
        .map_err(|_| AppError::Auth("Token subject is not a valid patient id".to_string()))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let patient_id = patient_id(&user)?;
    let booking_service = AppointmentBookingService::new(&state, Some(auth.token()));

    let appointment = booking_service
        .book_appointment(patient_id, request)
        .await
        .map_err(map_scheduling_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Appointment successfully scheduled",
            "appointment": appointment
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let patient_id = patient_id(&user)?;
    let booking_service = AppointmentBookingService::new(&state, Some(auth.token()));

    let appointments = booking_service
        .patient_appointments(patient_id)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let patient_id = patient_id(&user)?;
    let booking_service = AppointmentBookingService::new(&state, Some(auth.token()));

    booking_service
        .cancel_appointment(appointment_id, patient_id)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({ "message": "Appointment cancelled" })))
}

/// Public lookup: which doctor of a specialty has the earliest free slot.
/// Runs without a caller token; only reads data visible to anonymous users.
#[axum::debug_handler]
pub async fn find_nearest_available_date(
    State(state): State<Arc<AppConfig>>,
    Path(specialty): Path<String>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state, None);

    let nearest = booking_service
        .find_nearest_availability(&specialty)
        .await
        .map_err(map_scheduling_error)?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No availability found for specialty '{}' within the search horizon",
                specialty
            ))
        })?;

    Ok(Json(json!(nearest)))
}
