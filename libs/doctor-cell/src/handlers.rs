// libs/doctor-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use scheduling_cell::models::SchedulingError;

use crate::services::directory::DoctorDirectoryService;

#[derive(Debug, Deserialize)]
pub struct DoctorListQuery {
    pub specialty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

fn map_scheduling_error(err: SchedulingError) -> AppError {
    match err {
        SchedulingError::Validation(msg) => AppError::BadRequest(msg),
        SchedulingError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
        SchedulingError::Conflict => {
            AppError::BadRequest("Requested time slot is not available".to_string())
        }
        SchedulingError::Store(msg) => AppError::Internal(msg),
    }
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<Value>, AppError> {
    let directory = DoctorDirectoryService::new(&state);

    let doctors = match query.specialty.as_deref() {
        Some(specialty) => directory.list_by_specialty(specialty).await,
        None => directory.list_doctors().await,
    }
    .map_err(map_scheduling_error)?;

    Ok(Json(json!({ "doctors": doctors })))
}

/// Free slots of one doctor on one day, chronological. An empty list is a
/// valid answer: fully booked or not working that day.
#[axum::debug_handler]
pub async fn get_doctor_slots(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let directory = DoctorDirectoryService::new(&state);

    let time_slots = directory
        .available_slots(doctor_id, query.date)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "date": query.date,
        "time_slots": time_slots
    })))
}
