// libs/appointment-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scheduling_cell::models::TimeSlot;

/// Booking request body. The patient id is never part of the payload; it is
/// resolved from the verified token by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestAvailabilityResponse {
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time_slots: Vec<TimeSlot>,
}
