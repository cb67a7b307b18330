// libs/scheduling-cell/src/models.rs
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// TIME PRIMITIVES
// ==============================================================================

/// Half-open time range within a single day: [start, end).
/// Two intervals that merely touch at an endpoint do not overlap, so
/// back-to-back appointments are always compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Interval {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, SchedulingError> {
        if start >= end {
            return Err(SchedulingError::Validation(format!(
                "Interval start {} must be before end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Build [start, start + duration). Rejects non-positive durations and
    /// intervals that would spill past midnight.
    pub fn from_start(start: NaiveTime, duration_minutes: i32) -> Result<Self, SchedulingError> {
        if duration_minutes <= 0 {
            return Err(SchedulingError::Validation(format!(
                "Duration must be positive, got {} minutes",
                duration_minutes
            )));
        }

        let (end, wrapped_days) =
            start.overflowing_add_signed(Duration::minutes(duration_minutes as i64));
        if wrapped_days != 0 {
            return Err(SchedulingError::Validation(
                "Appointment must start and end on the same day".to_string(),
            ));
        }

        Self::new(start, end)
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, inner: &Interval) -> bool {
        self.start <= inner.start && inner.end <= self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// A bookable candidate offered to a patient. Transient: never persisted,
/// recomputed on every query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i32,
}

impl From<Interval> for TimeSlot {
    fn from(interval: Interval) -> Self {
        Self {
            start_time: interval.start,
            end_time: interval.end,
            duration_minutes: (interval.end - interval.start).num_minutes() as i32,
        }
    }
}

// ==============================================================================
// DOCTOR AND APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub specialty: String,
    /// Granularity used to quantize this doctor's working hours into slots.
    pub slot_duration_minutes: i32,
    pub is_available: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub status: AppointmentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Appointment {
    /// Occupied interval of this appointment. `None` for rows violating the
    /// single-day invariant; such rows cannot block anything.
    pub fn interval(&self) -> Option<Interval> {
        Interval::from_start(self.start_time, self.duration_minutes).ok()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Insert payload for a booking that already passed the availability check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
}

/// Result of the forward search over dates and doctors of a specialty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestAvailability {
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub date: NaiveDate,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Requested time slot is not available")]
    Conflict,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),
}
