// libs/scheduling-cell/src/services/conflict.rs
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;
use uuid::Uuid;

use crate::models::{Interval, SchedulingError};
use crate::store::ScheduleStore;

/// Decides whether a doctor is free for a requested interval, against
/// working hours and existing scheduled appointments. Read-only; the
/// booking service owns policy rules such as rejecting past dates.
pub struct ConflictDetectionService<S> {
    store: Arc<S>,
}

impl<S: ScheduleStore> ConflictDetectionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// True iff [time, time + duration) lies within the doctor's working
    /// hours for the date and overlaps no scheduled appointment. A doctor
    /// with no working hours that day is never available. Non-positive
    /// durations are a validation error, not "unavailable".
    pub async fn is_doctor_available(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: i32,
    ) -> Result<bool, SchedulingError> {
        let requested = Interval::from_start(time, duration_minutes)?;

        let hours = match self.store.working_hours(doctor_id, date).await? {
            Some(hours) => hours,
            None => {
                debug!("Doctor {} has no working hours on {}", doctor_id, date);
                return Ok(false);
            }
        };

        if !hours.contains(&requested) {
            debug!(
                "Requested interval {} outside working hours {} for doctor {} on {}",
                requested, hours, doctor_id, date
            );
            return Ok(false);
        }

        let appointments = self.store.scheduled_appointments(doctor_id, date).await?;
        let conflict = appointments
            .iter()
            .filter_map(|appointment| appointment.interval())
            .any(|booked| booked.overlaps(&requested));

        if conflict {
            debug!(
                "Requested interval {} conflicts with an existing booking for doctor {} on {}",
                requested, doctor_id, date
            );
        }

        Ok(!conflict)
    }
}
