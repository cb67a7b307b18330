// libs/scheduling-cell/src/services/slots.rs
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::models::{Doctor, Interval, SchedulingError, TimeSlot};
use crate::store::ScheduleStore;

/// Enumerates the bookable slots of a doctor on a date by quantizing the
/// working hours at the doctor's slot granularity and dropping candidates
/// that overlap a scheduled appointment.
pub struct SlotService<S> {
    store: Arc<S>,
}

impl<S: ScheduleStore> SlotService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn get_available_time_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, SchedulingError> {
        let doctor = self.store.get_doctor(doctor_id).await?;
        self.slots_for_doctor(&doctor, date).await
    }

    /// Same computation with the doctor row already in hand; the nearest
    /// availability search calls this once per (doctor, date) candidate.
    ///
    /// Deterministic: the same doctor, date and stored appointments always
    /// produce the same chronological slot sequence.
    pub async fn slots_for_doctor(
        &self,
        doctor: &Doctor,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, SchedulingError> {
        if doctor.slot_duration_minutes <= 0 {
            return Err(SchedulingError::Validation(format!(
                "Doctor {} has invalid slot duration {}",
                doctor.id, doctor.slot_duration_minutes
            )));
        }

        let hours = match self.store.working_hours(doctor.id, date).await? {
            Some(hours) => hours,
            None => return Ok(vec![]),
        };

        let booked: Vec<Interval> = self
            .store
            .scheduled_appointments(doctor.id, date)
            .await?
            .iter()
            .filter_map(|appointment| appointment.interval())
            .collect();

        let granularity = Duration::minutes(doctor.slot_duration_minutes as i64);
        let mut slots = Vec::new();
        let mut cursor = hours.start;

        loop {
            let (end, wrapped_days) = cursor.overflowing_add_signed(granularity);
            if wrapped_days != 0 || end > hours.end {
                break;
            }

            let candidate = Interval { start: cursor, end };
            if !booked.iter().any(|interval| interval.overlaps(&candidate)) {
                slots.push(TimeSlot::from(candidate));
            }

            cursor = end;
        }

        debug!(
            "Found {} available slots for doctor {} on {}",
            slots.len(),
            doctor.id,
            date
        );
        Ok(slots)
    }
}
