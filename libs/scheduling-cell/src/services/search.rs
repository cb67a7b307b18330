// libs/scheduling-cell/src/services/search.rs
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

use crate::models::{NearestAvailability, SchedulingError};
use crate::services::slots::SlotService;
use crate::store::ScheduleStore;

/// Forward search for the earliest date on which any doctor of a specialty
/// has a free slot. The scan is capped by a horizon so a fully booked
/// specialty terminates instead of walking the calendar forever.
pub struct NearestAvailabilityService<S> {
    store: Arc<S>,
    slots: SlotService<S>,
    horizon_days: u32,
}

impl<S: ScheduleStore> NearestAvailabilityService<S> {
    pub fn new(store: Arc<S>, horizon_days: u32) -> Self {
        Self {
            slots: SlotService::new(store.clone()),
            store,
            horizon_days,
        }
    }

    /// Scan dates from `from` (inclusive) in ascending order; on each date
    /// consider the specialty's doctors in ascending id order. The first
    /// (date, doctor) pair with a non-empty slot sequence wins - ties on a
    /// date go to the lower doctor id, never to slot count, so identical
    /// state always reproduces the same answer.
    pub async fn find_nearest_available_date(
        &self,
        specialty: &str,
        from: NaiveDate,
    ) -> Result<Option<NearestAvailability>, SchedulingError> {
        let mut doctors = self.store.doctors_by_specialty(specialty).await?;
        doctors.sort_by_key(|doctor| doctor.id);

        if doctors.is_empty() {
            debug!("No doctors registered for specialty '{}'", specialty);
            return Ok(None);
        }

        for day_offset in 0..self.horizon_days as i64 {
            let date = from + Duration::days(day_offset);

            for doctor in &doctors {
                let slots = self.slots.slots_for_doctor(doctor, date).await?;
                if !slots.is_empty() {
                    debug!(
                        "Nearest availability for '{}': doctor {} on {}",
                        specialty, doctor.id, date
                    );
                    return Ok(Some(NearestAvailability {
                        doctor_id: doctor.id,
                        doctor_name: doctor.full_name.clone(),
                        date,
                    }));
                }
            }
        }

        warn!(
            "No availability for specialty '{}' within {} days of {}",
            specialty, self.horizon_days, from
        );
        Ok(None)
    }
}
