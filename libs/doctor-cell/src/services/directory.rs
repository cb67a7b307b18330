// libs/doctor-cell/src/services/directory.rs
use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use shared_config::AppConfig;

use scheduling_cell::models::{Doctor, SchedulingError, TimeSlot};
use scheduling_cell::services::slots::SlotService;
use scheduling_cell::store::ScheduleStore;
use scheduling_cell::SupabaseScheduleStore;

/// Read-only doctor directory: the listings patients browse before booking.
pub struct DoctorDirectoryService<S> {
    store: Arc<S>,
    slots: SlotService<S>,
}

impl DoctorDirectoryService<SupabaseScheduleStore> {
    pub fn new(config: &AppConfig) -> Self {
        Self::from_store(Arc::new(SupabaseScheduleStore::new(config)))
    }
}

impl<S: ScheduleStore> DoctorDirectoryService<S> {
    pub fn from_store(store: Arc<S>) -> Self {
        Self {
            slots: SlotService::new(store.clone()),
            store,
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, SchedulingError> {
        self.store.list_doctors().await
    }

    pub async fn list_by_specialty(&self, specialty: &str) -> Result<Vec<Doctor>, SchedulingError> {
        self.store.doctors_by_specialty(specialty).await
    }

    pub async fn available_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, SchedulingError> {
        self.slots.get_available_time_slots(doctor_id, date).await
    }
}
