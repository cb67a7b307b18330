// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;

use scheduling_cell::models::{Appointment, NewAppointment, SchedulingError};
use scheduling_cell::services::conflict::ConflictDetectionService;
use scheduling_cell::services::search::NearestAvailabilityService;
use scheduling_cell::services::slots::SlotService;
use scheduling_cell::store::ScheduleStore;
use scheduling_cell::SupabaseScheduleStore;

use crate::models::{BookAppointmentRequest, NearestAvailabilityResponse};

/// Single entry point for every appointment mutation and query, so the
/// booking rules live in exactly one place instead of being re-implemented
/// per handler.
pub struct AppointmentBookingService<S> {
    store: Arc<S>,
    conflicts: ConflictDetectionService<S>,
    slots: SlotService<S>,
    search: NearestAvailabilityService<S>,
}

impl AppointmentBookingService<SupabaseScheduleStore> {
    pub fn new(config: &AppConfig, auth_token: Option<&str>) -> Self {
        let store = Arc::new(match auth_token {
            Some(token) => SupabaseScheduleStore::with_token(config, token),
            None => SupabaseScheduleStore::new(config),
        });
        Self::from_store(store, config.search_horizon_days)
    }
}

impl<S: ScheduleStore> AppointmentBookingService<S> {
    pub fn from_store(store: Arc<S>, horizon_days: u32) -> Self {
        Self {
            conflicts: ConflictDetectionService::new(store.clone()),
            slots: SlotService::new(store.clone()),
            search: NearestAvailabilityService::new(store.clone(), horizon_days),
            store,
        }
    }

    /// Book an appointment for a patient. Past dates are rejected here, once,
    /// before any availability check; the insert itself may still report a
    /// conflict if a concurrent booking won the race, and that outcome is
    /// surfaced exactly like a failed pre-check.
    pub async fn book_appointment(
        &self,
        patient_id: Uuid,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        self.book_appointment_as_of(patient_id, request, Utc::now().date_naive())
            .await
    }

    /// `today` is injected so the past-date rule is testable without a clock.
    pub async fn book_appointment_as_of(
        &self,
        patient_id: Uuid,
        request: BookAppointmentRequest,
        today: NaiveDate,
    ) -> Result<Appointment, SchedulingError> {
        if request.date < today {
            return Err(SchedulingError::Validation(format!(
                "Cannot book an appointment on {} - the date is in the past",
                request.date
            )));
        }

        let available = self
            .conflicts
            .is_doctor_available(request.doctor_id, request.date, request.time, request.duration_minutes)
            .await?;

        if !available {
            debug!(
                "Doctor {} not available on {} at {}",
                request.doctor_id, request.date, request.time
            );
            return Err(SchedulingError::Conflict);
        }

        let appointment = self
            .store
            .insert_appointment(&NewAppointment {
                patient_id,
                doctor_id: request.doctor_id,
                date: request.date,
                start_time: request.time,
                duration_minutes: request.duration_minutes,
            })
            .await?;

        info!(
            "Appointment {} booked for patient {} with doctor {} on {}",
            appointment.id, patient_id, request.doctor_id, request.date
        );
        Ok(appointment)
    }

    pub async fn patient_appointments(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        self.store.appointments_for_patient(patient_id).await
    }

    /// Cancel a scheduled appointment owned by the patient. Cancelling an
    /// unknown, foreign or already-cancelled appointment is not-found; a
    /// successful cancel permanently frees the interval.
    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        patient_id: Uuid,
    ) -> Result<(), SchedulingError> {
        let cancelled = self.store.cancel_appointment(appointment_id, patient_id).await?;
        if !cancelled {
            return Err(SchedulingError::NotFound("Appointment".to_string()));
        }

        info!("Appointment {} cancelled by patient {}", appointment_id, patient_id);
        Ok(())
    }

    /// Earliest date with a free slot for the specialty, together with the
    /// full slot list for the winning (doctor, date). The search only proves
    /// existence; the slot list is recomputed for the response because
    /// callers conventionally want both.
    pub async fn find_nearest_availability(
        &self,
        specialty: &str,
    ) -> Result<Option<NearestAvailabilityResponse>, SchedulingError> {
        self.find_nearest_availability_as_of(specialty, Utc::now().date_naive())
            .await
    }

    pub async fn find_nearest_availability_as_of(
        &self,
        specialty: &str,
        from: NaiveDate,
    ) -> Result<Option<NearestAvailabilityResponse>, SchedulingError> {
        let Some(found) = self.search.find_nearest_available_date(specialty, from).await? else {
            return Ok(None);
        };

        let time_slots = self
            .slots
            .get_available_time_slots(found.doctor_id, found.date)
            .await?;

        Ok(Some(NearestAvailabilityResponse {
            doctor_id: found.doctor_id,
            doctor_name: found.doctor_name,
            date: found.date,
            time_slots,
        }))
    }
}
