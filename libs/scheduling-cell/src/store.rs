// libs/scheduling-cell/src/store.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{Appointment, Doctor, Interval, NewAppointment, SchedulingError};

/// Durable appointment state as seen by the scheduling services. The
/// production implementation is `SupabaseScheduleStore`; tests substitute
/// `testing::InMemoryScheduleStore`.
///
/// Reads are advisory: a slot reported free may be taken by a concurrent
/// booking. `insert_appointment` is the authoritative check - the backing
/// store enforces a no-overlap constraint per (doctor, date) and reports a
/// violation as `SchedulingError::Conflict`, so two concurrent bookings of
/// the same interval can never both succeed.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, SchedulingError>;

    async fn list_doctors(&self) -> Result<Vec<Doctor>, SchedulingError>;

    /// Doctors accepting appointments for a specialty, ascending id order.
    async fn doctors_by_specialty(&self, specialty: &str) -> Result<Vec<Doctor>, SchedulingError>;

    /// Working hours of a doctor on a calendar day, `None` when the doctor
    /// does not work that day.
    async fn working_hours(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Interval>, SchedulingError>;

    /// Scheduled (non-cancelled) appointments for a doctor on a day, in
    /// chronological order.
    async fn scheduled_appointments(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, SchedulingError>;

    /// Scheduled appointments of a patient, soonest first.
    async fn appointments_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<Appointment>, SchedulingError>;

    async fn insert_appointment(
        &self,
        new: &NewAppointment,
    ) -> Result<Appointment, SchedulingError>;

    /// Mark an appointment cancelled. Returns `false` when no scheduled
    /// appointment with this id is owned by the patient; cancelling is a
    /// one-way transition and cancelled rows are retained for audit.
    async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        patient_id: Uuid,
    ) -> Result<bool, SchedulingError>;
}
