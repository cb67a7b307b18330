// libs/scheduling-cell/src/services/store.rs
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{SupabaseClient, SupabaseError};

use crate::models::{Appointment, Doctor, Interval, NewAppointment, SchedulingError};
use crate::store::ScheduleStore;

impl From<SupabaseError> for SchedulingError {
    fn from(err: SupabaseError) -> Self {
        match err {
            // Overlapping insert rejected by the appointments exclusion
            // constraint: a scheduling outcome, not an internal failure.
            SupabaseError::Conflict(_) => SchedulingError::Conflict,
            SupabaseError::NotFound(what) => SchedulingError::NotFound(what),
            other => SchedulingError::Store(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AvailabilityRow {
    start_time: NaiveTime,
    end_time: NaiveTime,
}

/// PostgREST-backed `ScheduleStore`. Requests run under the caller's bearer
/// token when one is supplied (row-level security applies); the anonymous
/// form serves the public nearest-availability lookup.
pub struct SupabaseScheduleStore {
    supabase: SupabaseClient,
    auth_token: Option<String>,
}

impl SupabaseScheduleStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            auth_token: None,
        }
    }

    pub fn with_token(config: &AppConfig, auth_token: &str) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            auth_token: Some(auth_token.to_string()),
        }
    }

    fn token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    fn representation_headers() -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );
        headers
    }
}

#[async_trait]
impl ScheduleStore for SupabaseScheduleStore {
    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, SchedulingError> {
        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Doctor> = self
            .supabase
            .request(Method::GET, &path, self.token(), None)
            .await?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| SchedulingError::NotFound("Doctor".to_string()))
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, SchedulingError> {
        let path = "/rest/v1/doctors?order=id.asc";
        let doctors: Vec<Doctor> = self
            .supabase
            .request(Method::GET, path, self.token(), None)
            .await?;

        Ok(doctors)
    }

    async fn doctors_by_specialty(&self, specialty: &str) -> Result<Vec<Doctor>, SchedulingError> {
        let path = format!(
            "/rest/v1/doctors?specialty=eq.{}&is_available=eq.true&order=id.asc",
            specialty
        );
        let doctors: Vec<Doctor> = self
            .supabase
            .request(Method::GET, &path, self.token(), None)
            .await?;

        Ok(doctors)
    }

    async fn working_hours(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Interval>, SchedulingError> {
        let day_of_week = date.weekday().num_days_from_sunday();
        let path = format!(
            "/rest/v1/doctor_availability?doctor_id=eq.{}&day_of_week=eq.{}&is_available=eq.true&order=start_time.asc",
            doctor_id, day_of_week
        );

        let rows: Vec<AvailabilityRow> = self
            .supabase
            .request(Method::GET, &path, self.token(), None)
            .await?;

        match rows.into_iter().next() {
            Some(row) => Interval::new(row.start_time, row.end_time).map(Some),
            None => Ok(None),
        }
    }

    async fn scheduled_appointments(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&date=eq.{}&status=eq.scheduled&order=start_time.asc",
            doctor_id, date
        );
        let appointments: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, self.token(), None)
            .await?;

        Ok(appointments)
    }

    async fn appointments_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let path = format!(
            "/rest/v1/appointments?patient_id=eq.{}&status=eq.scheduled&order=date.asc,start_time.asc",
            patient_id
        );
        let appointments: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, self.token(), None)
            .await?;

        Ok(appointments)
    }

    async fn insert_appointment(
        &self,
        new: &NewAppointment,
    ) -> Result<Appointment, SchedulingError> {
        debug!(
            "Inserting appointment for patient {} with doctor {} on {} at {}",
            new.patient_id, new.doctor_id, new.date, new.start_time
        );

        let appointment_data = json!({
            "patient_id": new.patient_id,
            "doctor_id": new.doctor_id,
            "date": new.date,
            "start_time": new.start_time.format("%H:%M:%S").to_string(),
            "duration_minutes": new.duration_minutes,
            "status": "scheduled",
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Appointment> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                self.token(),
                Some(appointment_data),
                Some(Self::representation_headers()),
            )
            .await?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| SchedulingError::Store("Insert returned no row".to_string()))
    }

    async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        patient_id: Uuid,
    ) -> Result<bool, SchedulingError> {
        debug!(
            "Cancelling appointment {} for patient {}",
            appointment_id, patient_id
        );

        // Filtering on status=scheduled makes the transition one-way: a
        // second cancel matches zero rows and reports not-found.
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&patient_id=eq.{}&status=eq.scheduled",
            appointment_id, patient_id
        );
        let update_data = json!({
            "status": "cancelled",
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                self.token(),
                Some(update_data),
                Some(Self::representation_headers()),
            )
            .await?;

        Ok(!result.is_empty())
    }
}
