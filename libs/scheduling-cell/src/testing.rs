// libs/scheduling-cell/src/testing.rs
//! In-memory `ScheduleStore` used by this cell's own tests and by the cells
//! built on top of it. Mirrors the store contract, including the
//! insert-time overlap rejection the production exclusion constraint
//! provides.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentStatus, Doctor, Interval, NewAppointment, SchedulingError,
};
use crate::store::ScheduleStore;

#[derive(Default)]
pub struct InMemoryScheduleStore {
    doctors: Mutex<Vec<Doctor>>,
    working_hours: Mutex<HashMap<Uuid, Interval>>,
    appointments: Mutex<Vec<Appointment>>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a doctor working the same hours every day. `hours: None`
    /// models a doctor with no working schedule at all.
    pub fn add_doctor(
        &self,
        full_name: &str,
        specialty: &str,
        slot_duration_minutes: i32,
        hours: Option<Interval>,
    ) -> Uuid {
        self.add_doctor_with_id(Uuid::new_v4(), full_name, specialty, slot_duration_minutes, hours)
    }

    /// Same as `add_doctor` with a caller-chosen id, for tests that pin the
    /// ascending-id tie-break order.
    pub fn add_doctor_with_id(
        &self,
        id: Uuid,
        full_name: &str,
        specialty: &str,
        slot_duration_minutes: i32,
        hours: Option<Interval>,
    ) -> Uuid {
        let now = Utc::now();
        self.doctors.lock().unwrap().push(Doctor {
            id,
            full_name: full_name.to_string(),
            email: format!("{}@example.com", id),
            specialty: specialty.to_string(),
            slot_duration_minutes,
            is_available: true,
            created_at: now,
            updated_at: now,
        });
        if let Some(hours) = hours {
            self.working_hours.lock().unwrap().insert(id, hours);
        }
        id
    }

    pub fn get_appointment(&self, appointment_id: Uuid) -> Option<Appointment> {
        self.appointments
            .lock()
            .unwrap()
            .iter()
            .find(|appointment| appointment.id == appointment_id)
            .cloned()
    }

    pub fn appointment_count(&self) -> usize {
        self.appointments.lock().unwrap().len()
    }
}

#[async_trait]
impl ScheduleStore for InMemoryScheduleStore {
    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, SchedulingError> {
        self.doctors
            .lock()
            .unwrap()
            .iter()
            .find(|doctor| doctor.id == doctor_id)
            .cloned()
            .ok_or_else(|| SchedulingError::NotFound("Doctor".to_string()))
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, SchedulingError> {
        let mut doctors = self.doctors.lock().unwrap().clone();
        doctors.sort_by_key(|doctor| doctor.id);
        Ok(doctors)
    }

    async fn doctors_by_specialty(&self, specialty: &str) -> Result<Vec<Doctor>, SchedulingError> {
        let mut doctors: Vec<Doctor> = self
            .doctors
            .lock()
            .unwrap()
            .iter()
            .filter(|doctor| doctor.specialty == specialty && doctor.is_available)
            .cloned()
            .collect();
        doctors.sort_by_key(|doctor| doctor.id);
        Ok(doctors)
    }

    async fn working_hours(
        &self,
        doctor_id: Uuid,
        _date: NaiveDate,
    ) -> Result<Option<Interval>, SchedulingError> {
        Ok(self.working_hours.lock().unwrap().get(&doctor_id).copied())
    }

    async fn scheduled_appointments(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let mut appointments: Vec<Appointment> = self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|appointment| {
                appointment.doctor_id == doctor_id
                    && appointment.date == date
                    && appointment.status == AppointmentStatus::Scheduled
            })
            .cloned()
            .collect();
        appointments.sort_by_key(|appointment| appointment.start_time);
        Ok(appointments)
    }

    async fn appointments_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let mut appointments: Vec<Appointment> = self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|appointment| {
                appointment.patient_id == patient_id
                    && appointment.status == AppointmentStatus::Scheduled
            })
            .cloned()
            .collect();
        appointments.sort_by_key(|appointment| (appointment.date, appointment.start_time));
        Ok(appointments)
    }

    async fn insert_appointment(
        &self,
        new: &NewAppointment,
    ) -> Result<Appointment, SchedulingError> {
        let requested = Interval::from_start(new.start_time, new.duration_minutes)?;

        let mut appointments = self.appointments.lock().unwrap();

        // Same rejection the production exclusion constraint performs.
        let overlap = appointments.iter().any(|existing| {
            existing.doctor_id == new.doctor_id
                && existing.date == new.date
                && existing.status == AppointmentStatus::Scheduled
                && existing
                    .interval()
                    .is_some_and(|booked| booked.overlaps(&requested))
        });
        if overlap {
            return Err(SchedulingError::Conflict);
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: new.patient_id,
            doctor_id: new.doctor_id,
            date: new.date,
            start_time: new.start_time,
            duration_minutes: new.duration_minutes,
            status: AppointmentStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };
        appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        patient_id: Uuid,
    ) -> Result<bool, SchedulingError> {
        let mut appointments = self.appointments.lock().unwrap();
        match appointments.iter_mut().find(|appointment| {
            appointment.id == appointment_id
                && appointment.patient_id == patient_id
                && appointment.status == AppointmentStatus::Scheduled
        }) {
            Some(appointment) => {
                appointment.status = AppointmentStatus::Cancelled;
                appointment.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
