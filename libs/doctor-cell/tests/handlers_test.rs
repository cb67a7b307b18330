use assert_matches::assert_matches;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::handlers::{self, DoctorListQuery, SlotsQuery};
use shared_models::error::AppError;
use shared_utils::test_utils::{MockSupabaseRows, TestConfig};

#[tokio::test]
async fn list_doctors_returns_every_row() {
    let server = MockServer::start().await;
    let state = TestConfig::with_supabase_url(&server.uri()).to_arc();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::doctor_row(&Uuid::new_v4().to_string(), "Dr. Reyes", "cardiology"),
            MockSupabaseRows::doctor_row(&Uuid::new_v4().to_string(), "Dr. Okafor", "dermatology"),
        ])))
        .mount(&server)
        .await;

    let Json(body) = handlers::list_doctors(
        State(state),
        Query(DoctorListQuery { specialty: None }),
    )
    .await
    .unwrap();

    let doctors = body["doctors"].as_array().unwrap();
    assert_eq!(doctors.len(), 2);
    assert_eq!(doctors[0]["full_name"], "Dr. Reyes");
}

#[tokio::test]
async fn doctor_slots_exclude_booked_intervals() {
    let server = MockServer::start().await;
    let state = TestConfig::with_supabase_url(&server.uri()).to_arc();
    let doctor_id = Uuid::new_v4();
    let date = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::doctor_row(&doctor_id.to_string(), "Dr. Reyes", "cardiology")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::availability_row(&doctor_id.to_string(), 1, "09:00:00", "11:00:00")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::appointment_row(
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(),
                &doctor_id.to_string(),
                "2025-09-15",
                "09:30:00",
                30,
                "scheduled",
            )
        ])))
        .mount(&server)
        .await;

    let Json(body) = handlers::get_doctor_slots(
        State(state),
        Path(doctor_id),
        Query(SlotsQuery { date }),
    )
    .await
    .unwrap();

    assert_eq!(body["doctor_id"], doctor_id.to_string());
    assert_eq!(body["date"], "2025-09-15");
    let slots = body["time_slots"].as_array().unwrap();
    // 09:00-11:00 at 30 minutes minus the 09:30 booking.
    assert_eq!(slots.len(), 3);
    assert_eq!(slots[0]["start_time"], "09:00:00");
    assert_eq!(slots[1]["start_time"], "10:00:00");
}

#[tokio::test]
async fn doctor_slots_for_unknown_doctor_is_not_found() {
    let server = MockServer::start().await;
    let state = TestConfig::with_supabase_url(&server.uri()).to_arc();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = handlers::get_doctor_slots(
        State(state),
        Path(Uuid::new_v4()),
        Query(SlotsQuery {
            date: NaiveDate::from_ymd_opt(2025, 9, 15).unwrap(),
        }),
    )
    .await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}
