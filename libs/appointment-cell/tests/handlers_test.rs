use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::TypedHeader;
use chrono::{Duration, Utc};
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::handlers;
use appointment_cell::models::BookAppointmentRequest;
use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseRows, TestConfig, TestUser};

struct TestContext {
    server: MockServer,
    state: Arc<AppConfig>,
    user: User,
    auth: TypedHeader<Authorization<Bearer>>,
}

async fn setup() -> TestContext {
    let server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(&server.uri());
    let state = config.to_arc();

    let test_user = TestUser::patient("pat@example.com");
    let token = JwtTestUtils::create_test_token(&test_user, &config.jwt_secret, Some(24));
    let user = test_user.to_user();
    let auth = TypedHeader(Authorization::bearer(&token).unwrap());

    TestContext {
        server,
        state,
        user,
        auth,
    }
}

fn book_request(doctor_id: Uuid, days_ahead: i64) -> BookAppointmentRequest {
    BookAppointmentRequest {
        doctor_id,
        date: Utc::now().date_naive() + Duration::days(days_ahead),
        time: chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        duration_minutes: 30,
    }
}

async fn mock_working_hours(server: &MockServer, doctor_id: &str) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::availability_row(doctor_id, 1, "09:00:00", "17:00:00")
        ])))
        .mount(server)
        .await;
}

async fn mock_no_scheduled_appointments(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn book_appointment_returns_created_with_the_row() {
    let ctx = setup().await;
    let doctor_id = Uuid::new_v4();
    let request = book_request(doctor_id, 7);

    mock_working_hours(&ctx.server, &doctor_id.to_string()).await;
    mock_no_scheduled_appointments(&ctx.server).await;

    let appointment_id = Uuid::new_v4().to_string();
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseRows::appointment_row(
                &appointment_id,
                &ctx.user.id,
                &doctor_id.to_string(),
                &request.date.to_string(),
                "10:00:00",
                30,
                "scheduled",
            )
        ])))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let (status, Json(body)) = handlers::book_appointment(
        State(ctx.state.clone()),
        ctx.auth,
        Extension(ctx.user.clone()),
        Json(request),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Appointment successfully scheduled");
    assert_eq!(body["appointment"]["id"], appointment_id);
    assert_eq!(body["appointment"]["status"], "scheduled");
}

#[tokio::test]
async fn book_appointment_rejects_past_dates_without_calling_the_store() {
    let ctx = setup().await;

    // No mocks mounted: a store call would fail loudly.
    let result = handlers::book_appointment(
        State(ctx.state.clone()),
        ctx.auth,
        Extension(ctx.user.clone()),
        Json(book_request(Uuid::new_v4(), -3)),
    )
    .await;

    assert_matches!(result, Err(AppError::BadRequest(_)));
}

#[tokio::test]
async fn book_appointment_maps_insert_conflict_to_bad_request() {
    let ctx = setup().await;
    let doctor_id = Uuid::new_v4();

    mock_working_hours(&ctx.server, &doctor_id.to_string()).await;
    mock_no_scheduled_appointments(&ctx.server).await;

    // The pre-check saw a free slot but the exclusion constraint fired.
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "conflicting key value violates exclusion constraint"
        })))
        .mount(&ctx.server)
        .await;

    let result = handlers::book_appointment(
        State(ctx.state.clone()),
        ctx.auth,
        Extension(ctx.user.clone()),
        Json(book_request(doctor_id, 7)),
    )
    .await;

    assert_matches!(
        result,
        Err(AppError::BadRequest(msg)) if msg.contains("not available")
    );
}

#[tokio::test]
async fn book_appointment_outside_working_hours_is_bad_request() {
    let ctx = setup().await;
    let doctor_id = Uuid::new_v4();

    // No availability rows for any day.
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&ctx.server)
        .await;

    let result = handlers::book_appointment(
        State(ctx.state.clone()),
        ctx.auth,
        Extension(ctx.user.clone()),
        Json(book_request(doctor_id, 7)),
    )
    .await;

    assert_matches!(result, Err(AppError::BadRequest(_)));
}

#[tokio::test]
async fn get_patient_appointments_returns_the_list() {
    let ctx = setup().await;
    let appointment_id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::appointment_row(
                &appointment_id,
                &ctx.user.id,
                &Uuid::new_v4().to_string(),
                "2025-09-15",
                "10:00:00",
                30,
                "scheduled",
            )
        ])))
        .mount(&ctx.server)
        .await;

    let Json(body) = handlers::get_patient_appointments(
        State(ctx.state.clone()),
        ctx.auth,
        Extension(ctx.user.clone()),
    )
    .await
    .unwrap();

    assert_eq!(body["appointments"].as_array().unwrap().len(), 1);
    assert_eq!(body["appointments"][0]["id"], appointment_id);
}

#[tokio::test]
async fn cancel_appointment_reports_not_found_when_nothing_matches() {
    let ctx = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&ctx.server)
        .await;

    let result = handlers::cancel_appointment(
        State(ctx.state.clone()),
        Path(Uuid::new_v4()),
        ctx.auth,
        Extension(ctx.user.clone()),
    )
    .await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn cancel_appointment_acknowledges_the_transition() {
    let ctx = setup().await;
    let appointment_id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": appointment_id, "status": "cancelled" }
        ])))
        .mount(&ctx.server)
        .await;

    let Json(body) = handlers::cancel_appointment(
        State(ctx.state.clone()),
        Path(appointment_id),
        ctx.auth,
        Extension(ctx.user.clone()),
    )
    .await
    .unwrap();

    assert_eq!(body["message"], "Appointment cancelled");
}

#[tokio::test]
async fn nearest_availability_returns_doctor_date_and_slots() {
    let ctx = setup().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::doctor_row(&doctor_id.to_string(), "Dr. Reyes", "cardiology")
        ])))
        .mount(&ctx.server)
        .await;
    mock_working_hours(&ctx.server, &doctor_id.to_string()).await;
    mock_no_scheduled_appointments(&ctx.server).await;

    let Json(body) = handlers::find_nearest_available_date(
        State(ctx.state.clone()),
        Path("cardiology".to_string()),
    )
    .await
    .unwrap();

    assert_eq!(body["doctor_id"], doctor_id.to_string());
    assert_eq!(body["doctor_name"], "Dr. Reyes");
    assert_eq!(body["date"], Utc::now().date_naive().to_string());
    // 09:00-17:00 at 30 minutes is sixteen slots.
    assert_eq!(body["time_slots"].as_array().unwrap().len(), 16);
    assert_eq!(body["time_slots"][0]["start_time"], "09:00:00");
}

#[tokio::test]
async fn nearest_availability_is_not_found_for_unknown_specialty() {
    let ctx = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&ctx.server)
        .await;

    let result = handlers::find_nearest_available_date(
        State(ctx.state.clone()),
        Path("astrology".to_string()),
    )
    .await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}
