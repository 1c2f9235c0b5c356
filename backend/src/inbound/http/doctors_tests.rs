//! Handler coverage for the doctor routes.

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::NaiveDate;
use pagination::Page;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::ports::Dashboard;
use crate::domain::{
    AppointmentStatus, Availability, DailyWindow, DoctorId, Error, Role, Specialization,
};
use crate::inbound::http::test_utils::{DOCTOR_USER_ID, MockPorts, as_role, user_id};
use crate::test_support::fixtures;

fn date(raw: &str) -> NaiveDate {
    raw.parse().expect("valid date")
}

#[actix_web::test]
async fn directory_is_public_and_paged() {
    let mut ports = MockPorts::default();
    ports
        .doctors
        .expect_list_doctors()
        .withf(|filter, page| {
            filter.specialization == Some(Specialization::Cardiology)
                && filter.name.as_deref() == Some("smith")
                && page.page() == 2
                && page.limit() == 1
        })
        .returning(|_, page| Ok(Page::new(vec![fixtures::doctor_profile(1, 10)], 3, page)));

    let response = ports
        .call(test::TestRequest::get().uri("/api/v1/doctors?specialization=cardiology&name=smith&page=2&limit=1"))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 1);
    assert_eq!(body["data"][0]["name"], "User 10");
    assert_eq!(body["data"][0]["consultation_fee"], 150.0);
    assert!(body["data"][0].get("email").is_none());
}

#[actix_web::test]
async fn unknown_specialization_is_rejected() {
    let mut ports = MockPorts::default();
    ports.doctors.expect_list_doctors().never();
    let response = ports
        .call(test::TestRequest::get().uri("/api/v1/doctors?specialization=astrology"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn doctor_detail_includes_email() {
    let mut ports = MockPorts::default();
    ports
        .doctors
        .expect_get_doctor()
        .withf(|id| id.get() == 1)
        .returning(|_| Ok(fixtures::doctor_profile(1, 10)));

    let response = ports
        .call(test::TestRequest::get().uri("/api/v1/doctors/1"))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["email"], "user10@example.com");
    assert_eq!(body["experience"], 10);
}

#[rstest]
#[case("/api/v1/doctors/abc", StatusCode::BAD_REQUEST)]
#[case("/api/v1/doctors/0", StatusCode::BAD_REQUEST)]
#[case("/api/v1/doctors/99", StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn doctor_lookup_errors(#[case] uri: &str, #[case] expected: StatusCode) {
    let mut ports = MockPorts::default();
    ports
        .doctors
        .expect_get_doctor()
        .returning(|_| Err(Error::not_found("Doctor not found")));
    let response = ports.call(test::TestRequest::get().uri(uri)).await;
    assert_eq!(response.status(), expected);
}

#[actix_web::test]
async fn availability_renders_hh_mm_slots() {
    let mut ports = MockPorts::default();
    ports
        .doctors
        .expect_availability()
        .withf(|id, day| id.get() == 1 && *day == Some(date("2025-03-10")))
        .returning(|doctor_id, day| {
            let booked = ["09:00".parse().expect("slot")];
            Ok(Availability {
                doctor_id,
                date: day.expect("date supplied"),
                available_slots: DailyWindow::clinic_hours().available_slots(booked),
            })
        });

    let response = ports
        .call(test::TestRequest::get().uri("/api/v1/doctors/1/availability?date=2025-03-10"))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["doctor_id"], 1);
    assert_eq!(body["date"], "2025-03-10");
    let slots = body["available_slots"].as_array().expect("slots");
    assert_eq!(slots.len(), 15);
    assert_eq!(slots[0], "09:30");
    assert_eq!(slots[14], "16:30");
}

#[actix_web::test]
async fn availability_rejects_malformed_date() {
    let mut ports = MockPorts::default();
    ports.doctors.expect_availability().never();
    let response = ports
        .call(test::TestRequest::get().uri("/api/v1/doctors/1/availability?date=10-03-2025"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "Invalid date format. Use YYYY-MM-DD");
}

#[rstest]
#[case(None, StatusCode::UNAUTHORIZED)]
#[case(Some(Role::Patient), StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn dashboard_is_gated(#[case] role: Option<Role>, #[case] expected: StatusCode) {
    let mut ports = MockPorts::default();
    ports.doctors.expect_dashboard().never();
    let request = test::TestRequest::get().uri("/api/v1/doctors/dashboard");
    let request = match role {
        Some(role) => as_role(request, role),
        None => request,
    };
    assert_eq!(ports.call(request).await.status(), expected);
}

#[actix_web::test]
async fn dashboard_lists_today_and_upcoming() {
    let mut ports = MockPorts::default();
    ports
        .doctors
        .expect_dashboard()
        .withf(|id| *id == user_id(DOCTOR_USER_ID))
        .returning(|id| {
            Ok(Dashboard {
                doctor: fixtures::doctor(4, id),
                today: vec![fixtures::appointment(
                    1,
                    7,
                    4,
                    "2025-03-10T09:00:00Z",
                    AppointmentStatus::Pending,
                )],
                upcoming: vec![fixtures::appointment(
                    2,
                    7,
                    4,
                    "2025-03-11T10:00:00Z",
                    AppointmentStatus::Confirmed,
                )],
            })
        });

    let response = ports
        .call(as_role(test::TestRequest::get().uri("/api/v1/doctors/dashboard"), Role::Doctor))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["doctor"]["id"], 4);
    assert_eq!(body["today_appointments"][0]["id"], 1);
    assert_eq!(body["upcoming_appointments"][0]["status"], "confirmed");
}

#[actix_web::test]
async fn create_schedule_returns_created() {
    let mut ports = MockPorts::default();
    ports
        .doctors
        .expect_create_schedule()
        .withf(|id, draft| {
            *id == user_id(DOCTOR_USER_ID) && draft.start_time.to_string() == "09:00"
        })
        .returning(|_, draft| Ok(fixtures::schedule(1, DoctorId::new(4).expect("id"), &draft)));

    let response = ports
        .call(as_role(
            test::TestRequest::post()
                .uri("/api/v1/doctors/schedules")
                .set_json(json!({"date": "2025-03-10", "start_time": "09:00", "end_time": "12:00"})),
            Role::Doctor,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Schedule created successfully");
    assert_eq!(body["schedule"]["end_time"], "12:00");
    assert_eq!(body["schedule"]["is_available"], true);
}

#[rstest]
#[case(json!({"date": "2025-03-10", "start_time": "9:00", "end_time": "12:00"}))]
#[case(json!({"date": "2025-03-10", "start_time": "12:00", "end_time": "12:00"}))]
#[case(json!({"date": "March 10", "start_time": "09:00", "end_time": "12:00"}))]
#[actix_web::test]
async fn create_schedule_validates_times(#[case] body: Value) {
    let mut ports = MockPorts::default();
    ports.doctors.expect_create_schedule().never();
    let response = ports
        .call(as_role(
            test::TestRequest::post().uri("/api/v1/doctors/schedules").set_json(body),
            Role::Doctor,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn admin_without_profile_cannot_create_schedule() {
    let mut ports = MockPorts::default();
    ports
        .doctors
        .expect_create_schedule()
        .returning(|_, _| Err(Error::forbidden("Only doctors can create schedules")));
    let response = ports
        .call(as_role(
            test::TestRequest::post()
                .uri("/api/v1/doctors/schedules")
                .set_json(json!({"date": "2025-03-10", "start_time": "09:00", "end_time": "12:00"})),
            Role::Admin,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn doctor_appointments_forward_filters() {
    let mut ports = MockPorts::default();
    ports
        .appointments
        .expect_list_for_doctor()
        .withf(|id, filter| {
            *id == user_id(DOCTOR_USER_ID)
                && filter.status == Some(AppointmentStatus::Pending)
                && filter.from == Some(date("2025-03-01"))
                && filter.to.is_none()
        })
        .returning(|_, _| {
            Ok(vec![fixtures::appointment(
                3,
                7,
                4,
                "2025-03-12T14:30:00Z",
                AppointmentStatus::Pending,
            )])
        });

    let response = ports
        .call(as_role(
            test::TestRequest::get()
                .uri("/api/v1/doctors/appointments?status=pending&start_date=2025-03-01"),
            Role::Doctor,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body[0]["start_time"], "2025-03-12T14:30:00Z");
    assert_eq!(body[0]["end_time"], "2025-03-12T15:00:00Z");
    assert_eq!(body[0]["appointment_date"], "2025-03-12");
}

#[actix_web::test]
async fn status_update_returns_envelope() {
    let mut ports = MockPorts::default();
    ports
        .appointments
        .expect_update_status_as_doctor()
        .withf(|_, id, status| id.get() == 3 && *status == AppointmentStatus::Confirmed)
        .returning(|_, _, status| {
            Ok(fixtures::appointment(3, 7, 4, "2025-03-12T14:30:00Z", status))
        });

    let response = ports
        .call(as_role(
            test::TestRequest::put()
                .uri("/api/v1/doctors/appointments/3/status")
                .set_json(json!({"status": "confirmed"})),
            Role::Doctor,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Appointment status updated successfully");
    assert_eq!(body["appointment"]["status"], "confirmed");
}

#[rstest]
#[case(json!({"status": "archived"}), None, StatusCode::BAD_REQUEST)]
#[case(
    json!({"status": "confirmed"}),
    Some(Error::invalid_request("Cannot change appointment status from completed to confirmed")),
    StatusCode::BAD_REQUEST
)]
#[case(json!({"status": "confirmed"}), Some(Error::not_found("Appointment not found")), StatusCode::NOT_FOUND)]
#[case(
    json!({"status": "completed"}),
    Some(Error::conflict("Appointment was modified by another request")),
    StatusCode::CONFLICT
)]
#[actix_web::test]
async fn status_update_failures(
    #[case] body: Value,
    #[case] service_error: Option<Error>,
    #[case] expected: StatusCode,
) {
    let mut ports = MockPorts::default();
    match service_error {
        Some(err) => {
            ports
                .appointments
                .expect_update_status_as_doctor()
                .returning(move |_, _, _| Err(err.clone()));
        }
        None => {
            ports.appointments.expect_update_status_as_doctor().never();
        }
    }
    let response = ports
        .call(as_role(
            test::TestRequest::put()
                .uri("/api/v1/doctors/appointments/3/status")
                .set_json(body),
            Role::Doctor,
        ))
        .await;
    assert_eq!(response.status(), expected);
}
