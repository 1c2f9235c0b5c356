//! Tests for the doctor directory service.

use std::sync::Arc;

use chrono::NaiveDate;
use mockall::predicate::eq;
use pagination::{Page, PageRequest};
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    AppointmentPersistenceError, DoctorPersistenceError, MockAppointmentRepository,
    MockDoctorRepository,
};
use crate::domain::{AppointmentStatus, ErrorCode};
use crate::test_support::{FixedClock, fixtures};

type Service = DoctorServiceImpl<MockDoctorRepository, MockAppointmentRepository>;

const NOW: &str = "2025-01-10T08:00:00Z";

fn service(doctors: MockDoctorRepository, appointments: MockAppointmentRepository) -> Service {
    DoctorServiceImpl::new(
        Arc::new(doctors),
        Arc::new(appointments),
        Arc::new(FixedClock::at(NOW)),
    )
}

fn doctor_id(raw: i64) -> DoctorId {
    DoctorId::new(raw).expect("doctor id")
}

fn user_id(raw: i64) -> UserId {
    UserId::new(raw).expect("user id")
}

fn date(raw: &str) -> NaiveDate {
    raw.parse().expect("valid date")
}

fn doctors_with_profile(id: i64) -> MockDoctorRepository {
    let mut doctors = MockDoctorRepository::new();
    doctors
        .expect_find_profile()
        .with(eq(doctor_id(id)))
        .returning(move |_| Ok(Some(fixtures::doctor_profile(id, 100 + id))));
    doctors
}

#[rstest]
#[case(vec![], 16)]
#[case(vec!["2025-01-10T09:00:00Z"], 15)]
#[case(vec!["2025-01-10T09:00:00Z", "2025-01-10T13:30:00Z", "2025-01-10T16:30:00Z"], 13)]
#[case(vec!["2025-01-10T09:10:00Z"], 16)]
#[tokio::test]
async fn availability_subtracts_exact_matches(
    #[case] booked: Vec<&'static str>,
    #[case] expected: usize,
) {
    let mut appointments = MockAppointmentRepository::new();
    appointments
        .expect_start_times_on()
        .with(eq(doctor_id(1)), eq(date("2025-01-10")))
        .return_once(move |_, _| Ok(booked.into_iter().map(fixtures::timestamp).collect()));

    let availability = service(doctors_with_profile(1), appointments)
        .availability(doctor_id(1), Some(date("2025-01-10")))
        .await
        .expect("availability");

    assert_eq!(availability.available_slots.len(), expected);
    assert_eq!(availability.date, date("2025-01-10"));
}

#[tokio::test]
async fn availability_defaults_to_today() {
    let mut appointments = MockAppointmentRepository::new();
    appointments
        .expect_start_times_on()
        .with(eq(doctor_id(1)), eq(date("2025-01-10")))
        .return_once(|_, _| Ok(Vec::new()));

    let availability = service(doctors_with_profile(1), appointments)
        .availability(doctor_id(1), None)
        .await
        .expect("availability");

    assert_eq!(availability.date, date("2025-01-10"));
}

#[tokio::test]
async fn availability_for_unknown_doctor_is_not_found() {
    let mut doctors = MockDoctorRepository::new();
    doctors.expect_find_profile().return_once(|_| Ok(None));
    let mut appointments = MockAppointmentRepository::new();
    appointments.expect_start_times_on().times(0);

    let err = service(doctors, appointments)
        .availability(doctor_id(99), None)
        .await
        .expect_err("unknown doctor");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Doctor not found");
}

#[tokio::test]
async fn availability_surfaces_store_failures() {
    let mut appointments = MockAppointmentRepository::new();
    appointments
        .expect_start_times_on()
        .return_once(|_, _| Err(AppointmentPersistenceError::query("boom")));

    let err = service(doctors_with_profile(1), appointments)
        .availability(doctor_id(1), None)
        .await
        .expect_err("store failure");

    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn list_doctors_passes_filter_through() {
    let mut doctors = MockDoctorRepository::new();
    doctors
        .expect_list_available()
        .withf(|filter, page| {
            filter.name.as_deref() == Some("smith") && page.page() == 2 && page.limit() == 5
        })
        .return_once(|_, page| Ok(Page::new(vec![fixtures::doctor_profile(1, 101)], 6, page)));

    let page = service(doctors, MockAppointmentRepository::new())
        .list_doctors(
            DoctorListFilter {
                specialization: None,
                name: Some("smith".to_owned()),
            },
            PageRequest::new(Some(2), Some(5)),
        )
        .await
        .expect("doctor page");

    assert_eq!(page.total, 6);
    assert_eq!(page.page, 2);
    assert_eq!(page.data.len(), 1);
}

#[tokio::test]
async fn dashboard_orders_today_ascending() {
    let mut doctors = MockDoctorRepository::new();
    doctors
        .expect_find_by_user()
        .with(eq(user_id(101)))
        .return_once(|_| Ok(Some(fixtures::doctor(1, user_id(101)))));
    let mut appointments = MockAppointmentRepository::new();
    appointments
        .expect_list_for()
        .withf(|owner, filter| {
            *owner == AppointmentOwner::Doctor(doctor_id(1))
                && filter.from == Some(date("2025-01-10"))
                && filter.to == Some(date("2025-01-10"))
        })
        .return_once(|_, _| {
            Ok(vec![
                fixtures::appointment(2, 7, 1, "2025-01-10T11:00:00Z", AppointmentStatus::Pending),
                fixtures::appointment(1, 7, 1, "2025-01-10T09:00:00Z", AppointmentStatus::Pending),
            ])
        });
    appointments
        .expect_upcoming_for_doctor()
        .with(eq(doctor_id(1)), eq(date("2025-01-10")), eq(10))
        .return_once(|_, _, _| {
            Ok(vec![fixtures::appointment(
                3,
                7,
                1,
                "2025-01-11T09:00:00Z",
                AppointmentStatus::Confirmed,
            )])
        });

    let dashboard = service(doctors, appointments)
        .dashboard(user_id(101))
        .await
        .expect("dashboard");

    let today: Vec<i64> = dashboard.today.iter().map(|a| a.id.get()).collect();
    assert_eq!(today, vec![1, 2]);
    assert_eq!(dashboard.upcoming.len(), 1);
}

#[tokio::test]
async fn dashboard_requires_doctor_profile() {
    let mut doctors = MockDoctorRepository::new();
    doctors.expect_find_by_user().return_once(|_| Ok(None));

    let err = service(doctors, MockAppointmentRepository::new())
        .dashboard(user_id(1))
        .await
        .expect_err("admin without profile");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn create_schedule_requires_doctor_profile() {
    let mut doctors = MockDoctorRepository::new();
    doctors.expect_find_by_user().return_once(|_| Ok(None));
    doctors.expect_create_schedule().times(0);
    let draft = ScheduleDraft::new(
        date("2025-01-10"),
        "09:00".parse().expect("start"),
        "12:00".parse().expect("end"),
    )
    .expect("draft");

    let err = service(doctors, MockAppointmentRepository::new())
        .create_schedule(user_id(1), draft)
        .await
        .expect_err("not a doctor");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.message(), "Only doctors can create schedules");
}

#[tokio::test]
async fn create_schedule_stores_window_for_callers_profile() {
    let mut doctors = MockDoctorRepository::new();
    doctors
        .expect_find_by_user()
        .return_once(|_| Ok(Some(fixtures::doctor(4, user_id(104)))));
    doctors
        .expect_create_schedule()
        .withf(|id, draft| *id == doctor_id(4) && draft.start_time.to_string() == "09:00")
        .return_once(|id, draft| Ok(fixtures::schedule(1, id, draft)));
    let draft = ScheduleDraft::new(
        date("2025-01-10"),
        "09:00".parse().expect("start"),
        "12:00".parse().expect("end"),
    )
    .expect("draft");

    let schedule = service(doctors, MockAppointmentRepository::new())
        .create_schedule(user_id(104), draft)
        .await
        .expect("schedule");

    assert_eq!(schedule.doctor_id, doctor_id(4));
    assert!(schedule.is_available);
}

#[tokio::test]
async fn get_doctor_maps_connection_failure() {
    let mut doctors = MockDoctorRepository::new();
    doctors
        .expect_find_profile()
        .return_once(|_| Err(DoctorPersistenceError::connection("refused")));

    let err = service(doctors, MockAppointmentRepository::new())
        .get_doctor(doctor_id(1))
        .await
        .expect_err("store down");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
