//! Simultaneous requests for one slot: exactly one booking wins.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use booking_backend::test_support::http::TestBackend;
use futures::future::join_all;
use rstest::rstest;

use support::{book, doctor_id_named, register_patient};

const CONTENDERS: usize = 6;

#[rstest]
#[actix_web::test]
async fn identical_bookings_yield_one_appointment() {
    let backend = TestBackend::default();
    backend.seed().await.expect("seed");
    let app = test::init_service(backend.app()).await;
    let doctor_id = doctor_id_named(&app, "Dr. John Smith").await;

    let mut tokens = Vec::with_capacity(CONTENDERS);
    for n in 0..CONTENDERS {
        let (token, _) =
            register_patient(&app, &format!("Racer {n}"), &format!("racer{n}@example.com")).await;
        tokens.push(token);
    }

    let outcomes = join_all(
        tokens
            .iter()
            .map(|token| book(&app, token, doctor_id, "2025-03-13T16:30:00Z")),
    )
    .await;

    let created = outcomes
        .iter()
        .filter(|(status, _)| *status == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1);
    for (status, body) in outcomes.iter().filter(|(status, _)| *status != StatusCode::CREATED) {
        assert_eq!(*status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Doctor is not available at the requested time");
    }
    assert_eq!(backend.store.appointment_count(), 1);
}
