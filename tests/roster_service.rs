mod common;

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client_for, sample_roster, student};
use seat_desk::error::ServiceError;
use seat_desk::roster::{DayFilter, DaySuffixTable, FilterSelection, StatusFilter};
use seat_desk::services::roster::{ReplaceStudentRequest, RosterService};

async fn mount_roster(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_roster()))
        .mount(server)
        .await;
}

fn service(server: &MockServer) -> RosterService {
    RosterService::new(client_for(server), DaySuffixTable::default())
}

fn labels(entries: &[seat_desk::roster::RosterEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.record.seat_no.as_str()).collect()
}

#[tokio::test]
async fn full_roster_is_sorted_with_display_labels() {
    let server = MockServer::start().await;
    mount_roster(&server).await;

    let entries = service(&server).refresh(FilterSelection::default()).await.unwrap();

    assert_eq!(labels(&entries), ["abc", "2", "10", "31", "31_A", "31_B"]);
    assert_eq!(entries[1].display_label, "2_A");
    assert_eq!(entries[4].display_label, "31_A");
}

#[tokio::test]
async fn vacant_and_day_filters_narrow_in_order() {
    let server = MockServer::start().await;
    mount_roster(&server).await;
    let roster = service(&server);

    let vacant = roster
        .refresh(FilterSelection::new(StatusFilter::Vacant, DayFilter::All))
        .await
        .unwrap();
    assert_eq!(labels(&vacant), ["2", "31_A"]);

    let full_day = roster
        .refresh(FilterSelection::new(StatusFilter::All, DayFilter::Full))
        .await
        .unwrap();
    assert_eq!(labels(&full_day), ["10", "31"]);
}

#[tokio::test]
async fn expired_view_reads_the_expired_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/expired-students"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            student("7", "Late Payer", "Evening Half"),
            student("5", "Old Timer", "Full Day"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let entries = service(&server)
        .refresh(FilterSelection::new(StatusFilter::Expired, DayFilter::All))
        .await
        .unwrap();

    assert_eq!(labels(&entries), ["5", "7"]);
}

#[tokio::test]
async fn empty_roster_is_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let entries = service(&server).refresh(FilterSelection::default()).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn backend_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = service(&server).refresh(FilterSelection::default()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Backend(_)));
}

#[tokio::test]
async fn stale_response_does_not_overwrite_newer_snapshot() {
    let server = MockServer::start().await;
    // The full roster answers slowly, the expired roster answers at once.
    Mock::given(method("GET"))
        .and(path("/students"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_roster())
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/expired-students"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([student("5", "Old Timer", "Full Day")])))
        .mount(&server)
        .await;

    let roster = service(&server);
    let expired = FilterSelection::new(StatusFilter::Expired, DayFilter::All);

    let (slow, fast) = tokio::join!(
        roster.refresh(FilterSelection::default()),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            roster.refresh(expired).await
        }
    );

    // Both callers get their own answer...
    assert_eq!(slow.unwrap().len(), 6);
    assert_eq!(fast.unwrap().len(), 1);

    // ...but only the newer request is committed.
    let current = roster.current().await;
    assert_eq!(current.selection, expired);
    assert_eq!(current.token, 2);
    assert_eq!(labels(&current.entries), ["5"]);
}

#[tokio::test]
async fn vacate_posts_a_vacant_assignment_and_reloads() {
    let server = MockServer::start().await;
    mount_roster(&server).await;
    Mock::given(method("POST"))
        .and(path("/replace-student"))
        .and(body_json(json!({
            "seat_no": "10",
            "name": "Vacant",
            "day_type": "",
            "charge": 0,
            "start_date": "",
            "phone": "",
            "status": ""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let update = service(&server).vacate_seat("10").await.unwrap();
    assert_eq!(update.message, "Seat 10 vacated");
    assert_eq!(update.roster.map(|r| r.len()), Some(6));
}

#[tokio::test]
async fn replacing_with_vacant_name_vacates() {
    let server = MockServer::start().await;
    mount_roster(&server).await;
    Mock::given(method("POST"))
        .and(path("/replace-student"))
        .and(body_json(json!({
            "seat_no": "4",
            "name": "Vacant",
            "day_type": "",
            "charge": 0,
            "start_date": "",
            "phone": "",
            "status": ""
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let request: ReplaceStudentRequest =
        serde_json::from_value(json!({ "seat_no": 4, "name": "VACANT" })).unwrap();
    let update = service(&server).replace_student(request).await.unwrap();
    assert_eq!(update.message, "Seat 4 vacated");
}

#[tokio::test]
async fn incomplete_replacement_never_reaches_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/replace-student"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request: ReplaceStudentRequest = serde_json::from_value(json!({
        "seat_no": "4",
        "name": "Meera",
        "day_type": "Full Day",
        "start_date": "01 April",
        "status": "Pending"
    }))
    .unwrap();

    let err = service(&server).replace_student(request).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn toggle_status_flips_pending_to_done() {
    let server = MockServer::start().await;
    mount_roster(&server).await;
    Mock::given(method("POST"))
        .and(path("/update-status"))
        .and(body_json(json!({ "seat_no": "31", "new_status": "Done" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let update = service(&server).toggle_status("31", "Pending").await.unwrap();
    assert_eq!(update.message, "Seat 31 marked Done");
}

#[tokio::test]
async fn mutation_succeeds_even_if_reload_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/update-expiry"))
        .and(body_json(json!({ "seat_no": "31", "name": "Anita", "new_expiry": "01 Jun 2025" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let update = service(&server)
        .update_expiry("31", "Anita", " 01 Jun 2025 ")
        .await
        .unwrap();
    assert_eq!(update.message, "Expiry updated for Anita");
    assert!(update.roster.is_none());
}

#[tokio::test]
async fn blank_expiry_is_rejected() {
    let server = MockServer::start().await;
    let err = service(&server).update_expiry("31", "Anita", "  ").await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}
