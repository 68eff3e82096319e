use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header::CONTENT_DISPOSITION;
use axum::http::header::CONTENT_TYPE;
use serde_json::json;
use uuid::Uuid;

use super::helper::add_trip;
use super::helper::error_message;
use super::helper::list_trips;
use super::helper::raw_request;
use super::helper::request;
use super::helper::setup_test_app;

#[tokio::test]
async fn test_record_and_list_trips_sorted_by_start_date() {
    let mut app = setup_test_app().await.router;

    // recorded out of order on purpose
    let (status_code, _, _) = add_trip(
        &mut app,
        json!({
            "destination": "Hamburg",
            "startDate": "2024-04-10",
            "endDate": "2024-04-12",
            "participants": "Bob",
        }),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status_code);

    let (status_code, _, _) = add_trip(
        &mut app,
        json!({
            "destination": "Rotterdam",
            "startDate": "2024-03-01",
            "endDate": "2024-03-05",
            "purpose": "Port audit",
            "participants": "Alice, Bob",
        }),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status_code);

    let (status_code, body) = list_trips(&mut app, None).await;
    assert_eq!(StatusCode::OK, status_code);

    let trips = body["data"].as_array().unwrap();
    assert_eq!(2, trips.len());
    assert_eq!("Rotterdam", trips[0]["destination"]);
    assert_eq!("Hamburg", trips[1]["destination"]);
    assert_eq!("Port audit", trips[0]["purpose"]);
    assert!(trips[1]["purpose"].is_null());
}

#[tokio::test]
async fn test_list_trips_filters_on_participant() {
    let mut app = setup_test_app().await.router;

    add_trip(
        &mut app,
        json!({
            "destination": "Rotterdam",
            "startDate": "2024-03-01",
            "endDate": "2024-03-05",
            "participants": "Alice, Bob",
        }),
    )
    .await;
    add_trip(
        &mut app,
        json!({
            "destination": "Hamburg",
            "startDate": "2024-04-10",
            "endDate": "2024-04-12",
            "participants": "Bob",
        }),
    )
    .await;

    let (status_code, body) = list_trips(&mut app, Some("Alice")).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(1, body["data"].as_array().unwrap().len());
    assert_eq!("Rotterdam", body["data"][0]["destination"]);

    // the filter is a case-sensitive substring match
    let (_, body) = list_trips(&mut app, Some("alice")).await;
    assert_eq!(0, body["data"].as_array().unwrap().len());

    let (_, body) = list_trips(&mut app, Some("Bob")).await;
    assert_eq!(2, body["data"].as_array().unwrap().len());
}

#[tokio::test]
async fn test_record_trip_validation() {
    let mut app = setup_test_app().await.router;

    let (status_code, _, body) = add_trip(
        &mut app,
        json!({
            "destination": "  ",
            "startDate": "2024-03-01",
            "endDate": "2024-03-05",
        }),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Destination is required", error_message(&body));

    let (status_code, _, body) = add_trip(
        &mut app,
        json!({
            "destination": "Rotterdam",
            "startDate": "01-03-2024",
            "endDate": "2024-03-05",
        }),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Invalid date: 01-03-2024", error_message(&body));
}

#[tokio::test]
async fn test_oversized_body_is_refused() {
    let mut app = setup_test_app().await.router;

    // one byte over the 16 MiB body cap
    let oversized = "x".repeat(17 * 1024 * 1024);

    let (status_code, _, body) = add_trip(
        &mut app,
        json!({
            "destination": "Rotterdam",
            "startDate": "2024-03-01",
            "endDate": "2024-03-05",
            "purpose": oversized,
        }),
    )
    .await;
    assert_eq!(StatusCode::PAYLOAD_TOO_LARGE, status_code);
    assert_eq!("Payload too large", error_message(&body));

    let (_, body) = list_trips(&mut app, None).await;
    assert_eq!(0, body["data"].as_array().unwrap().len());
}

#[tokio::test]
async fn test_remove_trip_is_a_hard_delete() {
    let mut app = setup_test_app().await.router;

    let (_, trip_id, _) = add_trip(
        &mut app,
        json!({
            "destination": "Rotterdam",
            "startDate": "2024-03-01",
            "endDate": "2024-03-05",
        }),
    )
    .await;
    let trip_id = trip_id.unwrap();

    let (status_code, _) = request(
        &mut app,
        Method::POST,
        &format!("/remove_trip/{trip_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    let (_, body) = list_trips(&mut app, None).await;
    assert_eq!(0, body["data"].as_array().unwrap().len());

    // a second delete of the same ID is a 404
    let (status_code, body) = request(
        &mut app,
        Method::POST,
        &format!("/remove_trip/{trip_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("Trip not found", error_message(&body));

    let (status_code, _) = request(
        &mut app,
        Method::POST,
        &format!("/remove_trip/{}", Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
}

#[tokio::test]
async fn test_export_trips_as_csv() {
    let mut app = setup_test_app().await.router;

    add_trip(
        &mut app,
        json!({
            "destination": "Rotterdam",
            "startDate": "2024-03-01",
            "endDate": "2024-03-05",
            "purpose": "Port audit",
            "participants": "Alice, Bob",
        }),
    )
    .await;
    add_trip(
        &mut app,
        json!({
            "destination": "Hamburg",
            "startDate": "2024-04-10",
            "endDate": "2024-04-12",
            "participants": "Bob",
        }),
    )
    .await;

    let (status_code, headers, document) =
        raw_request(&mut app, Method::GET, "/export_trips", None, None).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(
        "text/csv; charset=utf-8",
        headers.get(CONTENT_TYPE).unwrap().to_str().unwrap()
    );
    assert_eq!(
        "attachment; filename=\"trips.csv\"",
        headers.get(CONTENT_DISPOSITION).unwrap().to_str().unwrap()
    );

    let lines = document.lines().collect::<Vec<_>>();
    assert_eq!(3, lines.len());
    assert_eq!(
        "Destination,Start Date,End Date,Purpose,Participants",
        lines[0]
    );
    assert_eq!(
        "Rotterdam,2024-03-01,2024-03-05,Port audit,\"Alice, Bob\"",
        lines[1]
    );
    assert_eq!("Hamburg,2024-04-10,2024-04-12,,Bob", lines[2]);
}
