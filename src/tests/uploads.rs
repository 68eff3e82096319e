use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;

use super::helper::error_message;
use super::helper::multipart_request;
use super::helper::raw_request;
use super::helper::request;
use super::helper::setup_test_app;

#[tokio::test]
async fn test_upload_network_diagrams_mixed_batch() {
    let mut app = setup_test_app().await.router;

    let (status_code, body) = multipart_request(
        &mut app,
        "/network_diagram",
        &[("pdfLabels", "core switch, floor 2")],
        &[
            ("pdfFiles", "diagram.pdf", b"%PDF-1.7 diagram"),
            ("pdfFiles", "notes.txt", b"plain text"),
        ],
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);

    let accepted = body["data"]["accepted"].as_array().unwrap();
    assert_eq!(1, accepted.len());
    assert!(accepted[0].as_str().unwrap().ends_with("_diagram.pdf"));

    let rejected = body["data"]["rejected"].as_array().unwrap();
    assert_eq!(1, rejected.len());
    assert_eq!("notes.txt", rejected[0]["file"]);
    assert_eq!(
        "File notes.txt has an invalid extension and was skipped",
        rejected[0]["reason"]
    );

    // only the accepted file landed in the bucket
    let (status_code, body) = request(&mut app, Method::GET, "/list_files", None, None).await;
    assert_eq!(StatusCode::OK, status_code);

    let files = body["data"].as_array().unwrap();
    assert_eq!(1, files.len());
    assert!(files[0].as_str().unwrap().ends_with("_diagram.pdf"));
}

#[tokio::test]
async fn test_upload_network_diagrams_validation() {
    let mut app = setup_test_app().await.router;

    let (status_code, body) = multipart_request(
        &mut app,
        "/network_diagram",
        &[],
        &[("pdfFiles", "diagram.pdf", b"%PDF-1.7")],
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("No labels provided", error_message(&body));

    let (status_code, body) = multipart_request(
        &mut app,
        "/network_diagram",
        &[("pdfLabels", "core switch")],
        &[],
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("No file part in the request", error_message(&body));
}

#[tokio::test]
async fn test_oversized_upload_is_refused() {
    let mut app = setup_test_app().await.router;

    let oversized = vec![b'a'; 17 * 1024 * 1024];

    let (status_code, body) = multipart_request(
        &mut app,
        "/network_diagram",
        &[("pdfLabels", "core switch")],
        &[("pdfFiles", "diagram.pdf", &oversized)],
    )
    .await;
    assert_eq!(StatusCode::PAYLOAD_TOO_LARGE, status_code);
    assert_eq!("Payload too large", error_message(&body));

    // nothing landed in the bucket
    let (_, body) = request(&mut app, Method::GET, "/list_files", None, None).await;
    assert_eq!(0, body["data"].as_array().unwrap().len());
}

#[tokio::test]
async fn test_work_report_upload_fetch_and_overwrite() {
    let mut app = setup_test_app().await.router;

    let (status_code, body) = multipart_request(
        &mut app,
        "/upload_work_report",
        &[("labels", "week 12")],
        &[("files", "report.pdf", b"%PDF-1.7 draft")],
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!("week_12_report.pdf", body["data"]["accepted"][0]);

    // same label and name replaces the file instead of adding one
    let (status_code, _) = multipart_request(
        &mut app,
        "/upload_work_report",
        &[("labels", "week 12")],
        &[("files", "report.pdf", b"%PDF-1.7 final")],
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);

    let (_, body) = request(&mut app, Method::GET, "/list_work_reports", None, None).await;
    assert_eq!(1, body["data"].as_array().unwrap().len());

    let (status_code, headers, document) = raw_request(
        &mut app,
        Method::GET,
        "/work_reports/week_12_report.pdf",
        None,
        None,
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(
        "application/pdf",
        headers.get(CONTENT_TYPE).unwrap().to_str().unwrap()
    );
    assert_eq!("%PDF-1.7 final", document);
}

#[tokio::test]
async fn test_work_report_files_without_labels_are_reported() {
    let mut app = setup_test_app().await.router;

    let (status_code, body) = multipart_request(
        &mut app,
        "/upload_work_report",
        &[("labels", "week 12")],
        &[
            ("files", "report.pdf", b"%PDF-1.7 first"),
            ("files", "extra.pdf", b"%PDF-1.7 second"),
        ],
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);

    assert_eq!(1, body["data"]["accepted"].as_array().unwrap().len());

    let rejected = body["data"]["rejected"].as_array().unwrap();
    assert_eq!(1, rejected.len());
    assert_eq!("extra.pdf", rejected[0]["file"]);
    assert_eq!("No label provided", rejected[0]["reason"]);
}

#[tokio::test]
async fn test_fetch_work_report_not_found_and_traversal() {
    let mut app = setup_test_app().await.router;

    let (status_code, body) = request(
        &mut app,
        Method::GET,
        "/work_reports/missing.pdf",
        None,
        None,
    )
    .await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("File not found", error_message(&body));

    // an encoded slash decodes into a path and is rejected
    let (status_code, body) = request(
        &mut app,
        Method::GET,
        "/work_reports/..%2Fescape.pdf",
        None,
        None,
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(error_message(&body).starts_with("File name"));
}
