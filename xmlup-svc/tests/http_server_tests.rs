//! Integration tests for xmlup-svc HTTP endpoints
//!
//! Tests cover:
//! - Health and build info endpoints
//! - POST /api/correct: success download, field validation, missing anchor,
//!   missing file, wrong extension, non-UTF-8 upload, upload size limit

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method
use xmlup_svc::{build_router, AppState};

const BOUNDARY: &str = "XMLUPTESTBOUNDARY";
const SAMPLE_DOC: &str = "<a><lpage>5</lpage><b/></a>";

/// Test helper: Create app with default upload limit
fn setup_app() -> axum::Router {
    build_router(AppState::new(10 * 1024 * 1024))
}

/// Test helper: One multipart part
enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        file_name: &'a str,
        content: &'a [u8],
    },
}

/// Test helper: Build a multipart/form-data body
fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File { file_name, content } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                         Content-Type: text/xml\r\n\r\n",
                        file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(content);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Test helper: The four text fields
fn fields<'a>(volume: &'a str, issue: &'a str, year: &'a str, date: &'a str) -> Vec<Part<'a>> {
    vec![
        Part::Text("volume", volume),
        Part::Text("issue", issue),
        Part::Text("year", year),
        Part::Text("date", date),
    ]
}

/// Test helper: POST a multipart body to /api/correct
async fn post_correct(app: axum::Router, parts: &[Part<'_>]) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri("/api/correct")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();

    app.oneshot(request).await.unwrap()
}

/// Test helper: Extract body as text
async fn extract_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Body should be UTF-8")
}

/// Test helper: Extract JSON body
async fn extract_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health / Build Info
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app();

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "xmlup-svc");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_number());
}

#[tokio::test]
async fn test_buildinfo_endpoint() {
    let app = setup_app();

    let request = Request::builder()
        .uri("/api/buildinfo")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["git_hash"].is_string());
    assert!(body["build_timestamp"].is_string());
    assert!(body["build_profile"].is_string());
}

// =============================================================================
// Correction
// =============================================================================

#[tokio::test]
async fn test_correct_returns_download() {
    let mut parts = fields("105", "2", "2024", "2024-03-20");
    parts.push(Part::File {
        file_name: "article.xml",
        content: SAMPLE_DOC.as_bytes(),
    });

    let response = post_correct(setup_app(), &parts).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/xml");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"corrected_vol105_iss2.xml\""
    );

    let body = extract_text(response).await;
    assert!(body.starts_with("<a><lpage>5</lpage>\n        <issue-title content-type=\"ISSUE\">"));
    assert!(body.contains("Volumes 105, Issues 2, (2024): Veterinarija ir Zootechnika"));
    assert!(body.contains("<volume>105</volume>"));
    assert!(body.contains("<issue>2</issue>"));
    assert!(body.contains("iso-8601-date=\"2024-03-20\""));
    assert!(body.contains("<year>2024</year>"));
    assert!(body.ends_with("</pub-date><b/></a>"));
}

#[tokio::test]
async fn test_part_order_does_not_matter() {
    let parts = vec![
        Part::File {
            file_name: "article.xml",
            content: SAMPLE_DOC.as_bytes(),
        },
        Part::Text("date", "2020-01-01"),
        Part::Text("year", "2020"),
        Part::Text("issue", "3"),
        Part::Text("volume", "12"),
    ];

    let response = post_correct(setup_app(), &parts).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"corrected_vol12_iss3.xml\""
    );
}

#[tokio::test]
async fn test_validation_errors_reported_together() {
    let mut parts = fields("1.5", "", "twenty", "2024/03/20");
    parts.push(Part::File {
        file_name: "article.xml",
        content: SAMPLE_DOC.as_bytes(),
    });

    let response = post_correct(setup_app(), &parts).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = extract_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    let details: Vec<&str> = body["error"]["details"]
        .as_array()
        .expect("details should be an array")
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(
        details,
        vec![
            "Volume must be a number.",
            "Issue must be a number.",
            "Year must be a number.",
            "Date must be in YYYY-MM-DD format.",
        ]
    );
}

#[tokio::test]
async fn test_missing_text_parts_count_as_empty() {
    let parts = vec![
        Part::Text("volume", "105"),
        Part::File {
            file_name: "article.xml",
            content: SAMPLE_DOC.as_bytes(),
        },
    ];

    let response = post_correct(setup_app(), &parts).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = extract_json(response).await;
    assert_eq!(body["error"]["details"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_missing_anchor() {
    let mut parts = fields("105", "2", "2024", "2024-03-20");
    parts.push(Part::File {
        file_name: "article.xml",
        content: b"<a><fpage>1</fpage></a>",
    });

    let response = post_correct(setup_app(), &parts).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = extract_json(response).await;
    assert_eq!(body["error"]["code"], "ANCHOR_NOT_FOUND");
    assert_eq!(
        body["error"]["message"],
        "Could not find the tag '</lpage>' in the uploaded file."
    );
}

#[tokio::test]
async fn test_missing_file() {
    let parts = fields("105", "2", "2024", "2024-03-20");

    let response = post_correct(setup_app(), &parts).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response).await;
    assert_eq!(body["error"]["code"], "MISSING_FILE");
    assert_eq!(body["error"]["message"], "Please upload an XML file first.");
}

#[tokio::test]
async fn test_blank_file_input_is_missing_file() {
    // Browsers send an empty part with an empty file name when no file is chosen
    let mut parts = fields("105", "2", "2024", "2024-03-20");
    parts.push(Part::File {
        file_name: "",
        content: b"",
    });

    let response = post_correct(setup_app(), &parts).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response).await;
    assert_eq!(body["error"]["code"], "MISSING_FILE");
}

#[tokio::test]
async fn test_missing_file_checked_before_fields() {
    let parts = fields("", "", "", "");

    let response = post_correct(setup_app(), &parts).await;
    let body = extract_json(response).await;
    assert_eq!(body["error"]["code"], "MISSING_FILE");
}

#[tokio::test]
async fn test_non_xml_file_name_rejected() {
    let mut parts = fields("105", "2", "2024", "2024-03-20");
    parts.push(Part::File {
        file_name: "article.txt",
        content: SAMPLE_DOC.as_bytes(),
    });

    let response = post_correct(setup_app(), &parts).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("article.txt"));
}

#[tokio::test]
async fn test_non_utf8_upload_rejected() {
    let mut parts = fields("105", "2", "2024", "2024-03-20");
    parts.push(Part::File {
        file_name: "article.xml",
        content: &[b'<', b'a', 0xff, 0xfe, b'>'],
    });

    let response = post_correct(setup_app(), &parts).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_non_multipart_request_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/correct")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_upload_over_limit_rejected() {
    let app = build_router(AppState::new(1024));

    let large = format!("<a><lpage>1</lpage>{}</a>", "x".repeat(4096));
    let mut parts = fields("105", "2", "2024", "2024-03-20");
    parts.push(Part::File {
        file_name: "article.xml",
        content: large.as_bytes(),
    });

    let response = post_correct(app, &parts).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let body = extract_json(response).await;
    assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_get_on_correct_not_allowed() {
    let request = Request::builder()
        .uri("/api/correct")
        .body(Body::empty())
        .unwrap();

    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
