use std::path::Path;
use std::time::Duration;

use actix_web::{http::StatusCode, test, web, App};
use invoice_server::config::AppConfig;
use invoice_server::invoice::handlers;
use invoice_server::{AppState, ErrorResponse};

fn test_state(root: &Path) -> web::Data<AppState> {
    let config = AppConfig {
        assets_dir: root.join("assets"),
        tmp_dir: root.join("tmp"),
        soffice_path: "soffice".into(),
        settle: Duration::from_millis(0),
    };
    config.ensure_dirs().unwrap();
    web::Data::new(AppState::new(config))
}

macro_rules! invoice_app {
    ($state:expr) => {
        test::init_service(
            App::new().app_data($state).service(
                web::scope("/api")
                    .service(
                        web::resource("/invoice/generate")
                            .route(web::post().to(handlers::generate_invoice)),
                    )
                    .service(
                        web::resource("/invoice/generate-zip")
                            .route(web::post().to(handlers::generate_invoice_zip)),
                    ),
            ),
        )
        .await
    };
}

#[actix_web::test]
async fn test_generate_rejects_invalid_record() {
    let root = tempfile::tempdir().unwrap();
    let app = invoice_app!(test_state(root.path()));

    let req = test::TestRequest::post()
        .uri("/api/invoice/generate")
        .set_json(serde_json::json!({
            "invoiceNum": "",
            "fullName": "Jane Doe",
            "fullAddress": "1 Main St",
            "amount": -10.0,
            "bankName": "Test Bank",
            "bankBranch": "HQ",
            "accountNumber": "123456"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.error.contains("[invoiceNum]"));
    assert!(body.error.contains("[amount]"));
}

#[actix_web::test]
async fn test_generate_fails_cleanly_without_template() {
    let root = tempfile::tempdir().unwrap();
    let app = invoice_app!(test_state(root.path()));

    let req = test::TestRequest::post()
        .uri("/api/invoice/generate")
        .set_json(serde_json::json!({
            "invoiceNum": "INV-001",
            "fullName": "Jane Doe",
            "fullAddress": "1 Main St",
            "amount": 10000.0,
            "bankName": "Test Bank",
            "bankBranch": "HQ",
            "accountNumber": "123456"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "Failed to generate PDF file");

    // The failed request leaves nothing behind in the scratch directory.
    let leftovers: Vec<_> = std::fs::read_dir(root.path().join("tmp")).unwrap().collect();
    assert!(leftovers.is_empty());
}

#[actix_web::test]
async fn test_generate_zip_rejects_empty_batch() {
    let root = tempfile::tempdir().unwrap();
    let app = invoice_app!(test_state(root.path()));

    let req = test::TestRequest::post()
        .uri("/api/invoice/generate-zip")
        .set_json(serde_json::json!({ "invoices": [] }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "No invoices provided");
}

#[actix_web::test]
async fn test_generate_zip_reports_total_failure() {
    let root = tempfile::tempdir().unwrap();
    let app = invoice_app!(test_state(root.path()));

    // Template is absent, so every record fails and the batch aborts.
    let req = test::TestRequest::post()
        .uri("/api/invoice/generate-zip")
        .set_json(serde_json::json!({ "invoices": [{
            "invoiceNum": "INV-001",
            "fullName": "Jane Doe",
            "fullAddress": "1 Main St",
            "amount": 10000.0,
            "bankName": "Test Bank",
            "bankBranch": "HQ",
            "accountNumber": "123456"
        }] }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.error.contains("INV-001"));
}
