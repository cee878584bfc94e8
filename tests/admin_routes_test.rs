mod common;

use actix_web::{http::header, test};
use serde_json::json;
use serial_test::serial;

use common::TestApp;

/// Middleware errors surface as `Err` from the test service; in production
/// actix-http renders them via `error_response()`. Do the same here so the
/// status assertions see the rendered HTTP status.
async fn call_status<S, R, B, E>(app: &S, req: R) -> actix_web::http::StatusCode
where
    S: actix_web::dev::Service<R, Response = actix_web::dev::ServiceResponse<B>, Error = E>,
    E: std::fmt::Debug + Into<actix_web::Error>,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => resp.status(),
        Err(err) => err.into().error_response().status(),
    }
}

const TEST_TOKEN: &str = "test-admin-token";

#[actix_rt::test]
#[serial]
async fn test_admin_verify_without_token() {
    std::env::set_var("ADMIN_API_TOKEN", TEST_TOKEN);
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/admin/auth/verify")
        .to_request();
    let status = call_status(&app, req).await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
#[serial]
async fn test_admin_verify_with_wrong_token() {
    std::env::set_var("ADMIN_API_TOKEN", TEST_TOKEN);
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/admin/auth/verify")
        .insert_header((header::AUTHORIZATION, "Bearer not-the-token"))
        .to_request();
    let status = call_status(&app, req).await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
#[serial]
async fn test_admin_verify_with_correct_token() {
    std::env::set_var("ADMIN_API_TOKEN", TEST_TOKEN);
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/admin/auth/verify")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", TEST_TOKEN)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
}

#[actix_rt::test]
#[serial]
async fn test_admin_rejected_when_token_not_configured() {
    std::env::remove_var("ADMIN_API_TOKEN");
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/admin/auth/verify")
        .insert_header((header::AUTHORIZATION, "Bearer anything"))
        .to_request();
    let status = call_status(&app, req).await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
#[serial]
async fn test_create_property_without_auth() {
    std::env::set_var("ADMIN_API_TOKEN", TEST_TOKEN);
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/properties")
        .set_json(&json!({
            "name": "Test Listing",
            "location": "Dubai Marina",
            "nightlyRate": 500.0
        }))
        .to_request();
    let status = call_status(&app, req).await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
#[serial]
async fn test_delete_property_without_auth() {
    std::env::set_var("ADMIN_API_TOKEN", TEST_TOKEN);
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::delete()
        .uri("/api/admin/properties/665f1e9aa3b4c2d1e8f90a01")
        .to_request();
    let status = call_status(&app, req).await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
#[serial]
async fn test_image_upload_without_auth() {
    std::env::set_var("ADMIN_API_TOKEN", TEST_TOKEN);
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/images/base64")
        .set_json(&json!({
            "data": "aGVsbG8=",
            "fileName": "test.png",
            "fileType": "image/png"
        }))
        .to_request();
    let status = call_status(&app, req).await;
    assert_eq!(status, 401);
}
