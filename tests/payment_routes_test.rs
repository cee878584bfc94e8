mod common;

use actix_web::test;
use serde_json::json;
use serial_test::serial;

use common::TestApp;

#[actix_rt::test]
#[serial]
async fn test_payment_intent_rejects_checkout_before_checkin() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/payments/payment-intent")
        .set_json(&json!({
            "propertyId": "665f1e9aa3b4c2d1e8f90a01",
            "checkIn": "2026-09-05",
            "checkOut": "2026-09-03",
            "guests": 2
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body = test::read_body(resp).await;
    assert_eq!(body, "Check-out must be after check-in");
}

#[actix_rt::test]
#[serial]
async fn test_payment_intent_rejects_past_checkin() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/payments/payment-intent")
        .set_json(&json!({
            "propertyId": "665f1e9aa3b4c2d1e8f90a01",
            "checkIn": "2020-01-01",
            "checkOut": "2020-01-05",
            "guests": 2
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body = test::read_body(resp).await;
    assert_eq!(body, "Check-in cannot be in the past");
}

#[actix_rt::test]
#[serial]
async fn test_payment_intent_rejects_invalid_property_id() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/payments/payment-intent")
        .set_json(&json!({
            "propertyId": "not-an-object-id",
            "checkIn": "2099-09-01",
            "checkOut": "2099-09-03",
            "guests": 2
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_payment_intent_rejects_missing_fields() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/payments/payment-intent")
        .set_json(&json!({ "propertyId": "665f1e9aa3b4c2d1e8f90a01" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_rt::test]
#[serial]
async fn test_confirm_rejects_invalid_payment_intent_id() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/payments/confirm")
        .set_json(&json!({
            "paymentIntentId": "not a payment intent",
            "propertyId": "665f1e9aa3b4c2d1e8f90a01",
            "checkIn": "2099-09-01",
            "checkOut": "2099-09-03",
            "guests": 2,
            "guestName": "Amira Khan",
            "guestEmail": "amira@example.com"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_confirm_rejects_bad_dates_before_gateway_lookup() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/payments/confirm")
        .set_json(&json!({
            "paymentIntentId": "pi_test_123",
            "propertyId": "665f1e9aa3b4c2d1e8f90a01",
            "checkIn": "2099-09-03",
            "checkOut": "2099-09-03",
            "guests": 2,
            "guestName": "Amira Khan",
            "guestEmail": "amira@example.com"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body = test::read_body(resp).await;
    assert_eq!(body, "Check-out must be after check-in");
}
