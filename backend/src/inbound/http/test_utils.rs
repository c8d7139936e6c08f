//! Shared fixtures for HTTP handler tests.
//!
//! Handlers are exercised against the real services wired over a fresh
//! in-memory store, so tests observe the same behaviour as the binary.

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test as actix_test, web, App};
use serde_json::{json, Value};

use crate::inbound::http::state::HttpState;
use crate::server::{configure, AppContext};

/// Handler state over a fresh in-memory store.
pub fn test_state() -> HttpState {
    AppContext::in_memory(crate::domain::DEFAULT_SWEEP_INTERVAL).state
}

/// An application exposing the full `/api/v1` scope over the given state.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().configure(configure(state))
}

/// Register a user and return its id.
pub async fn create_test_user(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
) -> String {
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "email": email, "name": "Test User" }))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "user creation failed");
    let body: Value = actix_test::read_body_json(response).await;
    body.get("id")
        .and_then(Value::as_str)
        .expect("user id")
        .to_owned()
}

/// List a unit owned by `owner_id` with the given base cost and return its id.
pub async fn create_test_unit(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    owner_id: &str,
    base_cost: i64,
) -> String {
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/units")
            .set_json(json!({
                "numberOfRooms": 2,
                "accommodationType": "flat",
                "floor": 3,
                "baseCost": base_cost,
                "description": "Two-room flat near the station",
                "ownerId": owner_id,
            }))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "unit creation failed");
    let body: Value = actix_test::read_body_json(response).await;
    body.get("id")
        .and_then(Value::as_str)
        .expect("unit id")
        .to_owned()
}

/// Create a pending booking and return its id.
pub async fn create_test_booking(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    unit_id: &str,
    user_id: &str,
    start: &str,
    end: &str,
) -> String {
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/bookings")
            .set_json(json!({
                "unitId": unit_id,
                "userId": user_id,
                "startDate": start,
                "endDate": end,
            }))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "booking creation failed");
    let body: Value = actix_test::read_body_json(response).await;
    body.get("id")
        .and_then(Value::as_str)
        .expect("booking id")
        .to_owned()
}
