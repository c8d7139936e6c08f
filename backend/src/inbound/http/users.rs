//! Users API handlers.
//!
//! ```text
//! POST /api/v1/users {"email":"ada@example.com","name":"Ada"}
//! GET /api/v1/users/{id}
//! ```

use actix_web::{get, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{User, UserId};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// User registration request body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
}

/// User representation returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 409, description = "Email already registered", body = crate::domain::Error),
        (status = 503, description = "Storage unavailable", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let user = state.users.create_user(payload.email, payload.name).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Fetch a user by id.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "Unknown user", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.users.get_user(UserId::from_uuid(*id)).await?;
    Ok(web::Json(UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{json, Value};

    use crate::inbound::http::test_utils::{test_app, test_state};

    #[actix_web::test]
    async fn create_user_returns_created_with_camel_case_json() {
        let app = actix_test::init_service(test_app(test_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(json!({ "email": "ada@example.com", "name": "Ada" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("email").and_then(Value::as_str),
            Some("ada@example.com")
        );
        assert!(body.get("createdAt").is_some());
        assert!(body.get("created_at").is_none());
    }

    #[actix_web::test]
    async fn duplicate_email_conflicts() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let payload = json!({ "email": "ada@example.com", "name": "Ada" });

        let first = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(&payload)
                .to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(&payload)
                .to_request(),
        )
        .await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn unknown_user_is_not_found() {
        let app = actix_test::init_service(test_app(test_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/3fa85f64-5717-4562-b3fc-2c963f66afa6")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
