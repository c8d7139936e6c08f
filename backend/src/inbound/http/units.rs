//! Units API handlers.
//!
//! ```text
//! POST /api/v1/units
//! GET /api/v1/units/search?numberOfRooms=2&startDate=2026-09-01&endDate=2026-09-05
//! GET /api/v1/units/{id}
//! PUT /api/v1/units/{id}
//! DELETE /api/v1/units/{id}
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{SortDirection, UnitPage, UnitSearchFilter, UnitSortKey};
use crate::domain::{AccommodationType, Error, Money, Unit, UnitDraft, UnitId, UserId};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Default page size for unit searches.
const DEFAULT_PAGE_SIZE: u32 = 20;
/// Upper bound on requested page sizes.
const MAX_PAGE_SIZE: u32 = 100;

/// Unit create/update request body. Costs are integer cents.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitPayload {
    pub number_of_rooms: u32,
    pub accommodation_type: AccommodationType,
    pub floor: u32,
    pub base_cost: Money,
    /// Defaults to `baseCost` when omitted.
    #[serde(default)]
    pub final_cost: Option<Money>,
    pub description: String,
    pub owner_id: UserId,
}

impl From<UnitPayload> for UnitDraft {
    fn from(payload: UnitPayload) -> Self {
        Self {
            number_of_rooms: payload.number_of_rooms,
            accommodation_type: payload.accommodation_type,
            floor: payload.floor,
            base_cost: payload.base_cost,
            final_cost: payload.final_cost,
            description: payload.description,
            owner_id: payload.owner_id,
        }
    }
}

/// Unit representation returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitResponse {
    pub id: UnitId,
    pub number_of_rooms: u32,
    pub accommodation_type: AccommodationType,
    pub floor: u32,
    pub base_cost: Money,
    pub final_cost: Money,
    pub description: String,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl From<Unit> for UnitResponse {
    fn from(unit: Unit) -> Self {
        Self {
            id: unit.id,
            number_of_rooms: unit.number_of_rooms,
            accommodation_type: unit.accommodation_type,
            floor: unit.floor,
            base_cost: unit.base_cost,
            final_cost: unit.final_cost,
            description: unit.description,
            owner_id: unit.owner_id,
            created_at: unit.created_at,
        }
    }
}

/// Sort field accepted by the search endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    FinalCost,
    NumberOfRooms,
}

impl From<SortField> for UnitSortKey {
    fn from(field: SortField) -> Self {
        match field {
            SortField::CreatedAt => Self::CreatedAt,
            SortField::FinalCost => Self::FinalCost,
            SortField::NumberOfRooms => Self::NumberOfRooms,
        }
    }
}

/// Sort order accepted by the search endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl From<SortOrder> for SortDirection {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Self::Asc,
            SortOrder::Desc => Self::Desc,
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Query parameters for the search endpoint.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UnitSearchQuery {
    pub number_of_rooms: Option<u32>,
    pub accommodation_type: Option<AccommodationType>,
    pub floor: Option<u32>,
    /// Minimum final cost in cents.
    pub min_cost: Option<Money>,
    /// Maximum final cost in cents.
    pub max_cost: Option<Money>,
    /// Start of the desired stay; requires `endDate`.
    pub start_date: Option<NaiveDate>,
    /// End of the desired stay; requires `startDate`.
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_direction: SortOrder,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

impl TryFrom<UnitSearchQuery> for UnitSearchFilter {
    type Error = Error;

    fn try_from(query: UnitSearchQuery) -> Result<Self, Error> {
        let stay = validate_stay(query.start_date, query.end_date)?;
        if query.size == 0 || query.size > MAX_PAGE_SIZE {
            return Err(Error::invalid_request(format!(
                "size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self {
            number_of_rooms: query.number_of_rooms,
            accommodation_type: query.accommodation_type,
            floor: query.floor,
            min_cost: query.min_cost,
            max_cost: query.max_cost,
            stay,
            sort_key: query.sort_by.into(),
            sort_direction: query.sort_direction.into(),
            page: query.page,
            size: query.size,
        })
    }
}

/// Validate a stay range from the transport layer. Equal dates are allowed;
/// the booking cost clamps such stays to one day.
fn validate_stay(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Option<(NaiveDate, NaiveDate)>, Error> {
    match (start, end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) if start <= end => Ok(Some((start, end))),
        (Some(_), Some(_)) => Err(Error::invalid_request(
            "startDate must not be after endDate",
        )),
        _ => Err(Error::invalid_request(
            "startDate and endDate must be provided together",
        )),
    }
}

/// One page of unit search results.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitPageResponse {
    pub items: Vec<UnitResponse>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
}

impl From<UnitPage> for UnitPageResponse {
    fn from(page: UnitPage) -> Self {
        Self {
            items: page.items.into_iter().map(UnitResponse::from).collect(),
            page: page.page,
            size: page.size,
            total: page.total,
        }
    }
}

/// List a new unit.
#[utoipa::path(
    post,
    path = "/api/v1/units",
    request_body = UnitPayload,
    responses(
        (status = 201, description = "Unit created", body = UnitResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 404, description = "Unknown owner", body = crate::domain::Error)
    ),
    tags = ["units"],
    operation_id = "createUnit"
)]
#[post("/units")]
pub async fn create_unit(
    state: web::Data<HttpState>,
    payload: web::Json<UnitPayload>,
) -> ApiResult<HttpResponse> {
    let unit = state.units.create_unit(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(UnitResponse::from(unit)))
}

/// Search units with filters, an optional stay range, sorting, and paging.
#[utoipa::path(
    get,
    path = "/api/v1/units/search",
    params(UnitSearchQuery),
    responses(
        (status = 200, description = "Matching units", body = UnitPageResponse),
        (status = 400, description = "Invalid query", body = crate::domain::Error)
    ),
    tags = ["units"],
    operation_id = "searchUnits"
)]
#[get("/units/search")]
pub async fn search_units(
    state: web::Data<HttpState>,
    query: web::Query<UnitSearchQuery>,
) -> ApiResult<web::Json<UnitPageResponse>> {
    let filter = UnitSearchFilter::try_from(query.into_inner())?;
    let page = state.units.search_units(filter).await?;
    Ok(web::Json(UnitPageResponse::from(page)))
}

/// Fetch a unit by id.
#[utoipa::path(
    get,
    path = "/api/v1/units/{id}",
    params(("id" = Uuid, Path, description = "Unit identifier")),
    responses(
        (status = 200, description = "Unit", body = UnitResponse),
        (status = 404, description = "Unknown unit", body = crate::domain::Error)
    ),
    tags = ["units"],
    operation_id = "getUnit"
)]
#[get("/units/{id}")]
pub async fn get_unit(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<UnitResponse>> {
    let unit = state.units.get_unit(UnitId::from_uuid(*id)).await?;
    Ok(web::Json(UnitResponse::from(unit)))
}

/// Replace a unit's fields.
#[utoipa::path(
    put,
    path = "/api/v1/units/{id}",
    params(("id" = Uuid, Path, description = "Unit identifier")),
    request_body = UnitPayload,
    responses(
        (status = 200, description = "Updated unit", body = UnitResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 404, description = "Unknown unit or owner", body = crate::domain::Error)
    ),
    tags = ["units"],
    operation_id = "updateUnit"
)]
#[put("/units/{id}")]
pub async fn update_unit(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
    payload: web::Json<UnitPayload>,
) -> ApiResult<web::Json<UnitResponse>> {
    let unit = state
        .units
        .update_unit(UnitId::from_uuid(*id), payload.into_inner().into())
        .await?;
    Ok(web::Json(UnitResponse::from(unit)))
}

/// Delete a unit.
#[utoipa::path(
    delete,
    path = "/api/v1/units/{id}",
    params(("id" = Uuid, Path, description = "Unit identifier")),
    responses(
        (status = 204, description = "Unit deleted"),
        (status = 404, description = "Unknown unit", body = crate::domain::Error)
    ),
    tags = ["units"],
    operation_id = "deleteUnit"
)]
#[delete("/units/{id}")]
pub async fn delete_unit(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.units.delete_unit(UnitId::from_uuid(*id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{json, Value};

    use crate::inbound::http::test_utils::{create_test_user, test_app, test_state};

    fn unit_payload(owner_id: &str) -> Value {
        json!({
            "numberOfRooms": 2,
            "accommodationType": "flat",
            "floor": 3,
            "baseCost": 10_000,
            "description": "Two-room flat near the station",
            "ownerId": owner_id,
        })
    }

    #[actix_web::test]
    async fn create_then_fetch_round_trips() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let owner = create_test_user(&app, "owner@example.com").await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/units")
                .set_json(unit_payload(&owner))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(created).await;
        // finalCost defaults to baseCost.
        assert_eq!(body.get("finalCost").and_then(Value::as_i64), Some(10_000));
        let id = body.get("id").and_then(Value::as_str).expect("unit id");

        let fetched = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/units/{id}"))
                .to_request(),
        )
        .await;
        assert_eq!(fetched.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn create_rejects_unknown_owner() {
        let app = actix_test::init_service(test_app(test_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/units")
                .set_json(unit_payload("3fa85f64-5717-4562-b3fc-2c963f66afa6"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn create_rejects_non_positive_cost() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let owner = create_test_user(&app, "owner@example.com").await;

        let mut payload = unit_payload(&owner);
        payload["baseCost"] = json!(0);
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/units")
                .set_json(payload)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn delete_returns_no_content_then_not_found() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let owner = create_test_user(&app, "owner@example.com").await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/units")
                .set_json(unit_payload(&owner))
                .to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(created).await;
        let id = body.get("id").and_then(Value::as_str).expect("unit id");

        let deleted = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/units/{id}"))
                .to_request(),
        )
        .await;
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let again = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/units/{id}"))
                .to_request(),
        )
        .await;
        assert_eq!(again.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[case("startDate=2026-09-05&endDate=2026-09-01")]
    #[case("startDate=2026-09-01")]
    #[case("size=0")]
    #[case("size=101")]
    #[actix_web::test]
    async fn search_rejects_invalid_queries(#[case] query: &str) {
        let app = actix_test::init_service(test_app(test_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/units/search?{query}"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn search_filters_and_sorts() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let owner = create_test_user(&app, "owner@example.com").await;

        for (rooms, cost) in [(1, 5_000), (2, 10_000), (3, 20_000)] {
            let mut payload = unit_payload(&owner);
            payload["numberOfRooms"] = json!(rooms);
            payload["baseCost"] = json!(cost);
            let response = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/units")
                    .set_json(payload)
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/units/search?minCost=10000&sortBy=finalCost&sortDirection=desc")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("total").and_then(Value::as_u64), Some(2));
        let items = body.get("items").and_then(Value::as_array).expect("items");
        assert_eq!(items[0].get("finalCost").and_then(Value::as_i64), Some(20_000));
    }
}
