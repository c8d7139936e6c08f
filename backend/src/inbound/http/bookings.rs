//! Bookings API handlers.
//!
//! ```text
//! POST /api/v1/bookings
//! GET /api/v1/bookings/{id}
//! PUT /api/v1/bookings/{id}/cancel
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Booking, BookingId, BookingStatus, CreateBookingRequest, Error, Money, UnitId, UserId,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Booking request body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingPayload {
    pub unit_id: UnitId,
    pub user_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TryFrom<CreateBookingPayload> for CreateBookingRequest {
    type Error = Error;

    fn try_from(payload: CreateBookingPayload) -> Result<Self, Error> {
        // Equal dates are allowed; the cost clamps such stays to one day.
        if payload.start_date > payload.end_date {
            return Err(Error::invalid_request(
                "startDate must not be after endDate",
            ));
        }
        Ok(Self {
            unit_id: payload.unit_id,
            user_id: payload.user_id,
            start_date: payload.start_date,
            end_date: payload.end_date,
        })
    }
}

/// Booking representation returned by the API. `totalCost` is integer cents.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: BookingId,
    pub unit_id: UnitId,
    pub user_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_cost: Money,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    /// Present only while the booking is a pending hold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            unit_id: booking.unit_id,
            user_id: booking.user_id,
            start_date: booking.start_date,
            end_date: booking.end_date,
            total_cost: booking.total_cost,
            status: booking.status,
            created_at: booking.created_at,
            expires_at: booking.expires_at,
        }
    }
}

/// Reserve a unit for a date range as a pending hold.
///
/// The hold expires fifteen minutes after creation unless a payment confirms
/// it. A date range overlapping an existing PENDING or CONFIRMED booking on
/// the same unit is rejected; a booking ending on day N conflicts with one
/// starting on day N.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingPayload,
    responses(
        (status = 201, description = "Pending hold created", body = BookingResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 404, description = "Unknown unit or user", body = crate::domain::Error),
        (status = 409, description = "Dates unavailable", body = crate::domain::Error),
        (status = 503, description = "Storage unavailable", body = crate::domain::Error)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    payload: web::Json<CreateBookingPayload>,
) -> ApiResult<HttpResponse> {
    let request = CreateBookingRequest::try_from(payload.into_inner())?;
    let booking = state.bookings.create_booking(request).await?;
    Ok(HttpResponse::Created().json(BookingResponse::from(booking)))
}

/// Fetch a booking by id.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking", body = BookingResponse),
        (status = 404, description = "Unknown booking", body = crate::domain::Error)
    ),
    tags = ["bookings"],
    operation_id = "getBooking"
)]
#[get("/bookings/{id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<BookingResponse>> {
    let booking = state.bookings.get_booking(BookingId::from_uuid(*id)).await?;
    Ok(web::Json(BookingResponse::from(booking)))
}

/// Cancel a pending or confirmed booking, releasing its dates.
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/cancel",
    params(("id" = Uuid, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Cancelled booking", body = BookingResponse),
        (status = 400, description = "Booking already terminal", body = crate::domain::Error),
        (status = 404, description = "Unknown booking", body = crate::domain::Error)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking"
)]
#[put("/bookings/{id}/cancel")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<BookingResponse>> {
    let booking = state
        .bookings
        .cancel_booking(BookingId::from_uuid(*id))
        .await?;
    Ok(web::Json(BookingResponse::from(booking)))
}
