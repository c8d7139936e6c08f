//! Payments API handlers.
//!
//! ```text
//! POST /api/v1/payments/process {"bookingId":"...","paymentMethod":"card"}
//! ```

use actix_web::{post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{BookingId, Money, Payment, PaymentId};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Payment request body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentRequest {
    pub booking_id: BookingId,
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// Payment representation returned by the API. `amount` is integer cents.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: PaymentId,
    pub booking_id: BookingId,
    pub amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    pub transaction_id: String,
    pub processed_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            booking_id: payment.booking_id,
            amount: payment.amount,
            payment_method: payment.payment_method,
            transaction_id: payment.transaction_id,
            processed_at: payment.processed_at,
        }
    }
}

/// Capture payment for a pending booking, confirming it.
///
/// The captured amount is always the booking's full total cost.
#[utoipa::path(
    post,
    path = "/api/v1/payments/process",
    request_body = ProcessPaymentRequest,
    responses(
        (status = 200, description = "Payment captured", body = PaymentResponse),
        (status = 400, description = "Booking not pending", body = crate::domain::Error),
        (status = 404, description = "Unknown booking", body = crate::domain::Error),
        (status = 503, description = "Storage unavailable", body = crate::domain::Error)
    ),
    tags = ["payments"],
    operation_id = "processPayment"
)]
#[post("/payments/process")]
pub async fn process_payment(
    state: web::Data<HttpState>,
    payload: web::Json<ProcessPaymentRequest>,
) -> ApiResult<web::Json<PaymentResponse>> {
    let payload = payload.into_inner();
    let payment = state
        .payments
        .process_payment(payload.booking_id, payload.payment_method)
        .await?;
    Ok(web::Json(PaymentResponse::from(payment)))
}
