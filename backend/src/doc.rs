//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for the
//! REST API. The generated document is served by Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{AccommodationType, BookingStatus, Error, ErrorCode};
use crate::inbound::http::bookings::{BookingResponse, CreateBookingPayload};
use crate::inbound::http::payments::{PaymentResponse, ProcessPaymentRequest};
use crate::inbound::http::stats::{AvailabilityStats, AvailableUnits, CacheHealth};
use crate::inbound::http::units::{
    SortField, SortOrder, UnitPageResponse, UnitPayload, UnitResponse,
};
use crate::inbound::http::users::{CreateUserRequest, UserResponse};

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Booking backend API",
        description = "HTTP interface for unit inventory, bookings, payments, \
                       and availability statistics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::units::create_unit,
        crate::inbound::http::units::search_units,
        crate::inbound::http::units::get_unit,
        crate::inbound::http::units::update_unit,
        crate::inbound::http::units::delete_unit,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::bookings::cancel_booking,
        crate::inbound::http::payments::process_payment,
        crate::inbound::http::stats::availability_stats,
        crate::inbound::http::stats::available_units,
        crate::inbound::http::stats::cache_health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        AccommodationType,
        BookingStatus,
        CreateUserRequest,
        UserResponse,
        UnitPayload,
        UnitResponse,
        UnitPageResponse,
        SortField,
        SortOrder,
        CreateBookingPayload,
        BookingResponse,
        ProcessPaymentRequest,
        PaymentResponse,
        AvailabilityStats,
        AvailableUnits,
        CacheHealth,
    )),
    tags(
        (name = "users", description = "User registration and lookup"),
        (name = "units", description = "Unit inventory and search"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "payments", description = "Payment capture"),
        (name = "stats", description = "Availability statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
