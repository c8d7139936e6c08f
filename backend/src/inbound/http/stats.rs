//! Availability statistics handlers backed by the memoized cache.
//!
//! ```text
//! GET /api/v1/stats/availability
//! GET /api/v1/stats/available-units
//! GET /api/v1/stats/cache-health
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};

use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Availability summary for the whole inventory.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityStats {
    pub available_units: u64,
    pub total_units: u64,
    pub availability_percentage: f64,
}

/// Cached available-unit count.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableUnits {
    pub available_units: u64,
}

/// Cache health report.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheHealth {
    pub healthy: bool,
    pub status: String,
}

/// Availability summary: available and total counts plus the percentage.
#[utoipa::path(
    get,
    path = "/api/v1/stats/availability",
    responses(
        (status = 200, description = "Availability summary", body = AvailabilityStats),
        (status = 503, description = "Storage unavailable", body = crate::domain::Error)
    ),
    tags = ["stats"],
    operation_id = "availabilityStats"
)]
#[get("/stats/availability")]
pub async fn availability_stats(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<AvailabilityStats>> {
    let available = state.availability.available_count().await?;
    let total = state.units.count_total_units().await?;
    let percentage = if total == 0 {
        0.0
    } else {
        // Ratios never need more precision than f64 carries for realistic
        // inventory sizes.
        (available as f64 / total as f64) * 100.0
    };
    Ok(web::Json(AvailabilityStats {
        available_units: available,
        total_units: total,
        availability_percentage: percentage,
    }))
}

/// Cached count of units with no active booking.
#[utoipa::path(
    get,
    path = "/api/v1/stats/available-units",
    responses(
        (status = 200, description = "Available unit count", body = AvailableUnits),
        (status = 503, description = "Storage unavailable", body = crate::domain::Error)
    ),
    tags = ["stats"],
    operation_id = "availableUnits"
)]
#[get("/stats/available-units")]
pub async fn available_units(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<AvailableUnits>> {
    let available = state.availability.available_count().await?;
    Ok(web::Json(AvailableUnits {
        available_units: available,
    }))
}

/// Whether the availability cache can serve a count right now.
#[utoipa::path(
    get,
    path = "/api/v1/stats/cache-health",
    responses(
        (status = 200, description = "Cache health report", body = CacheHealth)
    ),
    tags = ["stats"],
    operation_id = "cacheHealth"
)]
#[get("/stats/cache-health")]
pub async fn cache_health(state: web::Data<HttpState>) -> ApiResult<web::Json<CacheHealth>> {
    let healthy = state.availability.is_healthy().await;
    Ok(web::Json(CacheHealth {
        healthy,
        status: if healthy { "OK" } else { "DEGRADED" }.to_owned(),
    }))
}
