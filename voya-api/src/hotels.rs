use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use voya_core::currency::EurConverter;
use voya_core::hotels::{shortlist_hotels, NormalizedHotel};

use crate::error::ApiError;
use crate::state::HotelsState;

#[derive(Debug, Deserialize)]
pub struct HotelSearchRequest {
    #[serde(default)]
    pub destination: String,
    #[serde(default, rename = "startDate")]
    pub start_date: String,
    #[serde(default, rename = "endDate")]
    pub end_date: String,
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default, rename = "useCustomBudget")]
    pub use_custom_budget: bool,
    /// Budget ceiling in EUR; arrives as a number or a numeric string.
    #[serde(default, rename = "budgetHotels")]
    pub budget_hotels: Option<Value>,
}

fn default_adults() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct HotelSearchResponse {
    pub hotels: Vec<NormalizedHotel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub fn routes() -> Router<HotelsState> {
    Router::new().route("/api/hotels", post(search_hotels))
}

async fn search_hotels(
    State(state): State<HotelsState>,
    Json(req): Json<HotelSearchRequest>,
) -> Result<Json<HotelSearchResponse>, ApiError> {
    if req.destination.is_empty() || req.start_date.is_empty() || req.end_date.is_empty() {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }

    // 1. Resolve the destination before touching the search endpoint
    let Some(dest_id) = state.supplier.destination_id(&req.destination).await else {
        return Err(ApiError::UnresolvedLocation("Destination not found".to_string()));
    };

    info!(
        "Hotel search in {} (id {}) from {} to {}",
        req.destination, dest_id, req.start_date, req.end_date
    );

    // 2. Search; upstream failures degrade to an empty list
    let offers = match state
        .supplier
        .search_hotels(&voya_supplier::HotelSearchQuery {
            dest_id,
            checkin_date: req.start_date.clone(),
            checkout_date: req.end_date.clone(),
            adults: req.adults,
            children: req.children,
        })
        .await
    {
        Ok(offers) => offers,
        Err(err) => {
            warn!("Hotel search in {} failed: {}", req.destination, err);
            Vec::new()
        }
    };

    // 3. Convert, budget-filter, truncate, normalize
    let ceiling = req.use_custom_budget.then(|| coerce_budget(req.budget_hotels.as_ref()));
    let converter = EurConverter::new(&state.rates, &*state.supplier);
    let hotels = shortlist_hotels(&offers, ceiling, &req.start_date, &req.end_date, &converter).await;

    if hotels.is_empty() {
        return Ok(Json(HotelSearchResponse {
            hotels: Vec::new(),
            message: Some("No hotels found".to_string()),
        }));
    }

    Ok(Json(HotelSearchResponse { hotels, message: None }))
}

/// The client sends the ceiling as a number or a numeric string; anything
/// unusable counts as 0.
fn coerce_budget(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}
