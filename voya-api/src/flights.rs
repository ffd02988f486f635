use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use voya_core::flights::{normalize_flight, CabinClass, NormalizedFlight, QuoteContext, MAX_RESULTS};
use voya_supplier::FlightSearchQuery;

use crate::error::ApiError;
use crate::state::FlightsState;

#[derive(Debug, Deserialize)]
pub struct FlightSearchRequest {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub depart_date: String,
    #[serde(default)]
    pub return_date: Option<String>,
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    /// Budget-tier label; selects the cabin class.
    #[serde(default)]
    pub budget: Option<String>,
}

fn default_adults() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct FlightSearchResponse {
    pub outbound: Vec<NormalizedFlight>,
    #[serde(rename = "return")]
    pub return_flights: Vec<NormalizedFlight>,
}

pub fn routes() -> Router<FlightsState> {
    Router::new().route("/api/flights", post(search_flights))
}

async fn search_flights(
    State(state): State<FlightsState>,
    Json(req): Json<FlightSearchRequest>,
) -> Result<Json<FlightSearchResponse>, ApiError> {
    info!("Flight search: {} -> {} on {}", req.from, req.to, req.depart_date);

    let cabin = CabinClass::from_budget_label(req.budget.as_deref().unwrap_or(""));

    // 1. Resolve both city names before touching the search endpoint
    let from_code = state.supplier.airport_code(&req.from).await;
    let to_code = state.supplier.airport_code(&req.to).await;
    let (Some(from_code), Some(to_code)) = (from_code, to_code) else {
        return Err(ApiError::UnresolvedLocation(
            "Unable to resolve airport codes".to_string(),
        ));
    };

    // 2. One search per direction; upstream failures degrade to empty lists
    let outbound_raw = run_search(
        &state,
        FlightSearchQuery {
            from_id: from_code.clone(),
            to_id: to_code.clone(),
            depart_date: req.depart_date.clone(),
            adults: req.adults,
            children: req.children,
            cabin,
        },
    )
    .await;

    let return_raw = match &req.return_date {
        Some(return_date) => {
            run_search(
                &state,
                FlightSearchQuery {
                    from_id: to_code,
                    to_id: from_code,
                    depart_date: return_date.clone(),
                    adults: req.adults,
                    children: req.children,
                    cabin,
                },
            )
            .await
        }
        None => Vec::new(),
    };

    // 3. Normalize at most MAX_RESULTS per direction, in upstream order
    let outbound_ctx = QuoteContext {
        adults: req.adults,
        children: req.children,
        cabin,
        companion_date: req.return_date.clone(),
    };
    let return_ctx = QuoteContext {
        adults: req.adults,
        children: req.children,
        cabin,
        companion_date: Some(req.depart_date.clone()),
    };

    let outbound: Vec<NormalizedFlight> = outbound_raw
        .iter()
        .take(MAX_RESULTS)
        .map(|offer| normalize_flight(offer, &outbound_ctx))
        .collect();
    let return_flights: Vec<NormalizedFlight> = return_raw
        .iter()
        .take(MAX_RESULTS)
        .map(|offer| normalize_flight(offer, &return_ctx))
        .collect();

    info!("Flight search done: {} outbound, {} return", outbound.len(), return_flights.len());

    Ok(Json(FlightSearchResponse { outbound, return_flights }))
}

async fn run_search(
    state: &FlightsState,
    query: FlightSearchQuery,
) -> Vec<voya_core::provider::FlightOffer> {
    match state.supplier.search_flights(&query).await {
        Ok(offers) => offers,
        Err(err) => {
            warn!("Flight search {} -> {} failed: {}", query.from_id, query.to_id, err);
            Vec::new()
        }
    }
}
