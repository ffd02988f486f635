use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use voya_core::favorites::NewFavorite;

use crate::error::ApiError;
use crate::state::FavoritesState;

#[derive(Debug, Deserialize)]
pub struct CreateFavoriteRequest {
    pub user_id: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub itinerary: Option<Value>,
    pub flights: Option<Value>,
    pub hotels: Option<Value>,
}

/// Client view of a stored favorite. `user_id` is implied by the lookup
/// path and not echoed back.
#[derive(Debug, Serialize)]
pub struct FavoriteRecord {
    pub id: Uuid,
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub itinerary: Value,
    pub flights: Option<Value>,
    pub hotels: Option<Value>,
    pub created_at: DateTime<Utc>,
}

pub fn routes() -> Router<FavoritesState> {
    Router::new()
        .route("/api/favorites", post(create_favorite))
        .route("/api/favorites/{user_id}", get(list_favorites))
}

async fn create_favorite(
    State(state): State<FavoritesState>,
    Json(req): Json<CreateFavoriteRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    // Required-field validation surfaces as a 500 like every other failure
    // on this endpoint; the deployed client only distinguishes 201.
    let user_id = match req.user_id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(ApiError::Internal("Missing required field: user_id".to_string())),
    };
    let itinerary = req
        .itinerary
        .ok_or_else(|| ApiError::Internal("Missing required field: itinerary".to_string()))?;

    let favorite = NewFavorite {
        user_id,
        destination: req.destination,
        start_date: parse_date(req.start_date.as_deref())?,
        end_date: parse_date(req.end_date.as_deref())?,
        itinerary,
        flights: req.flights,
        hotels: req.hotels,
    };

    let id = state
        .favorites
        .create(&favorite)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!("Favorite {} stored for user {}", id, favorite.user_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Itinerary added to favorites"})),
    ))
}

async fn list_favorites(
    State(state): State<FavoritesState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<FavoriteRecord>>, ApiError> {
    let favorites = state
        .favorites
        .list_by_user(&user_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let records = favorites
        .into_iter()
        .map(|f| FavoriteRecord {
            id: f.id,
            destination: f.destination,
            start_date: f.start_date,
            end_date: f.end_date,
            itinerary: f.itinerary,
            flights: f.flights,
            hotels: f.hotels,
            created_at: f.created_at,
        })
        .collect();

    Ok(Json(records))
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match value {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| ApiError::Internal(format!("Invalid date {:?}: {}", s, e))),
    }
}
