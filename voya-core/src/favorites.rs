use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A persisted itinerary bundle. Identity is `id`; lookups go by `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: String,
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub itinerary: Value,
    pub flights: Option<Value>,
    pub hotels: Option<Value>,
    /// Set once at creation, immutable afterwards.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a favorite. `user_id` and `itinerary` are required
/// and validated before this struct is built.
#[derive(Debug, Clone)]
pub struct NewFavorite {
    pub user_id: String,
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub itinerary: Value,
    pub flights: Option<Value>,
    pub hotels: Option<Value>,
}
