use async_trait::async_trait;
use uuid::Uuid;

use crate::favorites::{Favorite, NewFavorite};
use crate::CoreResult;

/// Repository trait for favorite itinerary access
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Persist a new favorite with a server-assigned id and creation
    /// timestamp, returning the id.
    async fn create(&self, favorite: &NewFavorite) -> CoreResult<Uuid>;

    /// All favorites for a user, in insertion order.
    async fn list_by_user(&self, user_id: &str) -> CoreResult<Vec<Favorite>>;
}
