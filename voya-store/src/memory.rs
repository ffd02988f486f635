//! In-memory implementation of [`FavoriteRepository`] for tests, so the
//! router can be exercised without a database.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use voya_core::favorites::{Favorite, NewFavorite};
use voya_core::repository::FavoriteRepository;
use voya_core::CoreResult;

#[derive(Debug, Clone, Default)]
pub struct InMemoryFavoriteRepository {
    storage: Arc<RwLock<Vec<Favorite>>>,
}

impl InMemoryFavoriteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.storage
            .read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FavoriteRepository for InMemoryFavoriteRepository {
    async fn create(&self, favorite: &NewFavorite) -> CoreResult<Uuid> {
        let record = Favorite {
            id: Uuid::new_v4(),
            user_id: favorite.user_id.clone(),
            destination: favorite.destination.clone(),
            start_date: favorite.start_date,
            end_date: favorite.end_date,
            itinerary: favorite.itinerary.clone(),
            flights: favorite.flights.clone(),
            hotels: favorite.hotels.clone(),
            created_at: Utc::now(),
        };
        let id = record.id;
        let mut storage = self.storage.write().unwrap_or_else(|e| e.into_inner());
        storage.push(record);
        Ok(id)
    }

    async fn list_by_user(&self, user_id: &str) -> CoreResult<Vec<Favorite>> {
        let storage = self.storage.read().unwrap_or_else(|e| e.into_inner());
        Ok(storage
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_list_preserves_insertion_order() {
        let repo = InMemoryFavoriteRepository::new();
        for destination in ["Paris", "Rome"] {
            repo.create(&NewFavorite {
                user_id: "u1".to_string(),
                destination: Some(destination.to_string()),
                start_date: None,
                end_date: None,
                itinerary: serde_json::json!({"days": 3}),
                flights: None,
                hotels: None,
            })
            .await
            .unwrap();
        }

        let favorites = repo.list_by_user("u1").await.unwrap();
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites[0].destination.as_deref(), Some("Paris"));
        assert_eq!(favorites[1].destination.as_deref(), Some("Rome"));
        assert!(repo.list_by_user("u2").await.unwrap().is_empty());
    }
}
