use std::sync::Arc;

use voya_core::currency::RateCache;
use voya_core::repository::FavoriteRepository;
use voya_supplier::BookingClient;

#[derive(Clone)]
pub struct FlightsState {
    pub supplier: Arc<BookingClient>,
}

#[derive(Clone)]
pub struct HotelsState {
    pub supplier: Arc<BookingClient>,
    /// Process-lifetime currency-rate memo, shared across requests.
    pub rates: Arc<RateCache>,
}

#[derive(Clone)]
pub struct FavoritesState {
    pub favorites: Arc<dyn FavoriteRepository>,
}
