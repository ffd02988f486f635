use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod favorites;
pub mod flights;
pub mod hotels;
pub mod state;

pub use state::{FavoritesState, FlightsState, HotelsState};

/// Router for the flight lookup service.
pub fn flights_app(state: FlightsState, allowed_origins: &[String]) -> Router {
    Router::new()
        .merge(flights::routes())
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router for the hotel lookup service.
pub fn hotels_app(state: HotelsState, allowed_origins: &[String]) -> Router {
    Router::new()
        .merge(hotels::routes())
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router for the favorites service.
pub fn favorites_app(state: FavoritesState, allowed_origins: &[String]) -> Router {
    Router::new()
        .merge(favorites::routes())
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// CORS Middleware; the allow-list comes from configuration. "*" or an
// empty list opens the surface to any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}
