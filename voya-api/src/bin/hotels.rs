use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voya_api::{hotels_app, state::HotelsState};
use voya_core::currency::RateCache;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voya_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = voya_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting hotel lookup service on port {}", config.server.hotels_port);

    let supplier = voya_supplier::BookingClient::new(config.supplier.clone())
        .expect("Failed to build supplier client");

    let state = HotelsState {
        supplier: Arc::new(supplier),
        rates: Arc::new(RateCache::new()),
    };
    let app = hotels_app(state, &config.cors.allowed_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.hotels_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
