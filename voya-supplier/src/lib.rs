pub mod client;
pub mod error;

pub use client::{BookingClient, FlightSearchQuery, HotelSearchQuery, ProviderConfig};
pub use error::UpstreamError;
