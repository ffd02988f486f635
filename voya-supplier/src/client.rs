use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use voya_core::currency::{RateSource, TARGET_CURRENCY};
use voya_core::flights::CabinClass;
use voya_core::provider::{
    ExchangeRatesResponse, FlightLocationsResponse, FlightOffer, FlightSearchResponse, HotelOffer,
    HotelSearchResponse, LocationHit,
};
use voya_core::{CoreError, CoreResult};

use crate::error::UpstreamError;

/// Connection settings for the travel-search provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
    pub flights_base_url: String,
    pub flights_host: String,
    pub hotels_base_url: String,
    pub hotels_host: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

/// One upstream flight search, one direction.
#[derive(Debug, Clone)]
pub struct FlightSearchQuery {
    pub from_id: String,
    pub to_id: String,
    pub depart_date: String,
    pub adults: u32,
    pub children: u32,
    pub cabin: CabinClass,
}

/// One upstream hotel search.
#[derive(Debug, Clone)]
pub struct HotelSearchQuery {
    pub dest_id: String,
    pub checkin_date: String,
    pub checkout_date: String,
    pub adults: u32,
    pub children: u32,
}

/// Client for the third-party flight/hotel search provider.
///
/// Flights and hotels live on two different API hosts behind the same
/// key; each request carries the key and the matching host header.
#[derive(Debug, Clone)]
pub struct BookingClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl BookingClient {
    pub fn new(config: ProviderConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { http, config })
    }

    /// Resolve a free-text city name to the provider's airport code.
    ///
    /// Returns the first location entry carrying the airport marker. Every
    /// failure mode (network, non-2xx, malformed body, no match) collapses
    /// to `None`; the caller treats that as a client error.
    pub async fn airport_code(&self, city: &str) -> Option<String> {
        let url = format!("{}/api/v1/flights/searchDestination", self.config.flights_base_url);
        let params = [("query", city.to_string())];
        let response: FlightLocationsResponse = match self
            .get_json(&url, &self.config.flights_host, &params)
            .await
        {
            Ok(r) => r,
            Err(err) => {
                warn!("Airport lookup for {:?} failed: {}", city, err);
                return None;
            }
        };
        response.data.into_iter().find(LocationHit::is_airport).and_then(|hit| hit.id)
    }

    /// Resolve a free-text city name to the provider's hotel destination id.
    ///
    /// Same failure policy as [`airport_code`](Self::airport_code).
    pub async fn destination_id(&self, city: &str) -> Option<String> {
        let url = format!("{}/v1/hotels/locations", self.config.hotels_base_url);
        let params = [("name", city.to_string()), ("locale", "en-gb".to_string())];
        let hits: Vec<LocationHit> = match self
            .get_json(&url, &self.config.hotels_host, &params)
            .await
        {
            Ok(r) => r,
            Err(err) => {
                warn!("Destination lookup for {:?} failed: {}", city, err);
                return None;
            }
        };
        hits.into_iter().find(LocationHit::is_city).and_then(|hit| hit.dest_id)
    }

    /// One direction of a flight search, in upstream order.
    pub async fn search_flights(
        &self,
        query: &FlightSearchQuery,
    ) -> Result<Vec<FlightOffer>, UpstreamError> {
        let url = format!("{}/api/v1/flights/searchFlights", self.config.flights_base_url);
        let mut params: Vec<(&str, String)> = vec![
            ("fromId", query.from_id.clone()),
            ("toId", query.to_id.clone()),
            ("departDate", query.depart_date.clone()),
            ("stops", "none".to_string()),
            ("pageNo", "1".to_string()),
            ("adults", query.adults.to_string()),
            ("children", query.children.to_string()),
            ("sort", "BEST".to_string()),
            ("cabinClass", query.cabin.as_upstream().to_string()),
            ("currency_code", TARGET_CURRENCY.to_string()),
        ];
        if query.children > 0 {
            params.push(("children_age", child_ages(query.children)));
        }

        let response: FlightSearchResponse = self
            .get_json(&url, &self.config.flights_host, &params)
            .await?;
        debug!("Flight search returned {} offers", response.data.flight_offers.len());
        Ok(response.data.flight_offers)
    }

    /// One hotel search, in upstream order, priced in EUR where the
    /// provider supports it.
    pub async fn search_hotels(
        &self,
        query: &HotelSearchQuery,
    ) -> Result<Vec<HotelOffer>, UpstreamError> {
        let url = format!("{}/v1/hotels/search", self.config.hotels_base_url);
        let mut params: Vec<(&str, String)> = vec![
            ("checkin_date", query.checkin_date.clone()),
            ("checkout_date", query.checkout_date.clone()),
            ("adults_number", query.adults.to_string()),
            ("room_number", "1".to_string()),
            ("dest_id", query.dest_id.clone()),
            ("dest_type", "city".to_string()),
            ("order_by", "popularity".to_string()),
            ("locale", "en-gb".to_string()),
            ("units", "metric".to_string()),
            ("include_adjacency", "true".to_string()),
            ("page_number", "0".to_string()),
            ("filter_by_currency", TARGET_CURRENCY.to_string()),
        ];
        if query.children > 0 {
            params.push(("children_number", query.children.to_string()));
            params.push(("children_ages", child_ages(query.children)));
        }

        let response: HotelSearchResponse = self
            .get_json(&url, &self.config.hotels_host, &params)
            .await?;
        debug!("Hotel search returned {} offers", response.result.len());
        Ok(response.result)
    }

    /// EUR conversion rate for one unit of `currency`.
    pub async fn fetch_eur_rate(&self, currency: &str) -> Result<f64, UpstreamError> {
        let url = format!("{}/v1/metadata/exchange-rates", self.config.hotels_base_url);
        let params = [
            ("currency", TARGET_CURRENCY.to_string()),
            ("locale", "en-gb".to_string()),
        ];
        let response: ExchangeRatesResponse = self
            .get_json(&url, &self.config.hotels_host, &params)
            .await?;
        response
            .exchange_rates
            .iter()
            .find(|r| r.currency.as_deref() == Some(currency))
            .and_then(|r| r.rate())
            .ok_or_else(|| UpstreamError::Decode(format!("no exchange rate for {currency}")))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        host: &str,
        params: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let response = self
            .http
            .get(url)
            .header("x-rapidapi-key", &self.config.api_key)
            .header("x-rapidapi-host", host)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RateSource for BookingClient {
    async fn eur_rate(&self, currency: &str) -> CoreResult<f64> {
        self.fetch_eur_rate(currency)
            .await
            .map_err(|e| CoreError::UpstreamError(e.to_string()))
    }
}

/// The provider wants an age per child; the booking flow pins them at 5.
fn child_ages(children: u32) -> String {
    vec!["5"; children as usize].join(",")
}
