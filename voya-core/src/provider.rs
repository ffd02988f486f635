use serde::Deserialize;
use serde_json::Value;

/// Marker suffix the location endpoint puts on airport entries.
pub const AIRPORT_MARKER: &str = ".AIRPORT";

/// `dest_type` value identifying a city entry on the hotel location endpoint.
pub const CITY_DEST_TYPE: &str = "city";

/// One entry from a location-search endpoint.
///
/// The flights API returns entries with an `id` like `"PAR.AIRPORT"`;
/// the hotels API returns entries with `dest_id`/`dest_type`. Both shapes
/// are folded into this struct, every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationHit {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub dest_id: Option<String>,
    #[serde(default)]
    pub dest_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl LocationHit {
    pub fn is_airport(&self) -> bool {
        self.id
            .as_deref()
            .map(|id| id.ends_with(AIRPORT_MARKER))
            .unwrap_or(false)
    }

    pub fn is_city(&self) -> bool {
        self.dest_type.as_deref() == Some(CITY_DEST_TYPE)
    }
}

/// Envelope of the flight location endpoint: `{"data": [...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightLocationsResponse {
    #[serde(default)]
    pub data: Vec<LocationHit>,
}

/// Envelope of the flight search endpoint: `{"data": {"flightOffers": [...]}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightSearchResponse {
    #[serde(default)]
    pub data: FlightSearchData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchData {
    #[serde(default)]
    pub flight_offers: Vec<FlightOffer>,
}

/// A single flight offer as the provider reports it. Opaque and untrusted:
/// every field is defaulted and consumers apply their own fallback policy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    #[serde(default)]
    pub unified_price_breakdown: Option<PriceBreakdown>,
    #[serde(default)]
    pub segments: Vec<FlightSegment>,
}

impl FlightOffer {
    /// Per-passenger price, or `None` when the breakdown is absent.
    pub fn unit_price(&self) -> Option<&PriceAmount> {
        self.unified_price_breakdown.as_ref().and_then(|b| b.price.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceBreakdown {
    #[serde(default)]
    pub price: Option<PriceAmount>,
}

/// Integer units plus nanos, the provider's split-decimal price encoding.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAmount {
    #[serde(default)]
    pub units: i64,
    #[serde(default)]
    pub nanos: i64,
    #[serde(default)]
    pub currency_code: Option<String>,
}

impl PriceAmount {
    pub fn as_f64(&self) -> f64 {
        self.units as f64 + self.nanos as f64 / 1e9
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSegment {
    #[serde(default)]
    pub legs: Vec<FlightLeg>,
    /// Total transit time of the segment, in seconds.
    #[serde(default)]
    pub total_time: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightLeg {
    #[serde(default)]
    pub departure_airport: Option<AirportRef>,
    #[serde(default)]
    pub arrival_airport: Option<AirportRef>,
    /// ISO-8601 local timestamp, e.g. `"2025-06-01T14:30:00"`.
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub carriers_data: Vec<CarrierData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportRef {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub city_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarrierData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

/// Envelope of the hotel search endpoint: `{"result": [...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotelSearchResponse {
    #[serde(default)]
    pub result: Vec<HotelOffer>,
}

/// A single hotel offer as the provider reports it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotelOffer {
    #[serde(default)]
    pub hotel_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub max_photo_url: Option<String>,
    #[serde(default)]
    pub review_score: Option<f64>,
    /// Room configuration label; arrives HTML-contaminated.
    #[serde(default)]
    pub unit_configuration_label: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub price_breakdown: Option<HotelPrice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotelPrice {
    /// The provider emits this as a number or a numeric string, sometimes
    /// not at all. `gross()` is the only sanctioned way to read it.
    #[serde(default)]
    pub gross_price: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl HotelPrice {
    /// Gross price for the whole stay, or `None` when absent/unparsable.
    pub fn gross(&self) -> Option<f64> {
        match self.gross_price.as_ref() {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// Envelope of the exchange-rate endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExchangeRatesResponse {
    #[serde(default)]
    pub exchange_rates: Vec<ExchangeRate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExchangeRate {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub exchange_rate: Option<Value>,
}

impl ExchangeRate {
    pub fn rate(&self) -> Option<f64> {
        match self.exchange_rate.as_ref() {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}
