use serde::{Deserialize, Serialize};

use crate::provider::FlightOffer;
use crate::round2;

/// Upper bound on normalized offers returned per direction.
pub const MAX_RESULTS: usize = 5;

/// Placeholder when the provider omits a city name.
pub const UNKNOWN_CITY: &str = "Unknown";
/// Placeholder when the provider omits carrier data.
pub const UNKNOWN_AIRLINE: &str = "Unknown airline";

/// Cabin class tiers the provider understands.
///
/// Selected from the client's budget-tier label; anything unrecognized
/// falls back to economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    First,
}

impl CabinClass {
    pub fn from_budget_label(label: &str) -> Self {
        match label {
            "Économique" => CabinClass::Economy,
            "Modéré" => CabinClass::PremiumEconomy,
            "Luxe" => CabinClass::First,
            _ => CabinClass::Economy,
        }
    }

    /// Value expected by the upstream search endpoint.
    pub fn as_upstream(&self) -> &'static str {
        match self {
            CabinClass::Economy => "ECONOMY",
            CabinClass::PremiumEconomy => "PREMIUM_ECONOMY",
            CabinClass::First => "FIRST",
        }
    }

    /// Lowercase form used in booking deep links.
    pub fn as_url_param(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::PremiumEconomy => "premium_economy",
            CabinClass::First => "first",
        }
    }
}

impl Default for CabinClass {
    fn default() -> Self {
        CabinClass::Economy
    }
}

/// Passenger and trip context a quote is normalized against.
#[derive(Debug, Clone)]
pub struct QuoteContext {
    pub adults: u32,
    pub children: u32,
    pub cabin: CabinClass,
    /// The opposite leg's date, embedded in the round-trip deep link.
    pub companion_date: Option<String>,
}

impl QuoteContext {
    pub fn total_passengers(&self) -> u32 {
        self.adults + self.children
    }
}

/// The stable client-facing flight shape. Derived, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NormalizedFlight {
    pub departure_city: String,
    pub arrival_city: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub price: f64,
    pub currency: String,
    pub airline: String,
    pub logo: String,
    pub booking_url: String,
}

/// Flatten one provider offer into the client shape.
///
/// An offer without segments yields the empty default record so a single
/// malformed entry never aborts the whole batch. Every other missing field
/// degrades to a sentinel, never an error.
pub fn normalize_flight(offer: &FlightOffer, ctx: &QuoteContext) -> NormalizedFlight {
    let Some(first_segment) = offer.segments.first() else {
        return NormalizedFlight::default();
    };
    let last_segment = offer.segments.last().unwrap_or(first_segment);

    let first_leg = first_segment.legs.first().cloned().unwrap_or_default();
    let last_leg = last_segment.legs.last().cloned().unwrap_or_default();

    let price = offer.unit_price();
    let unit_price = price.map(|p| p.as_f64()).unwrap_or(0.0);
    let total_price = round2(unit_price * ctx.total_passengers() as f64);
    let currency = price
        .and_then(|p| p.currency_code.clone())
        .unwrap_or_else(|| "EUR".to_string());

    let departure_city = first_leg
        .departure_airport
        .as_ref()
        .and_then(|a| a.city_name.clone())
        .unwrap_or_else(|| UNKNOWN_CITY.to_string());
    let arrival_city = last_leg
        .arrival_airport
        .as_ref()
        .and_then(|a| a.city_name.clone())
        .unwrap_or_else(|| UNKNOWN_CITY.to_string());

    let departure_time = first_leg.departure_time.clone().unwrap_or_default();
    let arrival_time = last_leg.arrival_time.clone().unwrap_or_default();

    let duration_secs: i64 = offer.segments.iter().map(|s| s.total_time).sum();

    let first_carrier = first_leg.carriers_data.first();
    let airline = first_carrier
        .and_then(|c| c.name.clone())
        .unwrap_or_else(|| UNKNOWN_AIRLINE.to_string());
    let logo = first_carrier.and_then(|c| c.logo.clone()).unwrap_or_default();

    let origin_code = first_leg
        .departure_airport
        .as_ref()
        .and_then(|a| a.code.clone())
        .unwrap_or_default()
        .to_lowercase();
    let dest_code = last_leg
        .arrival_airport
        .as_ref()
        .and_then(|a| a.code.clone())
        .unwrap_or_default()
        .to_lowercase();

    let booking_url = booking_deep_link(
        &origin_code,
        &dest_code,
        &departure_time,
        ctx.companion_date.as_deref(),
        ctx,
    );

    NormalizedFlight {
        departure_city,
        arrival_city,
        departure_time: hhmm(&departure_time),
        arrival_time: hhmm(&arrival_time),
        duration: format_duration(duration_secs),
        price: total_price,
        currency,
        airline,
        logo,
        booking_url,
    }
}

/// `"HH:MM"` slice of an ISO timestamp, empty when the input is too short.
fn hhmm(timestamp: &str) -> String {
    timestamp.get(11..16).unwrap_or("").to_string()
}

/// Seconds rendered as whole hours plus remainder minutes, e.g. `"7h45m"`.
pub fn format_duration(seconds: i64) -> String {
    format!("{}h{}m", seconds / 3600, (seconds % 3600) / 60)
}

/// `"2025-06-01"` (or the date prefix of a timestamp) compacted to `"250601"`.
fn compact_date(date: &str) -> String {
    let digits: String = date.chars().take(10).filter(|c| *c != '-').collect();
    digits.get(2..).unwrap_or("").to_string()
}

fn booking_deep_link(
    origin_code: &str,
    dest_code: &str,
    departure_time: &str,
    companion_date: Option<&str>,
    ctx: &QuoteContext,
) -> String {
    let dep = compact_date(departure_time);
    let ret = companion_date.map(compact_date).unwrap_or_default();
    format!(
        "https://www.skyscanner.fr/transport/flights/{}/{}/{}/{}/?adults={}&children={}&cabinclass={}",
        origin_code,
        dest_code,
        dep,
        ret,
        ctx.adults,
        ctx.children,
        ctx.cabin.as_url_param()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_offer() -> FlightOffer {
        serde_json::from_str(
            r#"{
                "unifiedPriceBreakdown": {
                    "price": {"units": 120, "nanos": 500000000, "currencyCode": "EUR"}
                },
                "segments": [
                    {
                        "totalTime": 9000,
                        "legs": [
                            {
                                "departureAirport": {"code": "CDG", "cityName": "Paris"},
                                "arrivalAirport": {"code": "FCO", "cityName": "Rome"},
                                "departureTime": "2025-06-01T08:15:00",
                                "arrivalTime": "2025-06-01T10:45:00",
                                "carriersData": [
                                    {"name": "Air France", "logo": "https://img.example/af.png"}
                                ]
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    fn ctx() -> QuoteContext {
        QuoteContext {
            adults: 2,
            children: 1,
            cabin: CabinClass::Economy,
            companion_date: Some("2025-06-08".to_string()),
        }
    }

    #[test]
    fn test_price_is_unit_price_times_passengers() {
        let flight = normalize_flight(&sample_offer(), &ctx());
        assert_eq!(flight.price, 361.5);
        assert_eq!(flight.currency, "EUR");
    }

    #[test]
    fn test_times_and_duration_formatting() {
        let flight = normalize_flight(&sample_offer(), &ctx());
        assert_eq!(flight.departure_time, "08:15");
        assert_eq!(flight.arrival_time, "10:45");
        assert_eq!(flight.duration, "2h30m");
    }

    #[test]
    fn test_booking_deep_link_shape() {
        let flight = normalize_flight(&sample_offer(), &ctx());
        assert_eq!(
            flight.booking_url,
            "https://www.skyscanner.fr/transport/flights/cdg/fco/250601/250608/?adults=2&children=1&cabinclass=economy"
        );
    }

    #[test]
    fn test_missing_segments_yield_empty_record() {
        let offer = FlightOffer::default();
        let flight = normalize_flight(&offer, &ctx());
        assert_eq!(flight, NormalizedFlight::default());
    }

    #[test]
    fn test_missing_carrier_uses_placeholders() {
        let mut offer = sample_offer();
        offer.segments[0].legs[0].carriers_data.clear();
        let flight = normalize_flight(&offer, &ctx());
        assert_eq!(flight.airline, UNKNOWN_AIRLINE);
        assert_eq!(flight.logo, "");
    }

    #[test]
    fn test_cabin_class_mapping_defaults_to_economy() {
        assert_eq!(CabinClass::from_budget_label("Économique"), CabinClass::Economy);
        assert_eq!(CabinClass::from_budget_label("Modéré"), CabinClass::PremiumEconomy);
        assert_eq!(CabinClass::from_budget_label("Luxe"), CabinClass::First);
        assert_eq!(CabinClass::from_budget_label("whatever"), CabinClass::Economy);
    }

    #[test]
    fn test_duration_over_a_day() {
        assert_eq!(format_duration(26 * 3600 + 5 * 60), "26h5m");
        assert_eq!(format_duration(0), "0h0m");
    }

    #[test]
    fn test_compact_date() {
        assert_eq!(compact_date("2025-06-01"), "250601");
        assert_eq!(compact_date("2025-06-01T08:15:00"), "250601");
        assert_eq!(compact_date(""), "");
    }
}
