use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::currency::EurConverter;
use crate::provider::HotelOffer;
use crate::round2;

/// Upper bound on normalized offers returned per search.
pub const MAX_RESULTS: usize = 9;

/// Placeholder when the provider omits the hotel name.
pub const UNKNOWN_HOTEL: &str = "Unknown hotel";

/// The stable client-facing hotel shape. Derived, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NormalizedHotel {
    pub name: String,
    pub address: String,
    pub photo: String,
    pub rating: Option<f64>,
    pub room: String,
    pub booking_url: String,
    pub nights: i64,
    /// Price for the whole stay, in the target currency.
    pub total: f64,
    /// Price per night.
    pub price: f64,
    pub currency: String,
}

/// Number of nights between two ISO dates, never below 1.
///
/// Equal, reversed, or unparsable date pairs all count as a single night.
pub fn nights_between(checkin: &str, checkout: &str) -> i64 {
    let parsed = (
        NaiveDate::parse_from_str(checkin, "%Y-%m-%d"),
        NaiveDate::parse_from_str(checkout, "%Y-%m-%d"),
    );
    match parsed {
        (Ok(d1), Ok(d2)) => (d2 - d1).num_days().max(1),
        _ => 1,
    }
}

/// Strip HTML tags and `&nbsp;` entities from a room-configuration label.
pub fn clean_room_info(text: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));
    tag.replace_all(text, "").replace("&nbsp;", " ").trim().to_string()
}

/// Flatten one provider offer into the client shape.
///
/// `total_eur` is the already-converted price for the whole stay; a
/// missing price normalizes to 0 (budget filtering has already excluded
/// it whenever a ceiling was in play).
pub fn normalize_hotel(offer: &HotelOffer, nights: i64, total_eur: f64) -> NormalizedHotel {
    let total = round2(total_eur);
    let nights = nights.max(1);

    NormalizedHotel {
        name: offer.hotel_name.clone().unwrap_or_else(|| UNKNOWN_HOTEL.to_string()),
        address: offer.address.clone().unwrap_or_default(),
        photo: offer.max_photo_url.clone().unwrap_or_default(),
        rating: offer.review_score,
        room: clean_room_info(offer.unit_configuration_label.as_deref().unwrap_or("")),
        booking_url: offer.url.clone().unwrap_or_else(|| "#".to_string()),
        nights,
        total,
        price: round2(total / nights as f64),
        currency: crate::currency::TARGET_CURRENCY.to_string(),
    }
}

/// Convert, budget-filter, truncate, and normalize a batch of offers.
///
/// Offers stay in upstream order. With a ceiling set, any offer whose
/// EUR-equivalent total exceeds it is dropped, and an offer with an
/// unparsable price counts as infinitely expensive. The surviving list is
/// cut to [`MAX_RESULTS`].
pub async fn shortlist_hotels(
    offers: &[HotelOffer],
    budget_ceiling: Option<f64>,
    checkin: &str,
    checkout: &str,
    converter: &EurConverter<'_>,
) -> Vec<NormalizedHotel> {
    let nights = nights_between(checkin, checkout);
    let mut shortlisted = Vec::new();

    for offer in offers {
        let total_eur = match offer.price_breakdown.as_ref() {
            Some(pb) => match pb.gross() {
                Some(gross) => {
                    let currency = pb
                        .currency
                        .as_deref()
                        .unwrap_or(crate::currency::TARGET_CURRENCY);
                    Some(converter.to_eur(gross, currency).await)
                }
                None => None,
            },
            None => None,
        };

        if let Some(ceiling) = budget_ceiling {
            if total_eur.unwrap_or(f64::INFINITY) > ceiling {
                continue;
            }
        }

        shortlisted.push(normalize_hotel(offer, nights, total_eur.unwrap_or(0.0)));
        if shortlisted.len() == MAX_RESULTS {
            break;
        }
    }

    shortlisted
}
