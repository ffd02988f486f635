use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voya_api::{favorites_app, flights_app, hotels_app, FavoritesState, FlightsState, HotelsState};
use voya_core::currency::RateCache;
use voya_store::InMemoryFavoriteRepository;
use voya_supplier::{BookingClient, ProviderConfig};

fn supplier_for(server: &MockServer) -> Arc<BookingClient> {
    Arc::new(
        BookingClient::new(ProviderConfig {
            api_key: "test-key".to_string(),
            flights_base_url: server.uri(),
            flights_host: "flights.test".to_string(),
            hotels_base_url: server.uri(),
            hotels_host: "hotels.test".to_string(),
            timeout_seconds: 5,
        })
        .unwrap(),
    )
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn flight_offer(units: i64, nanos: i64) -> Value {
    json!({
        "unifiedPriceBreakdown": {
            "price": {"units": units, "nanos": nanos, "currencyCode": "EUR"}
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
                        "carriersData": [{"name": "Air France", "logo": ""}]
                    }
                ]
            }
        ]
    })
}

#[tokio::test]
async fn test_favorites_create_then_list() {
    let state = FavoritesState {
        favorites: Arc::new(InMemoryFavoriteRepository::new()),
    };
    let app = favorites_app(state, &[]);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/favorites",
            json!({
                "user_id": "u1",
                "destination": "Paris",
                "start_date": "2025-06-01",
                "end_date": "2025-06-05",
                "itinerary": {"days": 3}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get("/api/favorites/u1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let records = body_json(response).await;
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["destination"], "Paris");
    assert_eq!(records[0]["start_date"], "2025-06-01");
    assert_eq!(records[0]["itinerary"]["days"], 3);
    assert!(records[0]["created_at"].is_string());
    assert!(records[0].get("user_id").is_none());
}

#[tokio::test]
async fn test_favorites_missing_user_id_is_a_500() {
    let state = FavoritesState {
        favorites: Arc::new(InMemoryFavoriteRepository::new()),
    };
    let app = favorites_app(state, &[]);

    let response = app
        .oneshot(post_json(
            "/api/favorites",
            json!({"destination": "Paris", "itinerary": {"days": 3}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_flights_unresolved_city_is_a_400_before_any_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/flights/searchDestination"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;
    // The search endpoint must never be reached.
    Mock::given(method("GET"))
        .and(path("/api/v1/flights/searchFlights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(0)
        .mount(&server)
        .await;

    let app = flights_app(FlightsState { supplier: supplier_for(&server) }, &[]);

    let response = app
        .oneshot(post_json(
            "/api/flights",
            json!({"from": "Nowhere", "to": "Rome", "depart_date": "2025-06-01"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_flights_caps_results_and_multiplies_price_by_passengers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/flights/searchDestination"))
        .and(query_param("query", "Paris"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "CDG.AIRPORT"}]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/flights/searchDestination"))
        .and(query_param("query", "Rome"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": "FCO.AIRPORT"}]})),
        )
        .mount(&server)
        .await;

    let offers: Vec<Value> = (0..7).map(|_| flight_offer(100, 500_000_000)).collect();
    Mock::given(method("GET"))
        .and(path("/api/v1/flights/searchFlights"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"flightOffers": offers}})),
        )
        .mount(&server)
        .await;

    let app = flights_app(FlightsState { supplier: supplier_for(&server) }, &[]);

    let response = app
        .oneshot(post_json(
            "/api/flights",
            json!({
                "from": "Paris",
                "to": "Rome",
                "depart_date": "2025-06-01",
                "return_date": "2025-06-08",
                "adults": 2,
                "children": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let outbound = body["outbound"].as_array().unwrap();
    let returning = body["return"].as_array().unwrap();
    assert_eq!(outbound.len(), 5);
    assert_eq!(returning.len(), 5);
    // 100.5 per passenger, three passengers.
    assert_eq!(outbound[0]["price"], 301.5);
    assert_eq!(outbound[0]["departure_time"], "08:15");
    assert_eq!(outbound[0]["duration"], "2h30m");
}

#[tokio::test]
async fn test_hotels_missing_fields_is_a_400() {
    let server = MockServer::start().await;
    let app = hotels_app(
        HotelsState { supplier: supplier_for(&server), rates: Arc::new(RateCache::new()) },
        &[],
    );

    let response = app
        .oneshot(post_json("/api/hotels", json!({"destination": "Rome"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_hotels_budget_ceiling_filters_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/hotels/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"dest_id": "-126693", "dest_type": "city"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/hotels/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                {"hotel_name": "Cheap", "price_breakdown": {"gross_price": 200.0, "currency": "EUR"}},
                {"hotel_name": "Pricey", "price_breakdown": {"gross_price": 900.0, "currency": "EUR"}},
                {"hotel_name": "Broken", "price_breakdown": {"gross_price": "n/a", "currency": "EUR"}}
            ]
        })))
        .mount(&server)
        .await;

    let app = hotels_app(
        HotelsState { supplier: supplier_for(&server), rates: Arc::new(RateCache::new()) },
        &[],
    );

    let response = app
        .oneshot(post_json(
            "/api/hotels",
            json!({
                "destination": "Rome",
                "startDate": "2025-06-01",
                "endDate": "2025-06-05",
                "useCustomBudget": true,
                "budgetHotels": 500
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let hotels = body["hotels"].as_array().unwrap();
    assert_eq!(hotels.len(), 1);
    assert_eq!(hotels[0]["name"], "Cheap");
    assert_eq!(hotels[0]["nights"], 4);
    assert_eq!(hotels[0]["price"], 50.0);
}

#[tokio::test]
async fn test_hotels_no_matches_reports_a_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/hotels/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"dest_id": "-126693", "dest_type": "city"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/hotels/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
        .mount(&server)
        .await;

    let app = hotels_app(
        HotelsState { supplier: supplier_for(&server), rates: Arc::new(RateCache::new()) },
        &[],
    );

    let response = app
        .oneshot(post_json(
            "/api/hotels",
            json!({"destination": "Rome", "startDate": "2025-06-01", "endDate": "2025-06-05"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["hotels"].as_array().unwrap().len(), 0);
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_hotels_unresolvable_destination_is_a_400() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/hotels/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let app = hotels_app(
        HotelsState { supplier: supplier_for(&server), rates: Arc::new(RateCache::new()) },
        &[],
    );

    let response = app
        .oneshot(post_json(
            "/api/hotels",
            json!({"destination": "Atlantis", "startDate": "2025-06-01", "endDate": "2025-06-05"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
