//! Provider clients against mock HTTP servers.

use daycast_core::{
    FetchError, ForecastClient, LocationResolver, ResolutionError,
    provider::{openmeteo::OpenMeteoClient, weatherapi::WeatherApiClient},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn weatherapi_forecast(days: usize) -> serde_json::Value {
    let forecastday: Vec<_> = (0..days)
        .map(|i| {
            serde_json::json!({
                "date": format!("2024-01-{:02}", 15 + i),
                "date_epoch": 1705276800 + i * 86400,
                "day": {
                    "maxtemp_c": 9.1,
                    "mintemp_c": 3.2,
                    "avgtemp_c": 6.4 + i as f64,
                    "maxwind_kph": 22.7,
                    "avghumidity": 83.0,
                    "condition": { "text": "Patchy rain possible", "code": 1063 }
                },
                "astro": { "sunrise": "07:58 AM", "sunset": "04:22 PM" },
                "hour": []
            })
        })
        .collect();

    serde_json::json!({
        "location": { "name": "London", "region": "City of London, Greater London", "country": "United Kingdom" },
        "current": { "temp_c": 7.0 },
        "forecast": { "forecastday": forecastday }
    })
}

mod weatherapi {
    use super::*;

    #[tokio::test]
    async fn forecast_maps_days_without_conversion() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .and(query_param("key", "KEY"))
            .and(query_param("q", "London"))
            .and(query_param("days", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(weatherapi_forecast(7)))
            .expect(1)
            .mount(&server)
            .await;

        let client = WeatherApiClient::with_base_url("KEY".into(), server.uri());
        let payload = client.get_forecast("London", 7).await.expect("forecast");

        assert_eq!(payload.location.name, "London");
        assert_eq!(payload.location.country, "United Kingdom");
        assert_eq!(payload.days.len(), 7);
        assert_eq!(payload.days[0].avg_temp_c, 6.4);
        assert_eq!(payload.days[0].max_wind_kph, 22.7);
        assert_eq!(payload.days[0].avg_humidity_pct, 83.0);
        assert_eq!(payload.days[0].condition, "Patchy rain possible");
        assert_eq!(payload.days[0].sunrise, "07:58 AM");
        assert!(payload.days.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[tokio::test]
    async fn unknown_city_is_reported_as_such() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "code": 1006, "message": "No matching location found." }
            })))
            .mount(&server)
            .await;

        let client = WeatherApiClient::with_base_url("KEY".into(), server.uri());
        let err = client.get_forecast("Atlantis", 7).await.unwrap_err();

        assert!(matches!(err, FetchError::UnknownCity(city) if city == "Atlantis"));
    }

    #[tokio::test]
    async fn bad_key_is_a_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": { "code": 2006, "message": "API key is invalid." }
            })))
            .mount(&server)
            .await;

        let client = WeatherApiClient::with_base_url("BAD".into(), server.uri());
        let err = client.get_forecast("London", 7).await.unwrap_err();

        assert!(matches!(err, FetchError::Service { status: 401, .. }));
    }

    #[tokio::test]
    async fn search_returns_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("q", "Lon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "id": 2801268, "name": "London", "region": "City of London, Greater London",
                  "country": "United Kingdom", "lat": 51.52, "lon": -0.11, "url": "london-city-of-london-greater-london-united-kingdom" },
                { "id": 315398, "name": "London", "region": "Ontario",
                  "country": "Canada", "lat": 42.98, "lon": -81.25, "url": "london-ontario-canada" }
            ])))
            .mount(&server)
            .await;

        let client = WeatherApiClient::with_base_url("KEY".into(), server.uri());
        let hits = client.resolve("Lon").await.expect("search");

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "2801268");
        assert_eq!(hits[1].country, "Canada");
    }

    #[tokio::test]
    async fn search_server_error_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = WeatherApiClient::with_base_url("KEY".into(), server.uri());
        let err = client.resolve("Lon").await.unwrap_err();

        assert!(matches!(err, ResolutionError::Service { status: 503, ref body } if body == "maintenance"));
    }
}

mod openmeteo {
    use super::*;

    fn geocoding_hit() -> serde_json::Value {
        serde_json::json!({
            "results": [{
                "id": 2643743, "name": "London", "latitude": 51.50853, "longitude": -0.12574,
                "country": "United Kingdom", "timezone": "Europe/London"
            }]
        })
    }

    #[tokio::test]
    async fn search_with_no_results_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("name", "Xyzzy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "generationtime_ms": 0.5
            })))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_base_urls(server.uri(), server.uri());
        assert!(client.resolve("Xyzzy").await.expect("search").is_empty());
    }

    #[tokio::test]
    async fn forecast_geocodes_then_fetches_daily() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("name", "London"))
            .respond_with(ResponseTemplate::new(200).set_body_json(geocoding_hit()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("forecast_days", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "latitude": 51.5,
                "longitude": -0.12,
                "daily": {
                    "time": ["2024-01-15", "2024-01-16"],
                    "weather_code": [3, 61],
                    "temperature_2m_mean": [6.2, 7.9],
                    "wind_speed_10m_max": [19.4, 31.0],
                    "relative_humidity_2m_mean": [84, 90],
                    "sunrise": ["2024-01-15T07:58", "2024-01-16T07:57"]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_base_urls(server.uri(), server.uri());
        let payload = client.get_forecast("London", 2).await.expect("forecast");

        assert_eq!(payload.location.name, "London");
        assert_eq!(payload.days.len(), 2);
        assert_eq!(payload.days[0].condition, "Overcast");
        assert_eq!(payload.days[1].max_wind_kph, 31.0);
        assert_eq!(payload.days[1].avg_humidity_pct, 90.0);
        assert_eq!(payload.days[1].sunrise, "07:57 AM");
    }

    #[tokio::test]
    async fn forecast_for_unmatched_name_is_unknown_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_base_urls(server.uri(), server.uri());
        let err = client.get_forecast("Nowhere", 7).await.unwrap_err();

        assert!(matches!(err, FetchError::UnknownCity(_)));
    }
}
