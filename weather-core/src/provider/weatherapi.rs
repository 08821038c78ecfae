use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    error::FetchError,
    model::{Condition, CurrentConditions, Location, WeatherSnapshot},
};

use super::WeatherClient;

/// Client for WeatherAPI.com's `current.json` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(base_url, Client::new())
    }

    pub fn with_http(base_url: impl Into<String>, http: Client) -> Self {
        Self { base_url: base_url.into(), http }
    }

    pub fn current_url(&self) -> String {
        format!("{}/current.json", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    async fn fetch(&self, api_key: &str, city: &str) -> Result<WeatherSnapshot, FetchError> {
        let url = self.current_url();
        tracing::debug!(%url, city, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("key", api_key), ("q", city)])
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = res.status();
        let body = res.bytes().await.map_err(FetchError::Request)?;
        tracing::debug!(%status, bytes = body.len(), "weather API responded");

        decode_current(status, &body)
    }
}

/// Turn a raw `current.json` response into a snapshot.
fn decode_current(status: StatusCode, body: &[u8]) -> Result<WeatherSnapshot, FetchError> {
    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            body: truncate_body(&String::from_utf8_lossy(body)),
        });
    }

    let parsed: WaResponse = serde_json::from_slice(body).map_err(FetchError::from_decode)?;
    Ok(parsed.into())
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    humidity: u8,
    wind_kph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

impl From<WaResponse> for WeatherSnapshot {
    fn from(res: WaResponse) -> Self {
        WeatherSnapshot {
            location: Location {
                name: res.location.name,
                country: res.location.country,
                localtime: res.location.localtime,
            },
            current: CurrentConditions {
                temp_c: res.current.temp_c,
                humidity: res.current.humidity,
                wind_kph: res.current.wind_kph,
                condition: Condition {
                    text: res.current.condition.text,
                    icon: res.current.condition.icon,
                },
            },
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchErrorKind;
    use std::time::Duration;

    const LONDON: &str = r#"{
        "location": {
            "name": "London",
            "region": "City of London, Greater London",
            "country": "United Kingdom",
            "localtime_epoch": 1714551900,
            "localtime": "2024-05-01 9:25"
        },
        "current": {
            "temp_c": 14.0,
            "humidity": 72,
            "wind_kph": 15.1,
            "feelslike_c": 12.9,
            "condition": {
                "text": "Partly cloudy",
                "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png",
                "code": 1003
            }
        }
    }"#;

    #[test]
    fn success_body_becomes_snapshot() {
        let snapshot = decode_current(StatusCode::OK, LONDON.as_bytes()).expect("valid body");

        assert_eq!(snapshot.location.name, "London");
        assert_eq!(snapshot.location.country, "United Kingdom");
        assert_eq!(snapshot.location.localtime, "2024-05-01 9:25");
        assert_eq!(snapshot.current.temp_c, 14.0);
        assert_eq!(snapshot.current.humidity, 72);
        assert_eq!(snapshot.current.wind_kph, 15.1);
        assert_eq!(snapshot.current.condition.text, "Partly cloudy");
        assert_eq!(
            snapshot.icon_url(),
            "https://cdn.weatherapi.com/weather/128x128/day/116.png"
        );
    }

    #[test]
    fn non_success_status_is_network_error() {
        let body = r#"{"error":{"code":1006,"message":"No matching location found."}}"#;
        let err = decode_current(StatusCode::BAD_REQUEST, body.as_bytes()).unwrap_err();

        assert!(err.is_network());
        assert!(err.to_string().contains("No matching location found."));
    }

    #[test]
    fn missing_field_is_network_error() {
        let body = r#"{"location":{"name":"London","country":"UK"},"current":{}}"#;
        let err = decode_current(StatusCode::OK, body.as_bytes()).unwrap_err();

        assert!(err.is_network(), "{err}");
    }

    #[test]
    fn garbage_bytes_are_transport_error() {
        let err = decode_current(StatusCode::OK, b"\x00\xffnot json").unwrap_err();
        assert!(err.is_transport(), "{err}");

        let truncated = &LONDON.as_bytes()[..40];
        assert!(decode_current(StatusCode::OK, truncated).unwrap_err().is_transport());
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "é".repeat(500);
        let truncated = truncate_body(&body);

        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }

    /// Serve one canned HTTP response on a local port. The task yields the
    /// request line it received.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/v1", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::<u8>::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            let request = String::from_utf8_lossy(&request).into_owned();
            request.lines().next().unwrap_or_default().to_string()
        });

        (base_url, server)
    }

    #[tokio::test]
    async fn fetch_sends_key_and_city_as_query() {
        let (base_url, server) = serve_once("200 OK", LONDON).await;
        let client = WeatherApiClient::new(base_url);

        let snapshot = client.fetch("K&1", "São Paulo").await.expect("canned body is valid");

        assert_eq!(
            server.await.unwrap(),
            "GET /v1/current.json?key=K%261&q=S%C3%A3o+Paulo HTTP/1.1"
        );
        assert_eq!(snapshot.location.name, "London");
        assert_eq!(snapshot.current.condition.text, "Partly cloudy");
    }

    #[tokio::test]
    async fn fetch_maps_not_found_to_network_error() {
        let body = r#"{"error":{"code":1006,"message":"No matching location found."}}"#;
        let (base_url, server) = serve_once("404 Not Found", body).await;

        let err = WeatherApiClient::new(base_url).fetch("KEY", "Atlantis").await.unwrap_err();
        server.await.unwrap();

        assert_eq!(err.kind(), FetchErrorKind::Network, "{err}");
    }

    #[tokio::test]
    async fn fetch_maps_html_body_to_transport_error() {
        let (base_url, server) = serve_once("200 OK", "<html>maintenance</html>").await;

        let err = WeatherApiClient::new(base_url).fetch("KEY", "London").await.unwrap_err();
        server.await.unwrap();

        assert_eq!(err.kind(), FetchErrorKind::Transport, "{err}");
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let http = Client::builder().timeout(Duration::from_secs(5)).build().unwrap();
        let client = WeatherApiClient::with_http("http://127.0.0.1:1/v1", http);

        let err = client.fetch("KEY", "London").await.unwrap_err();
        assert!(err.is_transport(), "{err}");
    }
}
