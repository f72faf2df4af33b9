//! Current weather from OpenWeatherMap

use async_trait::async_trait;
use serde::Deserialize;

use crate::{Error, Result};

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Conditions reported for a city
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Free-text conditions ("light rain")
    pub description: String,
    /// Relative humidity in percent
    pub humidity: u32,
    /// Wind speed in m/s
    pub wind_speed: f64,
}

/// Looks up current conditions
#[async_trait(?Send)]
pub trait WeatherService {
    /// Conditions for `city`, or `None` if the city is unknown
    async fn current(&self, city: &str) -> Result<Option<WeatherReport>>;
}

#[derive(Deserialize)]
struct ApiResponse {
    main: ApiMain,
    #[serde(default)]
    weather: Vec<ApiCondition>,
    wind: ApiWind,
}

#[derive(Deserialize)]
struct ApiMain {
    temp: f64,
    humidity: u32,
}

#[derive(Deserialize)]
struct ApiCondition {
    description: String,
}

#[derive(Deserialize)]
struct ApiWind {
    speed: f64,
}

/// OpenWeatherMap current-weather client (metric units)
pub struct OpenWeatherMap {
    client: reqwest::Client,
    api_key: String,
}

impl OpenWeatherMap {
    /// Create a client using a shared HTTP client
    #[must_use]
    pub const fn new(client: reqwest::Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait(?Send)]
impl WeatherService for OpenWeatherMap {
    async fn current(&self, city: &str) -> Result<Option<WeatherReport>> {
        let response = self
            .client
            .get(BASE_URL)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(city, "city not found");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::service("weather", format!("{status}: {body}")));
        }

        let data: ApiResponse = response.json().await?;
        Ok(Some(into_report(data)))
    }
}

fn into_report(data: ApiResponse) -> WeatherReport {
    WeatherReport {
        temperature: data.main.temp,
        description: data
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .unwrap_or_default(),
        humidity: data.main.humidity,
        wind_speed: data.wind.speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_response() {
        let json = r#"{
            "coord": {"lon": 77.2, "lat": 28.6},
            "weather": [{"id": 721, "main": "Haze", "description": "haze"}],
            "main": {"temp": 31.05, "feels_like": 33.0, "humidity": 58},
            "wind": {"speed": 3.6, "deg": 270},
            "name": "Delhi",
            "cod": 200
        }"#;
        let data: ApiResponse = serde_json::from_str(json).unwrap();
        let report = into_report(data);
        assert_eq!(report.description, "haze");
        assert_eq!(report.humidity, 58);
        assert!((report.temperature - 31.05).abs() < f64::EPSILON);
        assert!((report.wind_speed - 3.6).abs() < f64::EPSILON);
    }
}
