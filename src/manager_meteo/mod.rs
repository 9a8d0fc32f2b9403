pub mod errors;

use std::time::Duration;
use ureq::Agent;
use crate::config::GeoRef;
use crate::manager_meteo::errors::MeteoError;
use crate::models::forecast::{Forecast, FullForecast};

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: [&str; 6] = [
    "temperature_2m",
    "relative_humidity_2m",
    "apparent_temperature",
    "is_day",
    "wind_speed_10m",
    "weather_code",
];
const HOURLY_FIELDS: [&str; 1] = ["temperature_2m"];
const DAILY_FIELDS: [&str; 4] = [
    "temperature_2m_max",
    "temperature_2m_min",
    "precipitation_probability_max",
    "weather_code",
];

/// Struct for fetching weather forecasts from Open-Meteo
pub struct OpenMeteo {
    agent: Agent,
    lat: f64,
    long: f64,
    timezone: String,
}

impl OpenMeteo {
    /// Returns an OpenMeteo struct ready for fetching forecasts for the
    /// configured point
    ///
    /// # Arguments
    ///
    /// * 'geo_ref' - geographic reference from the configuration
    pub fn new(geo_ref: &GeoRef) -> OpenMeteo {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(10)))
            .build();

        let agent = config.into();

        Self {
            agent,
            lat: geo_ref.lat,
            long: geo_ref.long,
            timezone: geo_ref.timezone.clone(),
        }
    }

    /// Retrieves the current/hourly/daily forecast in one request.
    ///
    /// A single attempt is made per invocation, the scheduler invoking
    /// the program is responsible for retry cadence. Transport and HTTP
    /// status failures map to MeteoError::Http, a body that parses but
    /// is missing a required section maps to MeteoError::Shape.
    pub fn fetch_forecast(&self) -> Result<Forecast, MeteoError> {
        let url = self.request_url();

        let json = self.agent
            .get(&url)
            .call()?
            .body_mut()
            .read_to_string()?;

        let full: FullForecast = serde_json::from_str(&json)?;

        validate(full)
    }

    /// Builds the forecast request URL with comma-joined field lists
    fn request_url(&self) -> String {
        format!(
            "{}?latitude={}&longitude={}&timezone={}&models=best_match&current={}&hourly={}&daily={}",
            FORECAST_URL,
            self.lat,
            self.long,
            self.timezone,
            CURRENT_FIELDS.join(","),
            HOURLY_FIELDS.join(","),
            DAILY_FIELDS.join(","),
        )
    }
}

/// Checks that all required sections are present and that the hourly and
/// daily arrays are parallel, then returns the validated forecast
///
/// # Arguments
///
/// * 'full' - the raw deserialized response
fn validate(full: FullForecast) -> Result<Forecast, MeteoError> {
    let current = full.current
        .ok_or(MeteoError::Shape("missing 'current' section in response".to_string()))?;
    let hourly = full.hourly
        .ok_or(MeteoError::Shape("missing 'hourly' section in response".to_string()))?;
    let daily = full.daily
        .ok_or(MeteoError::Shape("missing 'daily' section in response".to_string()))?;

    if hourly.temperature_2m.len() != hourly.time.len() {
        return Err(MeteoError::Shape(format!(
            "hourly temperature_2m length {} does not match time length {}",
            hourly.temperature_2m.len(), hourly.time.len())));
    }

    let days = daily.time.len();
    let daily_lengths = [
        ("temperature_2m_max", daily.temperature_2m_max.len()),
        ("temperature_2m_min", daily.temperature_2m_min.len()),
        ("precipitation_probability_max", daily.precipitation_probability_max.len()),
        ("weather_code", daily.weather_code.len()),
    ];
    for (name, len) in daily_lengths {
        if len != days {
            return Err(MeteoError::Shape(format!(
                "daily {} length {} does not match time length {}", name, len, days)));
        }
    }

    Ok(Forecast { current, hourly, daily })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_forecast(json: &str) -> FullForecast {
        serde_json::from_str(json).unwrap()
    }

    fn valid_json() -> String {
        r#"{
            "current": {
                "time": "2026-02-01T10:10",
                "temperature_2m": -3.4,
                "relative_humidity_2m": 81,
                "apparent_temperature": -7.1,
                "is_day": 1,
                "wind_speed_10m": 14.2,
                "weather_code": 71
            },
            "hourly": {
                "time": ["2026-02-01T10:00", "2026-02-01T11:00"],
                "temperature_2m": [-3.4, -2.9]
            },
            "daily": {
                "time": ["2026-02-01"],
                "temperature_2m_max": [-1.0],
                "temperature_2m_min": [-9.3],
                "precipitation_probability_max": [40],
                "weather_code": [71]
            }
        }"#.to_string()
    }

    #[test]
    fn accepts_complete_response() {
        let forecast = validate(full_forecast(&valid_json())).unwrap();

        assert_eq!(forecast.current.weather_code, 71);
        assert_eq!(forecast.hourly.time.len(), 2);
        assert_eq!(forecast.daily.precipitation_probability_max[0], 40);
    }

    #[test]
    fn missing_current_is_a_shape_error() {
        let json = valid_json().replace("\"current\"", "\"not_current\"");

        match validate(full_forecast(&json)) {
            Err(MeteoError::Shape(msg)) => assert!(msg.contains("current")),
            _ => panic!("expected shape error"),
        }
    }

    #[test]
    fn missing_hourly_is_a_shape_error() {
        let json = valid_json().replace("\"hourly\"", "\"not_hourly\"");

        match validate(full_forecast(&json)) {
            Err(MeteoError::Shape(msg)) => assert!(msg.contains("hourly")),
            _ => panic!("expected shape error"),
        }
    }

    #[test]
    fn unparallel_hourly_arrays_are_a_shape_error() {
        let json = valid_json().replace("[-3.4, -2.9]", "[-3.4]");

        match validate(full_forecast(&json)) {
            Err(MeteoError::Shape(msg)) => assert!(msg.contains("temperature_2m")),
            _ => panic!("expected shape error"),
        }
    }

    #[test]
    fn request_url_names_all_field_lists() {
        let meteo = OpenMeteo::new(&crate::config::GeoRef {
            lat: 51.0501,
            long: -114.0853,
            timezone: "America/Denver".to_string(),
        });

        let url = meteo.request_url();

        assert!(url.starts_with(FORECAST_URL));
        assert!(url.contains("latitude=51.0501"));
        assert!(url.contains("longitude=-114.0853"));
        assert!(url.contains("timezone=America/Denver"));
        assert!(url.contains("&hourly=temperature_2m&"));
        assert!(url.contains("daily=temperature_2m_max,temperature_2m_min,precipitation_probability_max,weather_code"));
    }
}
