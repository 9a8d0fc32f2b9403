use serde::Deserialize;

/// Raw Open-Meteo response. Sections are optional here so that an
/// unexpected response shape surfaces as a distinct error instead of a
/// json document error.
#[derive(Deserialize)]
pub struct FullForecast {
    pub current: Option<Current>,
    pub hourly: Option<Hourly>,
    pub daily: Option<Daily>,
}

#[derive(Deserialize, Clone)]
pub struct Current {
    pub temperature_2m: f64,
    pub relative_humidity_2m: i64,
    pub apparent_temperature: f64,
    pub is_day: i64,
    pub wind_speed_10m: f64,
    pub weather_code: i64,
}

#[derive(Deserialize, Clone)]
pub struct Hourly {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
}

#[derive(Deserialize, Clone)]
pub struct Daily {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub precipitation_probability_max: Vec<i64>,
    pub weather_code: Vec<i64>,
}

/// Validated forecast with all sections present and hourly arrays
/// known to be parallel
pub struct Forecast {
    pub current: Current,
    pub hourly: Hourly,
    pub daily: Daily,
}
