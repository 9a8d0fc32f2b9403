use std::collections::BTreeMap;
use std::fmt;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use crate::models::forecast::{Daily, Forecast};
use crate::models::weather_code::{CodeInfo, WeatherCodeTable};

/// Flat mapping from template placeholder name to rendered value,
/// produced fresh per run
pub type DisplayFields = BTreeMap<String, String>;

/// Number of days in the multi-day outlook, tomorrow through six days out
const OUTLOOK_DAYS: usize = 6;

#[derive(Debug)]
pub enum FieldsError {
    Lookup(String),
    Data(String),
}

impl fmt::Display for FieldsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldsError::Lookup(e) => write!(f, "FieldsError::Lookup: {}", e),
            FieldsError::Data(e) => write!(f, "FieldsError::Data: {}", e),
        }
    }
}
impl From<chrono::ParseError> for FieldsError {
    fn from(e: chrono::ParseError) -> Self {
        FieldsError::Data(format!("daily timestamp error: {}", e))
    }
}

/// Derives the full set of display fields from a validated forecast.
///
/// Pure function of its arguments: identical input produces identical
/// output. Temperatures are rounded to the nearest integer with ties
/// away from zero.
///
/// # Arguments
///
/// * 'forecast' - the validated forecast
/// * 'table' - the weather code lookup table
/// * 'now' - current time in the configured timezone
pub fn build_display_fields(forecast: &Forecast, table: &WeatherCodeTable, now: DateTime<Tz>)
                            -> Result<DisplayFields, FieldsError> {

    let current = &forecast.current;
    let daily = &forecast.daily;

    if daily.time.len() < OUTLOOK_DAYS + 1 {
        return Err(FieldsError::Data(format!(
            "daily series has {} entries, the outlook needs {}",
            daily.time.len(), OUTLOOK_DAYS + 1)));
    }

    let is_day = current.is_day == 1;
    let info = lookup_code(table, current.weather_code, is_day)?;

    let mut fields = DisplayFields::new();
    fields.insert("TEMP".to_string(), round(current.temperature_2m).to_string());
    fields.insert("FEELS".to_string(), round(current.apparent_temperature).to_string());
    fields.insert("HUMIDITY".to_string(), current.relative_humidity_2m.to_string());
    fields.insert("WIND".to_string(), current.wind_speed_10m.to_string());
    fields.insert("DESC".to_string(), info.description.clone());
    fields.insert("CURRENT_ICON".to_string(), info.icon.clone());
    fields.insert("PRECIP%".to_string(), daily.precipitation_probability_max[0].to_string());
    fields.insert("TIME".to_string(), format!(
        "Last updated: {}", now.format("%-I:%M %p").to_string().to_lowercase()));
    fields.insert("DAY".to_string(), now.format("%A %B %d").to_string());
    fields.insert("HIGH".to_string(), round(daily.temperature_2m_max[0]).to_string());
    fields.insert("LOW".to_string(), round(daily.temperature_2m_min[0]).to_string());
    fields.insert("FORECAST_CARDS".to_string(), forecast_cards(daily, table)?);

    Ok(fields)
}

/// Renders the six outlook cards, day offsets 1 through 6 in order,
/// concatenated into one HTML block
///
/// # Arguments
///
/// * 'daily' - the daily forecast series
/// * 'table' - the weather code lookup table
fn forecast_cards(daily: &Daily, table: &WeatherCodeTable) -> Result<String, FieldsError> {
    let mut cards = String::new();

    for day in 1..=OUTLOOK_DAYS {
        let date = NaiveDate::parse_from_str(&daily.time[day], "%Y-%m-%d")?;
        let info = lookup_code(table, daily.weather_code[day], true)?;

        cards.push_str(&format!(
            concat!(
                "<div class=\"card\">",
                "<div class=\"card-day\">{}</div>",
                "<img class=\"card-icon\" src=\"../static/icons/{}\" alt=\"\">",
                "<div class=\"card-temps\">{}&deg; <span class=\"card-low\">{}&deg;</span></div>",
                "</div>"),
            date.format("%a"),
            info.icon,
            round(daily.temperature_2m_max[day]),
            round(daily.temperature_2m_min[day])));
    }

    Ok(cards)
}

/// Looks up a weather code, turning an absent code into a fatal error
/// naming the code and mode
///
/// # Arguments
///
/// * 'table' - the weather code lookup table
/// * 'code' - numeric weather code
/// * 'is_day' - day/night mode
fn lookup_code(table: &WeatherCodeTable, code: i64, is_day: bool)
               -> Result<&CodeInfo, FieldsError> {
    let mode = if is_day { "day" } else { "night" };
    table.lookup(code, is_day).ok_or_else(|| FieldsError::Lookup(format!(
        "weather code {} ({} mode) not in table", code, mode)))
}

/// Rounds to the nearest integer, ties away from zero
fn round(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Denver;
    use crate::models::forecast::{Current, Forecast, Hourly};

    fn table() -> WeatherCodeTable {
        let json = r#"{
            "0": {
                "day": { "description": "Sunny", "icon": "clear_day.svg" },
                "night": { "description": "Clear", "icon": "clear_night.svg" }
            },
            "3": {
                "day": { "description": "Overcast", "icon": "cloudy.svg" },
                "night": { "description": "Overcast", "icon": "cloud_night.png" }
            }
        }"#;
        serde_json::from_str(json).unwrap()
    }

    fn forecast() -> Forecast {
        Forecast {
            current: Current {
                temperature_2m: 15.6,
                relative_humidity_2m: 47,
                apparent_temperature: 14.4,
                is_day: 1,
                wind_speed_10m: 11.2,
                weather_code: 0,
            },
            hourly: Hourly { time: Vec::new(), temperature_2m: Vec::new() },
            daily: Daily {
                time: (7..=13).map(|d| format!("2026-08-{:02}", d)).collect(),
                temperature_2m_max: vec![25.5, 26.0, 24.1, 22.9, 21.0, 20.4, 19.8],
                temperature_2m_min: vec![12.1, 13.5, 11.9, 10.2, 9.8, 9.1, 8.6],
                precipitation_probability_max: vec![35, 20, 10, 5, 0, 15, 40],
                weather_code: vec![0, 3, 0, 0, 3, 0, 0],
            },
        }
    }

    fn now() -> chrono::DateTime<Tz> {
        // Friday August 07 2026, 3:05 pm
        Denver.with_ymd_and_hms(2026, 8, 7, 15, 5, 0).unwrap()
    }

    #[test]
    fn produces_exactly_the_documented_key_set() {
        let fields = build_display_fields(&forecast(), &table(), now()).unwrap();

        let keys: Vec<&str> = fields.keys().map(|k| k.as_str()).collect();
        let mut expected = vec![
            "TEMP", "FEELS", "HUMIDITY", "WIND", "DESC", "CURRENT_ICON",
            "PRECIP%", "TIME", "DAY", "HIGH", "LOW", "FORECAST_CARDS",
        ];
        expected.sort();
        assert_eq!(keys, expected);
    }

    #[test]
    fn temperatures_are_integers() {
        let fields = build_display_fields(&forecast(), &table(), now()).unwrap();

        assert_eq!(fields["TEMP"], "16");
        assert_eq!(fields["FEELS"], "14");
        assert_eq!(fields["HIGH"], "26");
        assert_eq!(fields["LOW"], "12");
    }

    #[test]
    fn rounding_is_ties_away_from_zero() {
        let mut fc = forecast();
        fc.current.temperature_2m = 15.5;
        fc.current.apparent_temperature = 16.5;
        fc.daily.temperature_2m_min[0] = -15.5;

        let fields = build_display_fields(&fc, &table(), now()).unwrap();

        assert_eq!(fields["TEMP"], "16");
        assert_eq!(fields["FEELS"], "17");
        assert_eq!(fields["LOW"], "-16");
    }

    #[test]
    fn formats_time_and_day_labels() {
        let fields = build_display_fields(&forecast(), &table(), now()).unwrap();

        assert_eq!(fields["TIME"], "Last updated: 3:05 pm");
        assert_eq!(fields["DAY"], "Friday August 07");
    }

    #[test]
    fn night_mode_uses_the_night_table_entry() {
        let mut fc = forecast();
        fc.current.is_day = 0;
        fc.current.weather_code = 3;

        let fields = build_display_fields(&fc, &table(), now()).unwrap();

        assert_eq!(fields["DESC"], "Overcast");
        assert_eq!(fields["CURRENT_ICON"], "cloud_night.png");
    }

    #[test]
    fn outlook_has_six_cards_in_offset_order() {
        let fields = build_display_fields(&forecast(), &table(), now()).unwrap();
        let cards = &fields["FORECAST_CARDS"];

        assert_eq!(cards.matches("<div class=\"card\">").count(), 6);

        // Aug 7 2026 is a Friday, offsets 1..=6 run Sat through Thu
        let days = ["Sat", "Sun", "Mon", "Tue", "Wed", "Thu"];
        let positions: Vec<usize> = days.iter()
            .map(|d| cards.find(&format!(">{}<", d)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn missing_weather_code_is_a_lookup_error() {
        let mut fc = forecast();
        fc.current.weather_code = 42;

        match build_display_fields(&fc, &table(), now()) {
            Err(FieldsError::Lookup(msg)) => assert!(msg.contains("42")),
            _ => panic!("expected lookup error"),
        }
    }

    #[test]
    fn short_daily_series_is_a_data_error() {
        let mut fc = forecast();
        fc.daily.time.truncate(6);

        match build_display_fields(&fc, &table(), now()) {
            Err(FieldsError::Data(msg)) => assert!(msg.contains("6")),
            _ => panic!("expected data error"),
        }
    }

    #[test]
    fn identical_input_produces_identical_output() {
        let first = build_display_fields(&forecast(), &table(), now()).unwrap();
        let second = build_display_fields(&forecast(), &table(), now()).unwrap();

        assert_eq!(first, second);
    }
}
