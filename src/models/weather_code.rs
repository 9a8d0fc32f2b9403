use std::collections::HashMap;
use std::fs;
use serde::Deserialize;
use crate::errors::ConfigError;

#[derive(Deserialize)]
pub struct CodeInfo {
    pub description: String,
    pub icon: String,
}

#[derive(Deserialize)]
pub struct CodeModes {
    pub day: CodeInfo,
    pub night: CodeInfo,
}

/// Static mapping from WMO weather code to display description and icon,
/// split by day/night mode. Loaded once at startup and never mutated.
#[derive(Deserialize)]
#[serde(transparent)]
pub struct WeatherCodeTable {
    codes: HashMap<String, CodeModes>,
}

impl WeatherCodeTable {
    /// Loads the weather code table from a json file
    ///
    /// # Arguments
    ///
    /// * 'path' - path to the weather code json file
    pub fn from_file(path: &str) -> Result<WeatherCodeTable, ConfigError> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("weather code table {}: {}", path, e)))?;
        let table: WeatherCodeTable = serde_json::from_str(&json)?;

        Ok(table)
    }

    /// Returns the description and icon for a weather code, or None if
    /// the code is not in the table
    ///
    /// # Arguments
    ///
    /// * 'code' - numeric weather code as reported by the forecast API
    /// * 'is_day' - true for the day entry, false for the night entry
    pub fn lookup(&self, code: i64, is_day: bool) -> Option<&CodeInfo> {
        let modes = self.codes.get(&code.to_string())?;
        if is_day {
            Some(&modes.day)
        } else {
            Some(&modes.night)
        }
    }
}
