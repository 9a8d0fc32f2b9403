use std::fs;
use log::LevelFilter;
use serde::Deserialize;
use crate::errors::ConfigError;

#[derive(Deserialize)]
pub struct GeoRef {
    pub lat: f64,
    pub long: f64,
    pub timezone: String,
}

#[derive(Deserialize)]
pub struct Files {
    pub wmo_code: String,
    pub template: String,
    pub output_html: String,
    pub chart: String,
    pub screenshot: String,
}

#[derive(Deserialize)]
pub struct ChromiumConfig {
    pub binary: String,
    pub window_width: u32,
    pub window_height: u32,
    pub timeout_secs: u64,
}

#[derive(Deserialize)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    #[cfg(feature = "eink")]
    pub spi_bus: u8,
    #[cfg(feature = "eink")]
    pub dc_pin: u8,
    #[cfg(feature = "eink")]
    pub reset_pin: u8,
    #[cfg(feature = "eink")]
    pub busy_pin: u8,
}

#[derive(Deserialize)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

#[derive(Deserialize)]
pub struct Config {
    pub geo_ref: GeoRef,
    pub files: Files,
    pub chromium: ChromiumConfig,
    pub display: DisplayConfig,
    pub general: General,
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {

    let toml = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&toml)?;

    Ok(config)
}
