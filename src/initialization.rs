use std::env;
use std::str::FromStr;
use chrono_tz::Tz;
use log::info;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use crate::config::{Config, General, load_config};
use crate::errors::InkStationInitError;
use crate::manager_chromium::Chromium;
use crate::manager_eink::{self, FrameSink};
use crate::manager_meteo::OpenMeteo;
use crate::models::weather_code::WeatherCodeTable;

/// The managers and static data used by the pipeline
pub struct Mgr {
    pub meteo: OpenMeteo,
    pub chromium: Chromium,
    pub eink: Box<dyn FrameSink>,
    pub code_table: WeatherCodeTable,
    pub tz: Tz,
}

/// Loads configuration, sets up logging and instantiates all managers
///
pub fn init() -> Result<(Config, Mgr), InkStationInitError> {
    let config_file = env::var("CONFIG_FILE").unwrap_or("./config.toml".to_string());
    let config = load_config(&config_file)?;

    setup_logger(&config.general)?;
    info!("inkstation version: {}", env!("CARGO_PKG_VERSION"));

    let tz = Tz::from_str(&config.geo_ref.timezone)
        .map_err(|e| InkStationInitError(format!(
            "timezone {}: {}", config.geo_ref.timezone, e)))?;

    let code_table = WeatherCodeTable::from_file(&config.files.wmo_code)?;

    let meteo = OpenMeteo::new(&config.geo_ref);
    let chromium = Chromium::new(&config.chromium);
    let eink = manager_eink::detect(&config.display);

    Ok((config, Mgr { meteo, chromium, eink, code_table, tz }))
}

/// Configures log4rs from the general configuration section
///
/// # Arguments
///
/// * 'general' - the general configuration section
fn setup_logger(general: &General) -> Result<(), InkStationInitError> {
    let pattern = "{d(%Y-%m-%d %H:%M:%S)} {l} {m}{n}";

    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build(&general.log_path)
        .map_err(|e| InkStationInitError(format!("log file {}: {}", general.log_path, e)))?;

    let mut builder = log4rs::Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)));
    let mut root = Root::builder().appender("logfile");

    if general.log_to_stdout {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(pattern)))
            .build();
        builder = builder.appender(Appender::builder().build("stdout", Box::new(stdout)));
        root = root.appender("stdout");
    }

    let log_config = builder.build(root.build(general.log_level))
        .map_err(|e| InkStationInitError(format!("log configuration: {}", e)))?;

    log4rs::init_config(log_config)
        .map_err(|e| InkStationInitError(format!("log init: {}", e)))?;

    Ok(())
}
