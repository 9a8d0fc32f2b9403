use std::fmt;
use std::fmt::Formatter;
use crate::chart::ChartError;
use crate::fields::FieldsError;
use crate::manager_chromium::errors::CaptureError;
use crate::manager_eink::errors::EinkError;
use crate::manager_meteo::errors::MeteoError;
use crate::template::TemplateError;

#[derive(Debug)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigError: {}", self.0)
    }
}
impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError(e.to_string())
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError(e.to_string())
    }
}
impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError(e.to_string())
    }
}
impl From<&str> for ConfigError {
    fn from(e: &str) -> Self {
        ConfigError(e.to_string())
    }
}

pub struct InkStationInitError(pub String);

impl fmt::Display for InkStationInitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "InkStationInitError: {}", self.0)
    }
}
impl From<ConfigError> for InkStationInitError {
    fn from(e: ConfigError) -> Self {
        InkStationInitError(e.to_string())
    }
}

/// Error from a pipeline run, carrying the stage that failed so a run
/// can be diagnosed from the log alone
pub struct InkStationRunError {
    stage: &'static str,
    msg: String,
}

impl InkStationRunError {
    pub fn new(stage: &'static str, msg: String) -> InkStationRunError {
        InkStationRunError { stage, msg }
    }
}
impl fmt::Display for InkStationRunError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "InkStationRunError in {}: {}", self.stage, self.msg)
    }
}
impl From<MeteoError> for InkStationRunError {
    fn from(e: MeteoError) -> Self {
        InkStationRunError::new("weather fetch", e.to_string())
    }
}
impl From<ChartError> for InkStationRunError {
    fn from(e: ChartError) -> Self {
        InkStationRunError::new("chart rendering", e.to_string())
    }
}
impl From<FieldsError> for InkStationRunError {
    fn from(e: FieldsError) -> Self {
        InkStationRunError::new("field shaping", e.to_string())
    }
}
impl From<TemplateError> for InkStationRunError {
    fn from(e: TemplateError) -> Self {
        InkStationRunError::new("template rendering", e.to_string())
    }
}
impl From<CaptureError> for InkStationRunError {
    fn from(e: CaptureError) -> Self {
        InkStationRunError::new("screenshot capture", e.to_string())
    }
}
impl From<EinkError> for InkStationRunError {
    fn from(e: EinkError) -> Self {
        InkStationRunError::new("display push", e.to_string())
    }
}
