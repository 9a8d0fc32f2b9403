use std::fmt;

#[derive(Debug)]
pub enum MeteoError {
    Http(String),
    Shape(String),
}

impl fmt::Display for MeteoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MeteoError::Http(e) => write!(f, "MeteoError::Http: {}", e),
            MeteoError::Shape(e) => write!(f, "MeteoError::Shape: {}", e),
        }
    }
}
impl From<ureq::Error> for MeteoError {
    fn from(e: ureq::Error) -> Self {
        MeteoError::Http(e.to_string())
    }
}
impl From<serde_json::Error> for MeteoError {
    fn from(e: serde_json::Error) -> Self {
        MeteoError::Shape(format!("json document error: {}", e))
    }
}
