use thiserror::Error;

#[derive(Error, Debug)]
#[error("error driving e-ink display: {0}")]
pub struct EinkError(pub String);
