use thiserror::Error;

#[derive(Error, Debug)]
#[error("error capturing screenshot: {0}")]
pub struct CaptureError(pub String);

impl From<std::io::Error> for CaptureError {
    fn from(e: std::io::Error) -> CaptureError {
        CaptureError(format!("rasterizer process error: {}", e))
    }
}
