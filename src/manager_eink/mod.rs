pub mod errors;
#[cfg(feature = "eink")]
mod sink_ssd1677;

use image::RgbImage;
use image::imageops::FilterType;
use log::{debug, info};
use crate::config::DisplayConfig;
use crate::manager_eink::errors::EinkError;

/// A display sink the final frame is pushed to. Exactly one
/// implementation is selected at startup by detect().
pub trait FrameSink {
    fn name(&self) -> &'static str;

    /// Native resolution of the sink in pixels
    fn resolution(&self) -> (u32, u32);

    /// Pushes one frame to the display and refreshes it
    fn show(&mut self, frame: &RgbImage) -> Result<(), EinkError>;
}

/// Sink used when no physical display is available. Accepts and drops
/// every frame so the rest of the pipeline can run off-device.
pub struct NullSink {
    width: u32,
    height: u32,
}

impl NullSink {
    pub fn new(config: &DisplayConfig) -> NullSink {
        NullSink { width: config.width, height: config.height }
    }
}

impl FrameSink for NullSink {
    fn name(&self) -> &'static str {
        "null"
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn show(&mut self, frame: &RgbImage) -> Result<(), EinkError> {
        debug!("no display attached, dropping {}x{} frame", frame.width(), frame.height());
        Ok(())
    }
}

/// Returns the e-ink display sink when the hardware support is compiled
/// in and the device opens, otherwise the no-op sink
///
/// # Arguments
///
/// * 'config' - the display configuration section
pub fn detect(config: &DisplayConfig) -> Box<dyn FrameSink> {
    #[cfg(feature = "eink")]
    {
        match sink_ssd1677::Ssd1677Sink::open(config) {
            Ok(sink) => {
                info!("e-ink display detected");
                return Box::new(sink);
            }
            Err(e) => log::warn!("no e-ink display available: {}", e),
        }
    }

    info!("running without a physical display");
    Box::new(NullSink::new(config))
}

/// Opens the captured screenshot, resizes it to the sink's native
/// resolution when the dimensions differ, and pushes it to the sink
///
/// # Arguments
///
/// * 'sink' - the display sink selected at startup
/// * 'screenshot_path' - path of the captured screenshot
pub fn push_frame(sink: &mut dyn FrameSink, screenshot_path: &str) -> Result<(), EinkError> {
    let img = image::open(screenshot_path)
        .map_err(|e| EinkError(format!("cannot open screenshot {}: {}", screenshot_path, e)))?;

    let (width, height) = sink.resolution();
    let img = if img.width() != width || img.height() != height {
        debug!("resizing {}x{} screenshot to {}x{}", img.width(), img.height(), width, height);
        img.resize_exact(width, height, FilterType::Lanczos3)
    } else {
        img
    };

    sink.show(&img.into_rgb8())
}
