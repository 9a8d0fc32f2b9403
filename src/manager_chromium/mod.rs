pub mod errors;

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use log::debug;
use crate::config::ChromiumConfig;
use crate::manager_chromium::errors::CaptureError;

/// Poll interval while waiting for the rasterizer to exit
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Struct for rasterizing the rendered HTML document with a headless
/// chromium
pub struct Chromium {
    binary: String,
    window_width: u32,
    window_height: u32,
    timeout: Duration,
}

impl Chromium {
    /// Returns a Chromium struct ready for capturing screenshots
    ///
    /// # Arguments
    ///
    /// * 'config' - the chromium configuration section
    pub fn new(config: &ChromiumConfig) -> Chromium {
        Chromium {
            binary: config.binary.clone(),
            window_width: config.window_width,
            window_height: config.window_height,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Rasterizes the rendered document to a PNG at the fixed output
    /// size, overwriting any previous screenshot.
    ///
    /// The child process is waited on with a bounded deadline, a hung
    /// rasterizer is killed and reported as a capture failure rather
    /// than stalling the pipeline.
    ///
    /// # Arguments
    ///
    /// * 'html_path' - path to the rendered HTML document
    /// * 'screenshot_path' - path the PNG is written to
    pub fn capture(&self, html_path: &str, screenshot_path: &str) -> Result<(), CaptureError> {
        let url = file_url(html_path)?;
        let args = self.build_args(&url, screenshot_path);
        debug!("running {} {}", self.binary, args.join(" "));

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CaptureError(format!("cannot start {}: {}", self.binary, e)))?;

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    child.kill()?;
                    let _ = child.wait();
                    return Err(CaptureError(format!(
                        "{} did not finish within {} seconds",
                        self.binary, self.timeout.as_secs())));
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        if !status.success() {
            let mut stderr = String::new();
            if let Some(mut pipe) = child.stderr.take() {
                let _ = pipe.read_to_string(&mut stderr);
            }
            return Err(CaptureError(format!(
                "{} exited with {}: {}", self.binary, status, stderr.trim())));
        }

        Ok(())
    }

    /// Builds the full rasterizer argument list
    ///
    /// # Arguments
    ///
    /// * 'url' - file URL of the rendered document
    /// * 'screenshot_path' - path the PNG is written to
    fn build_args(&self, url: &str, screenshot_path: &str) -> Vec<String> {
        vec![
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            "--hide-scrollbars".to_string(),
            format!("--window-size={},{}", self.window_width, self.window_height),
            format!("--screenshot={}", screenshot_path),
            url.to_string(),
        ]
    }
}

/// Returns the file URL for a local path, which must exist since the
/// rasterizer resolves it on its own
///
/// # Arguments
///
/// * 'path' - path to turn into a URL
fn file_url(path: &str) -> Result<String, CaptureError> {
    let absolute = Path::new(path).canonicalize()
        .map_err(|e| CaptureError(format!("cannot resolve {}: {}", path, e)))?;

    Ok(format!("file://{}", absolute.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chromium() -> Chromium {
        Chromium::new(&ChromiumConfig {
            binary: "chromium-browser".to_string(),
            window_width: 800,
            window_height: 480,
            timeout_secs: 60,
        })
    }

    #[test]
    fn builds_the_full_argument_list() {
        let args = chromium().build_args("file:///tmp/output.html", "./screen.png");

        assert_eq!(args, vec![
            "--headless",
            "--disable-gpu",
            "--hide-scrollbars",
            "--window-size=800,480",
            "--screenshot=./screen.png",
            "file:///tmp/output.html",
        ]);
    }

    #[test]
    fn file_url_is_absolute() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let url = file_url(file.path().to_str().unwrap()).unwrap();

        assert!(url.starts_with("file:///"));
        assert!(url.ends_with(file.path().file_name().unwrap().to_str().unwrap()));
    }

    #[test]
    fn missing_document_is_an_error() {
        assert!(file_url("/nonexistent/output.html").is_err());
    }

    #[test]
    fn missing_binary_is_a_capture_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut broken = chromium();
        broken.binary = "/nonexistent/chromium".to_string();

        let err = broken.capture(file.path().to_str().unwrap(), "./screen.png").unwrap_err();

        assert!(err.to_string().contains("/nonexistent/chromium"));
    }
}
