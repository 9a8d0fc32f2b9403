use anyhow::Result;
use chrono::Utc;
use log::info;
use crate::{chart, fields, manager_eink, template};
use crate::config::Config;
use crate::errors::InkStationRunError;
use crate::initialization::Mgr;

/// Runs one pass of the pipeline: fetch forecast, render chart, shape
/// fields, render document, capture screenshot, push to display.
///
/// Strictly linear, each stage blocks until complete. The first failing
/// stage aborts the run, the caller is expected to be re-invoked
/// wholesale by an external scheduler.
///
/// # Arguments
///
/// * 'config' - the loaded configuration
/// * 'mgr' - the managers instantiated at startup
pub fn run(config: &Config, mgr: &mut Mgr) -> Result<(), InkStationRunError> {
    let now = Utc::now().with_timezone(&mgr.tz);

    info!("fetching forecast for {:.4},{:.4}", config.geo_ref.lat, config.geo_ref.long);
    let forecast = mgr.meteo.fetch_forecast()?;

    let is_day = forecast.current.is_day == 1;

    info!("rendering hourly chart to {}", config.files.chart);
    chart::render_hourly_chart(&forecast.hourly, now, is_day, &config.files.chart)?;

    let display_fields = fields::build_display_fields(&forecast, &mgr.code_table, now)?;

    info!("rendering document to {}", config.files.output_html);
    template::render_document(&config.files.template, &config.files.output_html, &display_fields)?;

    info!("capturing screenshot to {}", config.files.screenshot);
    mgr.chromium.capture(&config.files.output_html, &config.files.screenshot)?;

    info!("pushing frame to {} display", mgr.eink.name());
    manager_eink::push_frame(mgr.eink.as_mut(), &config.files.screenshot)?;

    Ok(())
}
