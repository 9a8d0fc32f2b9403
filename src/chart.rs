use std::fs;
use std::path::Path;
use chrono::{DateTime, DurationRound, NaiveDateTime, TimeDelta};
use chrono_tz::Tz;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use thiserror::Error;
use crate::models::forecast::Hourly;

/// Rendered chart size in pixels, sized to the graph slot of the 800x480 template
pub const CHART_SIZE: (u32, u32) = (780, 300);

/// Plotted window length in hours, anchored at the top of the current hour
const WINDOW_HOURS: i64 = 12;

/// Pitch of the dashed horizontal gridlines in degrees
const GRID_STEP: f64 = 5.0;

#[derive(Error, Debug)]
#[error("error rendering hourly chart: {0}")]
pub struct ChartError(pub String);

struct Palette {
    line: RGBColor,
    fill: RGBColor,
    text: RGBColor,
    plot_bg: RGBColor,
}

/// Returns the chart palette for the current day/night mode
///
/// # Arguments
///
/// * 'is_day' - true when it is currently daytime at the target location
fn palette(is_day: bool) -> Palette {
    if is_day {
        Palette {
            line: RGBColor(217, 119, 6),
            fill: RGBColor(251, 191, 36),
            text: RGBColor(69, 39, 15),
            plot_bg: RGBColor(255, 247, 229),
        }
    } else {
        Palette {
            line: RGBColor(129, 153, 204),
            fill: RGBColor(71, 85, 128),
            text: RGBColor(226, 232, 244),
            plot_bg: RGBColor(30, 38, 59),
        }
    }
}

/// Renders the 12 hour temperature chart to an SVG file, overwriting any
/// previous chart.
///
/// Temperatures are rounded to the nearest integer (ties away from zero)
/// before plotting and annotated directly above each point instead of on
/// a y axis. An annotation equal to the one before it is drawn with zero
/// opacity so flat stretches don't stack duplicate labels while the
/// element count stays stable.
///
/// # Arguments
///
/// * 'hourly' - the hourly forecast series
/// * 'now' - current time in the configured timezone
/// * 'is_day' - day/night mode flag from the forecast
/// * 'path' - output path for the chart image
pub fn render_hourly_chart(hourly: &Hourly, now: DateTime<Tz>, is_day: bool, path: &str)
                           -> Result<(), ChartError> {

    let tz = now.timezone();
    let window_start = now.duration_trunc(TimeDelta::hours(1))
        .map_err(|e| ChartError(format!("cannot truncate current time: {}", e)))?
        .naive_local();

    let samples = select_window(&hourly.time, &hourly.temperature_2m, window_start, &tz)?;
    if samples.is_empty() {
        return Err(ChartError(format!(
            "no hourly samples within {} hours of {}", WINDOW_HOURS, window_start)));
    }

    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent)
            .map_err(|e| ChartError(format!("cannot create chart directory: {}", e)))?;
    }

    let mut t_min = samples[0].1;
    let mut t_max = samples[0].1;
    for s in &samples {
        t_min = t_min.min(s.1);
        t_max = t_max.max(s.1);
    }
    let y_lo = t_min as f64 - 1.5;
    let y_hi = t_max as f64 + 1.5;
    let x_lo = -0.5;
    let x_hi = WINDOW_HOURS as f64 + 0.5;

    let pal = palette(is_day);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();

    let mut chart = ChartBuilder::on(&root)
        .margin(6)
        .x_label_area_size(34)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(|e| ChartError(format!("chart build error: {}", e)))?;

    chart.plotting_area().fill(&pal.plot_bg)
        .map_err(|e| ChartError(format!("chart background error: {}", e)))?;

    chart.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_y_axis()
        .axis_style(&TRANSPARENT)
        .set_all_tick_mark_size(0)
        .x_labels(WINDOW_HOURS as usize / 2 + 1)
        .x_label_style(("sans-serif", 16).into_font().color(&pal.text))
        .x_label_formatter(&|x| tick_label(*x, window_start))
        .draw()
        .map_err(|e| ChartError(format!("chart mesh error: {}", e)))?;

    let mut grid = (y_lo / GRID_STEP).ceil() * GRID_STEP;
    while grid <= y_hi {
        chart.draw_series(DashedLineSeries::new(
                [(x_lo, grid), (x_hi, grid)], 6, 4, pal.text.mix(0.4).stroke_width(1)))
            .map_err(|e| ChartError(format!("chart gridline error: {}", e)))?;
        grid += GRID_STEP;
    }

    chart.draw_series(AreaSeries::new(
            samples.iter().map(|s| (s.0, s.1 as f64)), y_lo, pal.fill.mix(0.5)))
        .map_err(|e| ChartError(format!("chart area error: {}", e)))?;

    chart.draw_series(LineSeries::new(
            samples.iter().map(|s| (s.0, s.1 as f64)), pal.line.stroke_width(2)))
        .map_err(|e| ChartError(format!("chart line error: {}", e)))?;

    let opacities = label_opacities(&samples);
    let dy = (y_hi - y_lo) * 0.045;
    chart.draw_series(samples.iter().zip(opacities.iter()).map(|(s, alpha)| {
            let style = ("sans-serif", 16).into_font()
                .color(&pal.text.mix(*alpha))
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            Text::new(format!("{}", s.1), (s.0, s.1 as f64 + dy), style)
        }))
        .map_err(|e| ChartError(format!("chart annotation error: {}", e)))?;

    root.present()
        .map_err(|e| ChartError(format!("cannot write chart to {}: {}", path, e)))?;

    Ok(())
}

/// Selects the rows falling within the plotted window, both bounds
/// inclusive, and returns them as (hour offset, rounded temperature)
/// pairs
///
/// # Arguments
///
/// * 'times' - hourly timestamps
/// * 'temps' - hourly temperatures, parallel to 'times'
/// * 'window_start' - top of the current hour in local wall-clock time
/// * 'tz' - the configured timezone
fn select_window(times: &[String], temps: &[f64], window_start: NaiveDateTime, tz: &Tz)
                 -> Result<Vec<(f64, i64)>, ChartError> {

    let window_end = window_start + TimeDelta::hours(WINDOW_HOURS);

    let mut samples: Vec<(f64, i64)> = Vec::new();
    for (ts, temp) in times.iter().zip(temps.iter()) {
        let t = parse_local(ts, tz)?;
        if t >= window_start && t <= window_end {
            let offset = (t - window_start).num_minutes() as f64 / 60.0;
            samples.push((offset, temp.round() as i64));
        }
    }

    Ok(samples)
}

/// Parses one hourly timestamp to local wall-clock time with the offset
/// discarded.
///
/// Open-Meteo answers in naive local time when a timezone query parameter
/// is sent, but offset forms are accepted too and converted to the
/// configured timezone first.
///
/// # Arguments
///
/// * 'ts' - the timestamp text
/// * 'tz' - the configured timezone
fn parse_local(ts: &str, tz: &Tz) -> Result<NaiveDateTime, ChartError> {
    let with_offset = DateTime::parse_from_rfc3339(ts)
        .or_else(|_| DateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M%:z"));
    if let Ok(t) = with_offset {
        return Ok(t.with_timezone(tz).naive_local());
    }

    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M"))
        .map_err(|e| ChartError(format!("cannot parse hourly timestamp '{}': {}", ts, e)))
}

/// Returns one opacity per sample: zero when the value equals the
/// immediately preceding one, full otherwise
///
/// # Arguments
///
/// * 'samples' - the windowed (offset, temperature) pairs
fn label_opacities(samples: &[(f64, i64)]) -> Vec<f64> {
    samples.iter().enumerate()
        .map(|(i, s)| if i > 0 && samples[i - 1].1 == s.1 { 0.0 } else { 1.0 })
        .collect()
}

/// Formats an x axis tick as a 12-hour clock label without leading zero
///
/// # Arguments
///
/// * 'offset' - tick position as hours from the window start
/// * 'window_start' - top of the current hour in local wall-clock time
fn tick_label(offset: f64, window_start: NaiveDateTime) -> String {
    let t = window_start + TimeDelta::minutes((offset * 60.0).round() as i64);
    t.format("%-I %p").to_string()
}
