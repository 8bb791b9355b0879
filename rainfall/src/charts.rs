use std::fs::create_dir_all;
use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::error::{RainfallError, Result};
use crate::models::Month;

fn chart_err<E: std::fmt::Display>(e: E) -> RainfallError {
    RainfallError::Chart(e.to_string())
}

/// Vertical extent for the trend line: zero up to 10% above the wettest month.
pub fn trend_y_range(trend: &[f64; 12]) -> (f64, f64) {
    let max = trend.iter().copied().fold(0.0_f64, f64::max);
    (0.0, if max > 0.0 { max * 1.1 } else { 1.0 })
}

/// Write the 12-month trend of `subdivision` as an SVG line chart.
pub fn render_trend_chart(output_path: &Path, subdivision: &str, trend: &[f64; 12]) -> Result<()> {
    if let Some(dir) = output_path.parent() {
        create_dir_all(dir)?;
    }

    let caption_font = ("sans-serif", 24);
    let label_font = ("sans-serif", 16);
    let colour = RGBColor(30, 100, 200);

    let root = SVGBackend::new(output_path, (900, 500)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let (y_min, y_max) = trend_y_range(trend);
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{subdivision}: mean monthly rainfall"), caption_font)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0i32..11i32, y_min..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_labels(12)
        .x_label_formatter(&|i| {
            Month::ALL
                .get(*i as usize)
                .map(|m| m.code().to_string())
                .unwrap_or_default()
        })
        .y_desc("Rainfall (mm)")
        .label_style(label_font)
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(
            LineSeries::new(
                trend.iter().enumerate().map(|(i, &v)| (i as i32, v)),
                colour.stroke_width(3),
            )
            .point_size(4),
        )
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    info!("Trend chart for {} written to {}", subdivision, output_path.display());
    Ok(())
}
