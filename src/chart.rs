//! Rate history charts.

use crate::core::error::{BotError, Result};
use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// A dated rate series ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RateChart {
    pub title: String,
    /// Ascending by date.
    pub points: Vec<(NaiveDate, f64)>,
}

/// A rendered chart, ready to be sent as a photo.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartImage {
    pub file_name: String,
    pub png: Vec<u8>,
}

pub trait ChartRenderer: Send + Sync {
    fn render(&self, chart: &RateChart) -> Result<ChartImage>;
}

/// Draws a red line-and-point chart with dates on the x axis.
pub struct PlottersRenderer {
    width: u32,
    height: u32,
}

impl PlottersRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self::new(1024, 768)
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, chart: &RateChart) -> Result<ChartImage> {
        if chart.points.is_empty() {
            return Err(BotError::Render("nothing to plot".to_string()));
        }

        let mut pixels = vec![0u8; (self.width * self.height * 3) as usize];
        {
            let root =
                BitMapBackend::with_buffer(&mut pixels, (self.width, self.height)).into_drawing_area();
            draw(&root, chart).map_err(|e| BotError::Render(e.to_string()))?;
            root.present()
                .map_err(|e| BotError::Render(e.to_string()))?;
        }
        debug!(points = chart.points.len(), "Rendered chart");

        let image = image::RgbImage::from_raw(self.width, self.height, pixels)
            .ok_or_else(|| BotError::Render("pixel buffer size mismatch".to_string()))?;
        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| BotError::Render(e.to_string()))?;

        Ok(ChartImage {
            file_name: "plot.png".to_string(),
            png: png.into_inner(),
        })
    }
}

fn draw(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    chart: &RateChart,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    root.fill(&WHITE)?;

    // x is days since the first point; labels map it back to a date
    let start = chart.points[0].0;
    let series: Vec<(i64, f64)> = chart
        .points
        .iter()
        .map(|(date, rate)| ((*date - start).num_days(), *rate))
        .collect();
    let x_max = series.last().map_or(0, |(x, _)| *x).max(1);
    let (y_min, y_max) = y_bounds(&chart.points);

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(110)
        .y_label_area_size(70)
        .build_cartesian_2d(0i64..x_max, y_min..y_max)?;

    let date_label = |offset: &i64| {
        (start + Duration::days(*offset))
            .format("%Y-%m-%d")
            .to_string()
    };
    ctx.configure_mesh()
        .x_desc("Date")
        .y_desc("Rate")
        .x_label_formatter(&date_label)
        .x_label_style(
            ("sans-serif", 14)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .draw()?;

    ctx.draw_series(LineSeries::new(series.iter().copied(), &RED))?;
    ctx.draw_series(
        series
            .iter()
            .map(|point| Circle::new(*point, 4, RED.filled())),
    )?;
    Ok(())
}

/// Y axis range with some headroom; a flat series still gets a visible band.
fn y_bounds(points: &[(NaiveDate, f64)]) -> (f64, f64) {
    let min = points.iter().map(|(_, r)| *r).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|(_, r)| *r)
        .fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if max > min {
        (max - min) * 0.05
    } else {
        (min.abs() * 0.01).max(0.01)
    };
    (min - pad, max + pad)
}
