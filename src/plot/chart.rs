//! SVG chart export.
//!
//! Two panels side by side:
//! - left: observed points, the fit at the observed x values (dashed black) and
//!   the expanded evaluation as crosses
//! - right: the fit over the extrapolation grid plus the optional force overlay

use std::error::Error;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::AppError;
use crate::plot::series::{ChartSeries, bounds};

type DrawResult = Result<(), Box<dyn Error>>;

/// Render both panels into an SVG file of `width x height` pixels.
pub fn render_svg(path: &Path, series: &ChartSeries, title: &str, width: u32, height: u32) -> Result<(), AppError> {
    draw_svg(path, series, title, (width.max(200), height.max(150)))
        .map_err(|e| AppError::numerical(format!("Failed to render SVG '{}': {e}", path.display())))?;
    log::info!("wrote chart to '{}'", path.display());
    Ok(())
}

fn draw_svg(path: &Path, series: &ChartSeries, title: &str, size: (u32, u32)) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 20))?;

    let (left, right) = root.split_horizontally(size.0 / 2);
    draw_observed_panel(&left, series)?;
    draw_grid_panel(&right, series)?;

    root.present()?;
    Ok(())
}

fn draw_observed_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, series: &ChartSeries) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let ([x0, x1], [y0, y1]) = bounds(&[&series.observed, &series.fit_observed, &series.expanded_observed]);

    let mut chart = ChartBuilder::on(area)
        .caption("observed range", ("sans-serif", 16))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(55)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart.configure_mesh().x_desc("x").y_desc("y").draw()?;

    chart
        .draw_series(series.observed.iter().map(|&p| Circle::new(p, 4, BLUE.filled())))?
        .label("data")
        .legend(|(x, y)| Circle::new((x, y), 4, BLUE.filled()));

    chart
        .draw_series(DashedLineSeries::new(
            series.fit_observed.iter().copied(),
            6,
            4,
            BLACK.stroke_width(2),
        ))?
        .label("polyfit")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));

    chart
        .draw_series(series.expanded_observed.iter().map(|&p| Cross::new(p, 4, RED)))?
        .label("expanded")
        .legend(|(x, y)| Cross::new((x, y), 4, RED));

    if !series.highlighted.is_empty() {
        chart
            .draw_series(series.highlighted.iter().map(|&p| Circle::new(p, 7, MAGENTA.stroke_width(2))))?
            .label("largest residuals")
            .legend(|(x, y)| Circle::new((x, y), 5, MAGENTA.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_grid_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, series: &ChartSeries) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let ([x0, x1], [y0, y1]) = bounds(&[&series.fit_grid, &series.force_grid]);

    let mut chart = ChartBuilder::on(area)
        .caption("extrapolation grid", ("sans-serif", 16))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("y")
        .y_label_formatter(&|v| format!("{v:.2e}"))
        .draw()?;

    chart
        .draw_series(DashedLineSeries::new(
            series.fit_grid.iter().copied(),
            6,
            4,
            BLACK.stroke_width(2),
        ))?
        .label("polyfit")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));

    if let Some(kind) = series.force_kind {
        chart
            .draw_series(LineSeries::new(series.force_grid.iter().copied(), RED.stroke_width(2)))?
            .label(kind.display_name())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}
