use plotters::coord::Shift;
use plotters::prelude::*;

use super::{bar::category_label, style, ChartSpec};

const POINT_RADIUS: u32 = 3;
/// Category labels shown at most, the rest are thinned out.
const MAX_X_LABELS: usize = 24;

/// Filled line chart, one line per dataset. `NaN` points break the line.
pub fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let labels = spec.labels();
    if labels.is_empty() {
        return super::draw_empty(root, spec);
    }

    let (min, max) = spec
        .datasets
        .iter()
        .flat_map(|d| d.values().iter().copied())
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let y_range = (if min < 0.0 { min * 1.1 } else { 0.0 })..(if max > 0.0 { max * 1.1 } else { 1.0 });
    let x_range = -0.5..(labels.len() as f64 - 0.5);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, style::title_font())
        .margin(12)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().min(MAX_X_LABELS))
        .x_label_formatter(&|v: &f64| category_label(labels, *v))
        .y_labels(5)
        .x_desc(spec.category_axis.clone().unwrap_or_default())
        .y_desc(spec.value_axis.clone().unwrap_or_default())
        .light_line_style(style::GRID_COLOR)
        .label_style(style::label_font())
        .draw()?;

    for dataset in &spec.datasets {
        let color = style::rgb(dataset.color_at(0));

        for run in finite_runs(dataset.values()) {
            chart.draw_series(
                AreaSeries::new(run.iter().map(|&(i, v)| (i as f64, v)), 0.0, color.mix(0.25))
                    .border_style(color.stroke_width(2)),
            )?;
            chart.draw_series(
                run.iter()
                    .map(|&(i, v)| Circle::new((i as f64, v), POINT_RADIUS, color.filled())),
            )?;
        }

        if let Some(data_labels) = &dataset.data_labels {
            let font = style::centered(style::label_font());
            // Missing points keep their label, drawn on the baseline.
            chart.draw_series(dataset.values().iter().zip(data_labels).enumerate().map(|(i, (v, text))| {
                let y = if v.is_finite() { *v } else { 0.0 };
                EmptyElement::at((i as f64, y)) + Text::new(text.clone(), (0, -12), font.clone())
            }))?;
        }
    }

    Ok(())
}

/// Consecutive finite points, split wherever a value is `NaN` or infinite.
pub(crate) fn finite_runs(values: &[f64]) -> Vec<Vec<(usize, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (i, v) in values.iter().copied().enumerate() {
        if v.is_finite() {
            current.push((i, v));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}
