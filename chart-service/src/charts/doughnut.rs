use std::f64::consts::PI;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{style, ChartSpec};
use crate::transform::labels::share_label;

/// Inner radius as a share of the outer one.
const CUTOUT: f64 = 0.4;
const LEGEND_SWATCH: i32 = 12;
const LEGEND_ROW: i32 = 22;

/// Doughnut of the first dataset with a legend carrying each zone's share.
///
/// Slices are sized from finite positive values only; the legend still shows
/// every raw value, `NaN` included.
pub fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let labels = spec.labels();
    let Some(dataset) = spec.datasets.first() else {
        return super::draw_empty(root, spec);
    };
    if labels.is_empty() {
        return super::draw_empty(root, spec);
    }

    let area = root.titled(&spec.title, style::title_font())?;
    let (width, _) = area.dim_in_pixel();
    let (pie_area, legend_area) = area.split_horizontally((f64::from(width) * 0.6) as i32);

    let values = dataset.values();
    let total: f64 = values.iter().sum();
    let sizes: Vec<f64> = values
        .iter()
        .map(|v| if v.is_finite() && *v > 0.0 { *v } else { 0.0 })
        .collect();
    let slice_total: f64 = sizes.iter().sum();

    let (w, h) = pie_area.dim_in_pixel();
    let center = (f64::from(w) / 2.0, f64::from(h) / 2.0);
    let outer = f64::from(w.min(h)) / 2.0 * 0.9;
    let inner = outer * CUTOUT;

    if slice_total > 0.0 {
        let mut start = -PI / 2.0;
        for (idx, size) in sizes.iter().enumerate() {
            if *size == 0.0 {
                continue;
            }
            let sweep = size / slice_total * 2.0 * PI;
            let color = dataset.color_at(idx);

            let ring = ring_segment(center, inner, outer, start, start + sweep);
            let mut outline = ring.clone();
            outline.push(ring[0]);
            pie_area.draw(&Polygon::new(ring, style::fill(color)))?;
            pie_area.draw(&PathElement::new(outline, style::border(color)))?;

            if let Some(text) = dataset.data_labels.as_ref().and_then(|l| l.get(idx)) {
                let anchor = to_pixel(center, (inner + outer) / 2.0, start + sweep / 2.0);
                pie_area.draw(&Text::new(text.clone(), anchor, style::data_label_font()))?;
            }

            start += sweep;
        }
    }

    for (idx, label) in labels.iter().enumerate() {
        let y = 10 + idx as i32 * LEGEND_ROW;
        let value = values.get(idx).copied().unwrap_or(f64::NAN);
        legend_area.draw(&Rectangle::new(
            [(0, y), (LEGEND_SWATCH, y + LEGEND_SWATCH)],
            style::fill(dataset.color_at(idx)),
        ))?;
        legend_area.draw(&Text::new(
            share_label(label, value, total),
            (LEGEND_SWATCH + 6, y),
            style::label_font(),
        ))?;
    }

    Ok(())
}

fn to_pixel(center: (f64, f64), radius: f64, angle: f64) -> (i32, i32) {
    (
        (center.0 + radius * angle.cos()).round() as i32,
        (center.1 + radius * angle.sin()).round() as i32,
    )
}

/// Outline of the ring between `inner` and `outer` from angle `from` to `to`:
/// the outer arc forwards, then the inner arc back.
fn ring_segment(center: (f64, f64), inner: f64, outer: f64, from: f64, to: f64) -> Vec<(i32, i32)> {
    let steps = ((to - from).to_degrees().ceil() as usize).max(2);
    let arc = |radius: f64| {
        (0..=steps).map(move |i| to_pixel(center, radius, from + (to - from) * i as f64 / steps as f64))
    };
    arc(outer).chain(arc(inner).rev()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_segment_walks_outer_then_inner_arc() {
        let points = ring_segment((100.0, 100.0), 40.0, 100.0, -PI / 2.0, 0.0);
        assert_eq!(points.first(), Some(&(100, 0)));
        assert_eq!(points[points.len() / 2 - 1], (200, 100));
        assert_eq!(points[points.len() / 2], (140, 100));
        assert_eq!(points.last(), Some(&(100, 60)));
    }
}
