use std::ops::Range;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{line::finite_runs, style, ChartSpec};

/// Share of a category slot taken by its bars.
const GROUP_WIDTH: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Vertical,
    Horizontal,
}

/// Maps (category position, value) to chart coordinates. Horizontal charts
/// list the first category at the top.
#[derive(Debug, Clone, Copy)]
struct Axes {
    orientation: Orientation,
    categories: usize,
}

impl Axes {
    fn point(&self, position: f64, value: f64) -> (f64, f64) {
        match self.orientation {
            Orientation::Vertical => (position, value),
            Orientation::Horizontal => (value, self.flip(position)),
        }
    }

    fn category_of(&self, coord: f64) -> f64 {
        match self.orientation {
            Orientation::Vertical => coord,
            Orientation::Horizontal => self.flip(coord),
        }
    }

    fn flip(&self, position: f64) -> f64 {
        (self.categories - 1) as f64 - position
    }
}

/// One drawn bar in category/value space.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BarGeom {
    dataset: usize,
    category: usize,
    lo: f64,
    hi: f64,
    base: f64,
    top: f64,
}

pub fn draw_vertical<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    stacked: bool,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    draw(root, spec, stacked, Orientation::Vertical)
}

pub fn draw_horizontal<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    stacked: bool,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    draw(root, spec, stacked, Orientation::Horizontal)
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    stacked: bool,
    orientation: Orientation,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let labels = spec.labels();
    if labels.is_empty() {
        return super::draw_empty(root, spec);
    }

    let axes = Axes {
        orientation,
        categories: labels.len(),
    };
    let bars = layout(spec, stacked);
    let categories = category_range(labels.len());
    let values = value_range(spec, &bars);
    let (x_range, y_range) = match orientation {
        Orientation::Vertical => (categories, values),
        Orientation::Horizontal => (values, categories),
    };

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, style::title_font())
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(match orientation {
            Orientation::Vertical => 60,
            Orientation::Horizontal => 110,
        })
        .build_cartesian_2d(x_range, y_range)?;

    let category_desc = spec.category_axis.clone().unwrap_or_default();
    let value_desc = spec.value_axis.clone().unwrap_or_default();
    let category_fmt = |v: &f64| category_label(labels, axes.category_of(*v));

    let mut mesh = chart.configure_mesh();
    match orientation {
        Orientation::Vertical => {
            mesh.disable_x_mesh()
                .x_labels(labels.len())
                .x_label_formatter(&category_fmt)
                .x_desc(category_desc)
                .y_desc(value_desc);
        }
        Orientation::Horizontal => {
            mesh.disable_y_mesh()
                .y_labels(labels.len())
                .y_label_formatter(&category_fmt)
                .y_desc(category_desc)
                .x_desc(value_desc);
        }
    }
    mesh.label_style(style::label_font()).draw()?;

    for (idx, dataset) in spec.datasets.iter().enumerate() {
        let swatch = style::rgb(dataset.color_at(0));

        if dataset.as_line {
            for (run_idx, run) in finite_runs(dataset.values()).iter().enumerate() {
                let series = chart.draw_series(LineSeries::new(
                    run.iter().map(|&(i, v)| axes.point(i as f64, v)),
                    swatch.stroke_width(2),
                ))?;
                if run_idx == 0 {
                    series
                        .label(dataset.label.clone())
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 12, y)], swatch.stroke_width(2)));
                }
            }
            continue;
        }

        let own = || bars.iter().filter(move |b| b.dataset == idx);

        chart
            .draw_series(own().map(|b| {
                Rectangle::new(
                    [axes.point(b.lo, b.base), axes.point(b.hi, b.top)],
                    style::fill(dataset.color_at(b.category)),
                )
            }))?
            .label(dataset.label.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], swatch.filled()));

        chart.draw_series(own().map(|b| {
            Rectangle::new(
                [axes.point(b.lo, b.base), axes.point(b.hi, b.top)],
                style::border(dataset.color_at(b.category)),
            )
        }))?;

        if let Some(data_labels) = &dataset.data_labels {
            chart.draw_series(own().filter_map(|b| {
                data_labels.get(b.category).map(|text| {
                    Text::new(
                        text.clone(),
                        axes.point((b.lo + b.hi) / 2.0, (b.base + b.top) / 2.0),
                        style::data_label_font(),
                    )
                })
            }))?;
        }
    }

    if let Some(annotations) = &spec.annotations {
        let (offset, anchor) = match orientation {
            Orientation::Vertical => ((0, -12), Pos::new(HPos::Center, VPos::Center)),
            Orientation::Horizontal => ((8, 0), Pos::new(HPos::Left, VPos::Center)),
        };
        let font = style::label_font().pos(anchor);
        chart.draw_series(annotations.iter().enumerate().map(|(category, text)| {
            let end = bars
                .iter()
                .filter(|b| b.category == category)
                .map(|b| b.top.max(b.base))
                .fold(0.0, f64::max);
            EmptyElement::at(axes.point(category as f64, end))
                + Text::new(text.clone(), offset, font.clone())
        }))?;
    }

    if spec.datasets.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(style::GRID_COLOR)
            .label_font(style::label_font())
            .draw()?;
    }

    Ok(())
}

/// Bars of every non-line dataset. Stacked bars share one slot per category,
/// positives stacking up from zero and negatives down; otherwise each dataset
/// gets its own slot. Non-finite values draw nothing.
fn layout(spec: &ChartSpec, stacked: bool) -> Vec<BarGeom> {
    let bar_sets: Vec<_> = spec
        .datasets
        .iter()
        .enumerate()
        .filter(|(_, d)| !d.as_line)
        .collect();
    let slots = if stacked { 1 } else { bar_sets.len().max(1) };
    let width = GROUP_WIDTH / slots as f64;

    let mut out = Vec::new();
    for category in 0..spec.labels().len() {
        let (mut up, mut down) = (0.0, 0.0);
        for (slot, (dataset, values)) in bar_sets.iter().enumerate() {
            let value = values.values().get(category).copied().unwrap_or(f64::NAN);
            if !value.is_finite() {
                continue;
            }

            let slot = if stacked { 0 } else { slot };
            let lo = category as f64 - GROUP_WIDTH / 2.0 + slot as f64 * width;
            let (base, top) = if !stacked {
                (0.0, value)
            } else if value >= 0.0 {
                up += value;
                (up - value, up)
            } else {
                down += value;
                (down - value, down)
            };

            out.push(BarGeom {
                dataset: *dataset,
                category,
                lo,
                hi: lo + width,
                base,
                top,
            });
        }
    }
    out
}

fn category_range(categories: usize) -> Range<f64> {
    -0.5..(categories as f64 - 0.5)
}

/// Value axis from the bar extents and any line overlay, always including zero.
fn value_range(spec: &ChartSpec, bars: &[BarGeom]) -> Range<f64> {
    let lines = spec
        .datasets
        .iter()
        .filter(|d| d.as_line)
        .flat_map(|d| d.values().iter().copied())
        .filter(|v| v.is_finite());
    let (min, max) = bars
        .iter()
        .flat_map(|b| [b.base, b.top])
        .chain(lines)
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let lo = if min < 0.0 { min * 1.1 } else { 0.0 };
    let hi = if max > 0.0 { max * 1.1 } else { 1.0 };
    lo..hi
}

/// Label of the category sitting exactly on `coord`; blank between categories.
pub(crate) fn category_label(labels: &[String], coord: f64) -> String {
    let idx = coord.round();
    if (coord - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
