//! Chart descriptions and their SVG rendering.
//!
//! A [`ChartSpec`] is plain data built by the transforms; drawing goes through
//! `plotters` only once its labels and series pass the length check.

pub mod bar;
pub mod doughnut;
pub mod line;
pub mod style;

use plotters::prelude::*;

pub const ZONE_CONSUMPTION: &str = "zone-consumption";
pub const ZONE_LEAKS: &str = "zone-leaks";
pub const CONSUMPTION_VS_NRW: &str = "consumption-vs-nrw";
pub const WEEKLY_CONSUMPTION: &str = "weekly-consumption";
pub const YESTERDAY_AVERAGE: &str = "yesterday-average";
pub const CONSUMPTION_HOURS_AGO: &str = "consumption-hours-ago";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Doughnut,
    Bar { stacked: bool },
    HorizontalBar { stacked: bool },
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub values: Option<Vec<f64>>,
    /// One color per point, or fewer to be cycled.
    pub colors: Vec<String>,
    pub data_labels: Option<Vec<String>>,
    /// Drawn as a line over a bar chart.
    pub as_line: bool,
}

impl Dataset {
    pub fn new(label: impl Into<String>, values: Option<Vec<f64>>, color: &str) -> Self {
        Self {
            label: label.into(),
            values,
            colors: vec![color.to_string()],
            data_labels: None,
            as_line: false,
        }
    }

    pub fn with_colors(mut self, colors: Vec<String>) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_data_labels(mut self, data_labels: Vec<String>) -> Self {
        self.data_labels = Some(data_labels);
        self
    }

    pub fn as_line(mut self) -> Self {
        self.as_line = true;
        self
    }

    pub fn color_at(&self, idx: usize) -> &str {
        if self.colors.is_empty() {
            style::FALLBACK_COLOR
        } else {
            &self.colors[idx % self.colors.len()]
        }
    }

    pub fn values(&self) -> &[f64] {
        self.values.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub name: &'static str,
    pub title: String,
    pub kind: ChartKind,
    pub labels: Option<Vec<String>>,
    pub datasets: Vec<Dataset>,
    pub value_axis: Option<String>,
    pub category_axis: Option<String>,
    /// One line of text per category, drawn beside it.
    pub annotations: Option<Vec<String>>,
}

impl ChartSpec {
    pub fn new(name: &'static str, title: impl Into<String>, kind: ChartKind, labels: Option<Vec<String>>) -> Self {
        Self {
            name,
            title: title.into(),
            kind,
            labels,
            datasets: Vec::new(),
            value_axis: None,
            category_axis: None,
            annotations: None,
        }
    }

    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }

    pub fn value_axis(mut self, desc: impl Into<String>) -> Self {
        self.value_axis = Some(desc.into());
        self
    }

    pub fn category_axis(mut self, desc: impl Into<String>) -> Self {
        self.category_axis = Some(desc.into());
        self
    }

    pub fn annotations(mut self, annotations: Vec<String>) -> Self {
        self.annotations = Some(annotations);
        self
    }

    pub fn labels(&self) -> &[String] {
        self.labels.as_deref().unwrap_or_default()
    }

    /// Labels and every dataset are present and have the same length.
    pub fn is_drawable(&self) -> bool {
        let Some(labels) = &self.labels else {
            return false;
        };
        self.datasets
            .iter()
            .all(|d| d.values.as_ref().is_some_and(|v| v.len() == labels.len()))
    }
}

/// Every chart produced from one report snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSet {
    pub charts: Vec<ChartSpec>,
}

impl ChartSet {
    pub fn find(&self, name: &str) -> Option<&ChartSpec> {
        self.charts.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.charts.iter().map(|c| c.name).collect()
    }
}

#[derive(Debug)]
pub enum RenderOutcome {
    Drawn(String),
    Skipped,
}

#[derive(thiserror::Error, Debug)]
#[error("failed to draw chart {chart}: {message}")]
pub struct ChartError {
    pub chart: &'static str,
    pub message: String,
}

/// Run `draw` only when the chart's labels and series line up; otherwise the
/// chart is skipped without drawing anything.
pub fn render_with<F>(spec: &ChartSpec, draw: F) -> Result<RenderOutcome, ChartError>
where
    F: FnOnce(&ChartSpec) -> Result<String, ChartError>,
{
    if !spec.is_drawable() {
        tracing::debug!(chart = spec.name, "labels and series differ in length, skipping draw");
        metrics::counter!("charts_skipped_total").increment(1);
        return Ok(RenderOutcome::Skipped);
    }

    let svg = draw(spec)?;
    metrics::counter!("charts_rendered_total").increment(1);
    Ok(RenderOutcome::Drawn(svg))
}

pub fn render_svg(spec: &ChartSpec, size: (u32, u32)) -> Result<RenderOutcome, ChartError> {
    render_with(spec, |spec| draw_svg(spec, size))
}

fn draw_svg(spec: &ChartSpec, size: (u32, u32)) -> Result<String, ChartError> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, size).into_drawing_area();
        let drawn = match spec.kind {
            ChartKind::Doughnut => doughnut::draw(&root, spec),
            ChartKind::Bar { stacked } => bar::draw_vertical(&root, spec, stacked),
            ChartKind::HorizontalBar { stacked } => bar::draw_horizontal(&root, spec, stacked),
            ChartKind::Line => line::draw(&root, spec),
        };
        drawn
            .and_then(|_| root.present())
            .map_err(|e| ChartError {
                chart: spec.name,
                message: e.to_string(),
            })?;
    }
    Ok(buffer)
}

/// Caption plus a centered note, for charts with no categories at all.
pub(crate) fn draw_empty<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    spec: &ChartSpec,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let area = root.titled(&spec.title, style::title_font())?;
    let (width, height) = area.dim_in_pixel();
    area.draw(&Text::new(
        "No data",
        ((width / 2) as i32, (height / 2) as i32),
        style::centered(style::label_font()),
    ))?;
    Ok(())
}
