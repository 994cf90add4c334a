//! Report payloads to chart series.
//!
//! The transforms here are pure apart from metrics: each one takes the
//! snapshot carried by an [`Envelope`] and returns a new one holding the
//! charts for its page.

pub mod chart_sets;
pub mod colors;
pub mod daily;
pub mod labels;
pub mod numbers;
pub mod timezone;

use report_client::{HoursAgoConsumption, ReportFilter, ZoneReport};

use crate::charts::ChartSet;
use crate::pipeline::{Envelope, PipelineError, Transform};
use colors::Palette;
use numbers::parse_field;

/// Series of a monthly report, zones listed by ascending id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZoneDataset {
    pub zone_labels: Option<Vec<String>>,
    pub zone_consumption: Option<Vec<f64>>,
    pub zone_leaks: Option<Vec<f64>>,
}

/// Zone names in `zoneMetaData` key order. A zone without a name gets an
/// empty label so positions stay aligned.
pub(crate) fn zone_labels(report: &ZoneReport) -> Option<Vec<String>> {
    report.zone_meta_data.as_ref().map(|meta| {
        meta.values()
            .map(|zone| zone.name.clone().unwrap_or_default())
            .collect()
    })
}

pub fn dissect(report: &ZoneReport) -> ZoneDataset {
    let series = |field: fn(&report_client::StatRecord) -> f64| -> Option<Vec<f64>> {
        report.zone_stats.as_ref().map(|stats| {
            stats
                .values()
                .map(|stat| stat.single().map_or(f64::NAN, field))
                .collect()
        })
    };

    ZoneDataset {
        zone_labels: zone_labels(report),
        zone_consumption: series(|r| parse_field(r.consumption.as_ref())),
        zone_leaks: series(|r| parse_field(r.leak.as_ref())),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChartOptions {
    pub palette: Palette,
    pub show_daily_average: bool,
}

/// Builds the daily or monthly page depending on the filter the report was
/// fetched with.
#[derive(Clone, Default)]
pub struct ZoneCharts {
    pub options: ChartOptions,
}

#[async_trait::async_trait]
impl Transform<ZoneReport, ChartSet> for ZoneCharts {
    async fn apply(&self, input: Envelope<ZoneReport>) -> Result<Envelope<ChartSet>, PipelineError> {
        let charts = match input.filter {
            ReportFilter::Daily(date) => {
                chart_sets::daily_charts(&daily::dissect_daily(&input.payload, date), &self.options)
            }
            ReportFilter::Monthly { .. } => chart_sets::monthly_charts(&dissect(&input.payload), &self.options),
            ReportFilter::HoursAgo { .. } => {
                metrics::counter!("transform_rejected_total").increment(1);
                return Err(PipelineError::Transform(format!(
                    "zone charts cannot be built from a {} report",
                    input.filter
                )));
            }
        };

        tracing::debug!(
            filter = %input.filter,
            zone_count = input.payload.zone_count(),
            charts = charts.charts.len(),
            "zone report dissected"
        );
        Ok(input.map(|_| charts))
    }
}

#[derive(Clone, Default)]
pub struct HoursAgoChart;

#[async_trait::async_trait]
impl Transform<HoursAgoConsumption, ChartSet> for HoursAgoChart {
    async fn apply(
        &self,
        input: Envelope<HoursAgoConsumption>,
    ) -> Result<Envelope<ChartSet>, PipelineError> {
        match input.filter {
            ReportFilter::HoursAgo { hours } => {
                let charts = chart_sets::hours_ago_chart(&input.payload, hours);
                Ok(input.map(|_| charts))
            }
            other => {
                metrics::counter!("transform_rejected_total").increment(1);
                Err(PipelineError::Transform(format!(
                    "flow rate chart cannot be built from a {other} report"
                )))
            }
        }
    }
}
