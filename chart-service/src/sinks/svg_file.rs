use std::path::PathBuf;

use futures::{Stream, StreamExt};

use crate::charts::{render_svg, ChartSet, ChartSpec, RenderOutcome};
use crate::pipeline::{Envelope, PipelineError, Sink};

/// Renders every chart of each incoming set to `<dir>/<chart name>.svg`.
///
/// A later set overwrites the files of an earlier one. Failures are logged and
/// counted and the sink keeps going; the first one is returned at the end.
pub struct SvgFileSink {
    dir: PathBuf,
    size: (u32, u32),
}

impl SvgFileSink {
    pub fn new<P: Into<PathBuf>>(dir: P, size: (u32, u32)) -> Self {
        Self { dir: dir.into(), size }
    }

    async fn write_set(&self, set: &ChartSet) -> Result<usize, PipelineError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PipelineError::Sink(format!("failed to create {}: {e}", self.dir.display())))?;

        let mut written = 0;
        let mut first_error = None;
        for spec in &set.charts {
            match self.write_chart(spec).await {
                Ok(true) => written += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(error = %e, chart = spec.name, "chart not written");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(written),
        }
    }

    /// `Ok(false)` when the chart was skipped by the length guard.
    async fn write_chart(&self, spec: &ChartSpec) -> Result<bool, PipelineError> {
        let svg = match render_svg(spec, self.size).map_err(|e| PipelineError::Sink(e.to_string()))? {
            RenderOutcome::Drawn(svg) => svg,
            RenderOutcome::Skipped => {
                tracing::info!(chart = spec.name, "chart skipped, series do not match labels");
                return Ok(false);
            }
        };

        let path = self.dir.join(format!("{}.svg", spec.name));
        tokio::fs::write(&path, svg)
            .await
            .map_err(|e| PipelineError::Sink(format!("failed to write {}: {e}", path.display())))?;
        tracing::info!(chart = spec.name, path = %path.display(), "chart written");
        Ok(true)
    }
}

#[async_trait::async_trait]
impl Sink<ChartSet> for SvgFileSink {
    async fn run<S>(&self, mut input: S) -> Result<(), PipelineError>
    where
        S: Stream<Item = Result<Envelope<ChartSet>, PipelineError>> + Send + Unpin + 'static,
    {
        let mut first_error = None;

        while let Some(item) = input.next().await {
            let result = match item {
                Ok(env) => self.write_set(&env.payload).await.map(|written| (env.filter, written)),
                Err(e) => Err(e),
            };

            match result {
                Ok((filter, written)) => {
                    tracing::info!(%filter, written, dir = %self.dir.display(), "chart set rendered");
                }
                Err(e) => {
                    metrics::counter!("svg_sink_failed_total").increment(1);
                    tracing::error!(error = %e, "chart set not rendered");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartKind, Dataset, CONSUMPTION_VS_NRW, ZONE_CONSUMPTION, ZONE_LEAKS};
    use report_client::ReportFilter;

    fn chart_set() -> ChartSet {
        let labels = Some(vec!["North".to_string(), "South".to_string()]);
        ChartSet {
            charts: vec![
                ChartSpec::new(ZONE_CONSUMPTION, "Consumption", ChartKind::Doughnut, labels.clone())
                    .dataset(Dataset::new("Consumption", Some(vec![3.0, 1.0]), "#ffa532")),
                ChartSpec::new(ZONE_LEAKS, "Leaks", ChartKind::Bar { stacked: false }, labels)
                    .dataset(Dataset::new("Leaks", Some(vec![1.0]), "#ffa532")),
            ],
        }
    }

    #[tokio::test]
    async fn drawable_charts_are_written_and_skipped_ones_are_not() {
        let dir = tempfile::tempdir().unwrap();
        let sink = SvgFileSink::new(dir.path().join("out"), (400, 300));
        let env = Envelope::new(ReportFilter::monthly(2024, 3).unwrap(), chart_set());

        sink.run(futures::stream::iter([Ok(env)])).await.unwrap();

        let svg = std::fs::read_to_string(dir.path().join("out/zone-consumption.svg")).unwrap();
        assert!(svg.contains("<svg"));
        assert!(!dir.path().join("out/zone-leaks.svg").exists());
    }

    #[tokio::test]
    async fn keeps_going_after_an_error_and_reports_it() {
        let dir = tempfile::tempdir().unwrap();
        let sink = SvgFileSink::new(dir.path(), (400, 300));
        let env = Envelope::new(ReportFilter::monthly(2024, 3).unwrap(), chart_set());
        let items = vec![Err(PipelineError::Source("upstream down".into())), Ok(env)];

        let err = sink.run(futures::stream::iter(items)).await.unwrap_err();

        assert!(matches!(err, PipelineError::Source(_)));
        assert!(dir.path().join("zone-consumption.svg").exists());
    }

    #[tokio::test]
    async fn a_failed_chart_does_not_stop_the_rest_of_its_set() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the way makes the first chart's write fail.
        std::fs::create_dir(dir.path().join("zone-consumption.svg")).unwrap();

        let labels = Some(vec!["North".to_string()]);
        let set = ChartSet {
            charts: vec![
                ChartSpec::new(ZONE_CONSUMPTION, "Consumption", ChartKind::Doughnut, labels.clone())
                    .dataset(Dataset::new("Consumption", Some(vec![3.0]), "#ffa532")),
                ChartSpec::new(CONSUMPTION_VS_NRW, "Consumption vs. NRW", ChartKind::HorizontalBar { stacked: true }, labels)
                    .dataset(Dataset::new("Consumption", Some(vec![3.0]), "#2c7db7")),
            ],
        };
        let sink = SvgFileSink::new(dir.path(), (400, 300));
        let env = Envelope::new(ReportFilter::monthly(2024, 3).unwrap(), set);

        let err = sink.run(futures::stream::iter([Ok(env)])).await.unwrap_err();

        assert!(matches!(err, PipelineError::Sink(msg) if msg.contains("zone-consumption.svg")));
        assert!(dir.path().join("consumption-vs-nrw.svg").is_file());
    }
}
