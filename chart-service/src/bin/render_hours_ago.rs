use anyhow::Result;
use chart_service::{
    charts::ChartSet,
    config::AppConfig,
    observability,
    pipeline::Pipeline,
    sinks::SvgFileSink,
    sources::ReportSource,
    transform::HoursAgoChart,
};
use report_client::{HoursAgoConsumption, ReportFilter};
use std::{env, sync::Arc};

/// usage: render_hours_ago [hours] [saved_report.json]
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    let cfg = AppConfig::load()?;

    let hours = match args.get(1) {
        Some(hours) => hours.parse()?,
        None => cfg.display.hours_ago,
    };
    let source = ReportSource::new(&cfg.api, args.get(2).map(String::as_str))?;

    let pipeline: Pipeline<_, HoursAgoConsumption, ChartSet, _> = Pipeline {
        source,
        transform: Arc::new(HoursAgoChart),
        sink: SvgFileSink::new(&cfg.render.output_dir, cfg.render.size()),
    };

    pipeline
        .run(futures::stream::iter([ReportFilter::HoursAgo { hours }]))
        .await?;

    Ok(())
}
