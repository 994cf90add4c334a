use anyhow::{bail, Result};
use chart_service::{
    charts::ChartSet,
    config::AppConfig,
    observability,
    pipeline::Pipeline,
    sinks::SvgFileSink,
    sources::ReportSource,
    transform::ZoneCharts,
};
use report_client::{ReportFilter, ZoneReport};
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        bail!("usage: render_monthly <year> <month> [saved_report.json]");
    }
    let filter = ReportFilter::monthly(args[1].parse()?, args[2].parse()?)?;

    let cfg = AppConfig::load()?;
    let source = ReportSource::new(&cfg.api, args.get(3).map(String::as_str))?;

    let pipeline: Pipeline<_, ZoneReport, ChartSet, _> = Pipeline {
        source,
        transform: Arc::new(ZoneCharts {
            options: cfg.render.chart_options(),
        }),
        sink: SvgFileSink::new(&cfg.render.output_dir, cfg.render.size()),
    };

    pipeline.run(futures::stream::iter([filter])).await?;

    Ok(())
}
