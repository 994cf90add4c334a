use anyhow::{Context, Result};
use chart_service::{
    config::AppConfig,
    metrics_server,
    observability,
    server::{self, AppState},
    sources::HttpReportSource,
    transform::{timezone, ZoneCharts},
};
use report_client::ReportApi;
use std::{net::SocketAddr, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let server_cfg = cfg
        .server
        .as_ref()
        .context("the [server] section is required to run the chart server")?;
    let addr: SocketAddr = server_cfg
        .http_bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.http_bind_addr: {e}"))?;

    let server_offset = timezone::parse_utc_offset(&cfg.display.server_utc_offset)
        .map_err(|e| anyhow::anyhow!("invalid display.server_utc_offset: {e}"))?;
    let viewer_offset = timezone::local_offset();
    if let Some(message) = timezone::offset_message(server_offset, viewer_offset) {
        tracing::info!("{message}");
    }

    let api = ReportApi::new(&cfg.api.base_url, cfg.api.timeout(), cfg.api.auth_bearer_token.clone())?;
    let source = Arc::new(HttpReportSource::new(api));

    let state = AppState {
        zone_source: source.clone(),
        hours_source: source,
        zone_charts: ZoneCharts {
            options: cfg.render.chart_options(),
        },
        size: cfg.render.size(),
        default_hours: cfg.display.hours_ago,
        server_offset,
        viewer_offset,
    };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, upstream = %cfg.api.base_url, "chart server listening");
    axum::serve(listener, server::router(state).into_make_service()).await?;

    Ok(())
}
