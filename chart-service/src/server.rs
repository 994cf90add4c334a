//! Chart server: one upstream fetch per chart request.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use report_client::{HoursAgoConsumption, ReportFilter, ZoneReport};
use serde::Deserialize;
use time::UtcOffset;

use crate::charts::{
    render_svg, ChartSet, RenderOutcome, CONSUMPTION_HOURS_AGO, CONSUMPTION_VS_NRW, WEEKLY_CONSUMPTION,
    YESTERDAY_AVERAGE, ZONE_CONSUMPTION, ZONE_LEAKS,
};
use crate::pipeline::{Source, Transform};
use crate::transform::{timezone, HoursAgoChart, ZoneCharts};

pub const DAILY_CHARTS: [&str; 3] = [ZONE_CONSUMPTION, WEEKLY_CONSUMPTION, YESTERDAY_AVERAGE];
pub const MONTHLY_CHARTS: [&str; 3] = [ZONE_CONSUMPTION, ZONE_LEAKS, CONSUMPTION_VS_NRW];

#[derive(Clone)]
pub struct AppState {
    pub zone_source: Arc<dyn Source<ZoneReport>>,
    pub hours_source: Arc<dyn Source<HoursAgoConsumption>>,
    pub zone_charts: ZoneCharts,
    pub size: (u32, u32),
    pub default_hours: u32,
    pub server_offset: UtcOffset,
    pub viewer_offset: UtcOffset,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/charts/daily/:chart", get(daily_chart))
        .route("/charts/monthly/:chart", get(monthly_chart))
        .route("/charts/consumption-hours-ago", get(hours_ago_chart))
        .route("/timezone", get(timezone_message))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct DailyQuery {
    year: i32,
    month: u8,
    day: u8,
}

#[derive(Debug, Deserialize)]
struct MonthlyQuery {
    year: i32,
    month: u8,
}

#[derive(Debug, Deserialize)]
struct HoursQuery {
    hours: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TimezoneQuery {
    /// Viewer's offset east of UTC in minutes; the service's own offset when absent.
    utc_offset_minutes: Option<i32>,
}

async fn daily_chart(
    State(state): State<AppState>,
    Path(chart): Path<String>,
    Query(query): Query<DailyQuery>,
) -> Result<Response, StatusCode> {
    if !DAILY_CHARTS.contains(&chart.as_str()) {
        return Err(StatusCode::NOT_FOUND);
    }
    let filter = ReportFilter::daily(query.year, query.month, query.day).map_err(|e| {
        tracing::warn!(error = %e, ?query, "invalid daily report date");
        StatusCode::BAD_REQUEST
    })?;

    chart_response(state.zone_source.as_ref(), &state.zone_charts, filter, &chart, state.size).await
}

async fn monthly_chart(
    State(state): State<AppState>,
    Path(chart): Path<String>,
    Query(query): Query<MonthlyQuery>,
) -> Result<Response, StatusCode> {
    if !MONTHLY_CHARTS.contains(&chart.as_str()) {
        return Err(StatusCode::NOT_FOUND);
    }
    let filter = ReportFilter::monthly(query.year, query.month).map_err(|e| {
        tracing::warn!(error = %e, ?query, "invalid monthly report date");
        StatusCode::BAD_REQUEST
    })?;

    chart_response(state.zone_source.as_ref(), &state.zone_charts, filter, &chart, state.size).await
}

async fn hours_ago_chart(
    State(state): State<AppState>,
    Query(query): Query<HoursQuery>,
) -> Result<Response, StatusCode> {
    let filter = ReportFilter::HoursAgo {
        hours: query.hours.unwrap_or(state.default_hours),
    };
    chart_response(state.hours_source.as_ref(), &HoursAgoChart, filter, CONSUMPTION_HOURS_AGO, state.size).await
}

async fn timezone_message(
    State(state): State<AppState>,
    Query(query): Query<TimezoneQuery>,
) -> Result<Response, StatusCode> {
    let viewer = match query.utc_offset_minutes {
        Some(minutes) => minutes
            .checked_mul(60)
            .and_then(|seconds| UtcOffset::from_whole_seconds(seconds).ok())
            .ok_or(StatusCode::BAD_REQUEST)?,
        None => state.viewer_offset,
    };

    Ok(match timezone::offset_message(state.server_offset, viewer) {
        Some(message) => message.into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// Fetch the snapshot for `filter`, build its charts and draw the one named.
async fn chart_response<T>(
    source: &dyn Source<T>,
    transform: &dyn Transform<T, ChartSet>,
    filter: ReportFilter,
    chart: &str,
    size: (u32, u32),
) -> Result<Response, StatusCode>
where
    T: Send + 'static,
{
    let snapshot = source.fetch(filter).await.map_err(|e| {
        tracing::warn!(error = %e, %filter, chart, "upstream report unavailable");
        StatusCode::BAD_GATEWAY
    })?;
    let charts = transform.apply(snapshot).await.map_err(|e| {
        tracing::error!(error = %e, %filter, chart, "chart transform failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let spec = charts.payload.find(chart).ok_or(StatusCode::NOT_FOUND)?;

    match render_svg(spec, size) {
        Ok(RenderOutcome::Drawn(svg)) => Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response()),
        Ok(RenderOutcome::Skipped) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(e) => {
            tracing::error!(error = %e, %filter, "chart rendering failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
