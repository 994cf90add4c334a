use report_client::{ApiError, HoursAgoConsumption, ReportApi, ReportFilter, ZoneReport};

use crate::pipeline::{Envelope, PipelineError, Source};

/// Fetches one report from the dashboard API per filter.
#[derive(Debug, Clone)]
pub struct HttpReportSource {
    api: ReportApi,
}

impl HttpReportSource {
    pub fn new(api: ReportApi) -> Self {
        Self { api }
    }
}

fn fetched<T>(filter: ReportFilter, result: Result<T, ApiError>) -> Result<Envelope<T>, PipelineError> {
    metrics::counter!("report_fetch_total").increment(1);
    match result {
        Ok(payload) => {
            tracing::debug!(%filter, "report fetched");
            Ok(Envelope::new(filter, payload))
        }
        Err(e) => {
            metrics::counter!("report_fetch_failed_total").increment(1);
            tracing::error!(error = %e, %filter, "report fetch failed");
            Err(PipelineError::Source(e.to_string()))
        }
    }
}

#[async_trait::async_trait]
impl Source<ZoneReport> for HttpReportSource {
    async fn fetch(&self, filter: ReportFilter) -> Result<Envelope<ZoneReport>, PipelineError> {
        fetched(filter, self.api.zone_report(&filter).await)
    }
}

#[async_trait::async_trait]
impl Source<HoursAgoConsumption> for HttpReportSource {
    async fn fetch(&self, filter: ReportFilter) -> Result<Envelope<HoursAgoConsumption>, PipelineError> {
        let result = match filter {
            ReportFilter::HoursAgo { hours } => self.api.consumption_hours_ago(hours).await,
            other => Err(ApiError::WrongFilter(other)),
        };
        fetched(filter, result)
    }
}
