use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::domain::{HoursAgoConsumption, ReportFilter, ZoneReport};

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: reqwest::StatusCode },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("filter {0} does not match the requested report")]
    WrongFilter(ReportFilter),
}

/// Thin GET wrapper over the dashboard report endpoints.
#[derive(Debug, Clone)]
pub struct ReportApi {
    client: reqwest::Client,
    base_url: String,
    auth_bearer_token: Option<String>,
}

impl ReportApi {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        auth_bearer_token: Option<String>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Request {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_bearer_token,
        })
    }

    pub fn url_for(&self, filter: &ReportFilter) -> String {
        format!("{}{}", self.base_url, filter.path())
    }

    /// Zone stats for a daily or monthly filter. Daily reports carry seven
    /// per-day records per zone ending on the filter date; monthly reports one
    /// flat record per zone.
    pub async fn zone_report(&self, filter: &ReportFilter) -> Result<ZoneReport, ApiError> {
        match filter {
            ReportFilter::Daily(_) | ReportFilter::Monthly { .. } => self.get_json(filter).await,
            ReportFilter::HoursAgo { .. } => Err(ApiError::WrongFilter(*filter)),
        }
    }

    pub async fn consumption_hours_ago(&self, hours: u32) -> Result<HoursAgoConsumption, ApiError> {
        self.get_json(&ReportFilter::HoursAgo { hours }).await
    }

    async fn get_json<T: DeserializeOwned>(&self, filter: &ReportFilter) -> Result<T, ApiError> {
        let url = self.url_for(filter);

        let mut request = self.client.get(&url).query(&filter.query());
        if let Some(token) = &self.auth_bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| ApiError::Request {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }
}
