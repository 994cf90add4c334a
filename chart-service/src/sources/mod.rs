pub mod http_report;
pub mod report_json_file;

pub use http_report::HttpReportSource;
pub use report_json_file::ReportJsonFileSource;

use report_client::{ApiError, ReportApi, ReportFilter};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::pipeline::{Envelope, PipelineError, Source};

/// The live API, or a saved response when one is given on the command line.
pub enum ReportSource {
    Http(HttpReportSource),
    File(ReportJsonFileSource),
}

impl ReportSource {
    pub fn new(api: &ApiConfig, saved_response: Option<&str>) -> Result<Self, ApiError> {
        Ok(match saved_response {
            Some(path) => Self::File(ReportJsonFileSource::new(path)),
            None => Self::Http(HttpReportSource::new(ReportApi::new(
                &api.base_url,
                api.timeout(),
                api.auth_bearer_token.clone(),
            )?)),
        })
    }
}

#[async_trait::async_trait]
impl<T> Source<T> for ReportSource
where
    T: DeserializeOwned + Send + 'static,
    HttpReportSource: Source<T>,
{
    async fn fetch(&self, filter: ReportFilter) -> Result<Envelope<T>, PipelineError> {
        match self {
            Self::Http(s) => Source::<T>::fetch(s, filter).await,
            Self::File(s) => Source::<T>::fetch(s, filter).await,
        }
    }
}
