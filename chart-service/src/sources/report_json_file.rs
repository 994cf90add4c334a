use std::path::PathBuf;

use report_client::ReportFilter;
use serde::de::DeserializeOwned;

use crate::pipeline::{Envelope, PipelineError, Source};

/// A saved API response read from disk on every fetch.
///
/// The file is served as-is whatever the filter; the filter is only stamped
/// on the envelope so downstream transforms know which page to build.
#[derive(Debug, Clone)]
pub struct ReportJsonFileSource {
    path: PathBuf,
}

impl ReportJsonFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl<T> Source<T> for ReportJsonFileSource
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, filter: ReportFilter) -> Result<Envelope<T>, PipelineError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|e| PipelineError::Source(format!("failed to read {}: {e}", self.path.display())))?;
        let payload = serde_json::from_slice(&raw)
            .map_err(|e| PipelineError::Source(format!("invalid report in {}: {e}", self.path.display())))?;

        tracing::debug!(path = %self.path.display(), %filter, "report loaded from file");
        Ok(Envelope::new(filter, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_client::ZoneReport;
    use std::io::Write;

    #[tokio::test]
    async fn reads_saved_report() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"zoneMetaData": {{"b": {{"name": "B"}}, "a": {{"name": "A"}}}}, "zoneStats": {{}}}}"#
        )
        .unwrap();

        let source = ReportJsonFileSource::new(file.path());
        let filter = ReportFilter::monthly(2023, 12).unwrap();
        let env = Source::<ZoneReport>::fetch(&source, filter).await.unwrap();

        assert_eq!(env.filter, filter);
        let names: Vec<_> = env.payload.zone_meta_data.unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn missing_or_malformed_file_is_a_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = ReportJsonFileSource::new(dir.path().join("missing.json"));
        let filter = ReportFilter::HoursAgo { hours: 24 };
        assert!(matches!(
            Source::<ZoneReport>::fetch(&source, filter).await,
            Err(PipelineError::Source(_))
        ));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let source = ReportJsonFileSource::new(path);
        assert!(Source::<ZoneReport>::fetch(&source, filter).await.is_err());
    }
}
