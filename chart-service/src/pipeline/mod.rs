use std::{sync::Arc, time::SystemTime};

use futures::{Stream, StreamExt};
use report_client::ReportFilter;

/// One fetched snapshot and the filter it was fetched with.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub payload: T,
    pub filter: ReportFilter,
    pub received_at: SystemTime,
}

impl<T> Envelope<T> {
    pub fn new(filter: ReportFilter, payload: T) -> Self {
        Self {
            payload,
            filter,
            received_at: SystemTime::now(),
        }
    }

    /// Replace the payload, keeping filter and receive time.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            payload: f(self.payload),
            filter: self.filter,
            received_at: self.received_at,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("source error: {0}")]
    Source(String),
    #[error("transform error: {0}")]
    Transform(String),
    #[error("sink error: {0}")]
    Sink(String),
}

#[async_trait::async_trait]
pub trait Source<T>: Send + Sync {
    async fn fetch(&self, filter: ReportFilter) -> Result<Envelope<T>, PipelineError>;
}

#[async_trait::async_trait]
pub trait Transform<I, O>: Send + Sync {
    async fn apply(&self, input: Envelope<I>) -> Result<Envelope<O>, PipelineError>;
}

#[async_trait::async_trait]
pub trait Sink<T>: Send + Sync {
    async fn run<S>(&self, input: S) -> Result<(), PipelineError>
    where
        S: Stream<Item = Result<Envelope<T>, PipelineError>> + Send + Unpin + 'static;
}

pub struct Pipeline<S, I, O, K> {
    pub source: S,
    pub transform: Arc<dyn Transform<I, O>>,
    pub sink: K,
}

impl<S, I, O, K> Pipeline<S, I, O, K>
where
    I: Send + 'static,
    O: Send + 'static,
    S: Source<I> + 'static,
    K: Sink<O> + 'static,
{
    /// Fetch and transform one snapshot per filter. Filters are handled one at
    /// a time in arrival order, so the sink never sees an older snapshot after
    /// a newer one.
    pub async fn run<F>(self, filters: F) -> Result<(), PipelineError>
    where
        F: Stream<Item = ReportFilter> + Send + 'static,
    {
        let source = Arc::new(self.source);
        let transform = self.transform;

        let stream = filters.then(move |filter| {
            let source = source.clone();
            let transform = transform.clone();
            async move {
                let env = source.fetch(filter).await?;
                transform.apply(env).await
            }
        });

        self.sink.run(Box::pin(stream)).await
    }
}
