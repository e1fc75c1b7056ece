/// Concurrent per-item metadata enrichment
///
/// Every selected candidate gets its own lookup against the secondary
/// metadata source, all issued at once. Each call carries its own timeout and
/// fails alone: an error, timeout, or panic in one lookup degrades that slot
/// to empty fields and never touches its neighbors or the request.
use crate::{models::EnrichedFields, services::providers::MetadataProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

pub struct MetadataEnricher {
    provider: Arc<dyn MetadataProvider>,
    timeout: Duration,
    cancel_on_disconnect: bool,
}

impl MetadataEnricher {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        timeout: Duration,
        cancel_on_disconnect: bool,
    ) -> Self {
        Self {
            provider,
            timeout,
            cancel_on_disconnect,
        }
    }

    /// Enrich all `titles` concurrently.
    ///
    /// The result is aligned with the input by slot index - completion order
    /// never matters. Waits for every lookup to settle before returning.
    pub async fn enrich_batch(&self, titles: &[String]) -> Vec<EnrichedFields> {
        if self.cancel_on_disconnect {
            self.enrich_cancellable(titles).await
        } else {
            self.enrich_detached(titles).await
        }
    }

    async fn lookup_one(
        provider: Arc<dyn MetadataProvider>,
        timeout: Duration,
        title: String,
    ) -> EnrichedFields {
        match tokio::time::timeout(timeout, provider.lookup(&title)).await {
            Ok(Ok(fields)) => fields,
            Ok(Err(e)) => {
                tracing::warn!(title = %title, error = %e, "Metadata lookup failed");
                EnrichedFields::default()
            }
            Err(_) => {
                tracing::warn!(title = %title, timeout_secs = timeout.as_secs(), "Metadata lookup timed out");
                EnrichedFields::default()
            }
        }
    }

    /// Detached fan-out: spawned lookups are not tied to the request future,
    /// so a client disconnect leaves them running to completion.
    async fn enrich_detached(&self, titles: &[String]) -> Vec<EnrichedFields> {
        let mut tasks = Vec::with_capacity(titles.len());

        for title in titles {
            let provider = Arc::clone(&self.provider);
            let timeout = self.timeout;
            let title = title.clone();
            tasks.push(tokio::spawn(Self::lookup_one(provider, timeout, title)));
        }

        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            results.push(task.await.unwrap_or_default());
        }
        results
    }

    /// JoinSet fan-out: dropping the request future aborts whatever is still
    /// in flight.
    async fn enrich_cancellable(&self, titles: &[String]) -> Vec<EnrichedFields> {
        let mut set = JoinSet::new();

        for (slot, title) in titles.iter().enumerate() {
            let provider = Arc::clone(&self.provider);
            let timeout = self.timeout;
            let title = title.clone();
            set.spawn(async move { (slot, Self::lookup_one(provider, timeout, title).await) });
        }

        let mut results = vec![EnrichedFields::default(); titles.len()];
        while let Some(joined) = set.join_next().await {
            if let Ok((slot, fields)) = joined {
                results[slot] = fields;
            }
        }
        results
    }
}
