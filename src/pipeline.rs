use std::future::Future;
use std::time::Duration;

use anyhow::bail;

use crate::catalogue;
use crate::config::DataPaths;
use crate::models::{Clock, SummaryStats};
use crate::store;
use crate::timeline;

/// Extra attempts per stage and the pause between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 1,
            delay: Duration::from_secs(5 * 60),
        }
    }
}

pub fn produce(paths: &DataPaths) -> anyhow::Result<usize> {
    let records = catalogue::catalogue()?;
    let path = paths.catalogue();
    store::write_atomic(&path, &store::catalogue_csv(&records)?)?;
    tracing::info!(
        records = records.len(),
        data_dir = %paths.dir().display(),
        "catalogue written"
    );
    Ok(records.len())
}

/// Nothing is written unless both outputs were computed.
pub fn enrich(paths: &DataPaths, clock: Clock) -> anyhow::Result<SummaryStats> {
    let input = paths.catalogue();
    if !input.exists() {
        bail!(
            "catalogue {} not found; run the producer first",
            input.display()
        );
    }

    let records = store::read_catalogue(&input)?;
    let enriched = timeline::enrich(&records, clock.today);
    let stats = timeline::summarize(&enriched, clock.computed_at);

    let table = store::enriched_csv(&enriched)?;
    let summary = store::summary_json(&stats)?;
    store::write_atomic(&paths.enriched(), &table)?;
    store::write_atomic(&paths.summary(), &summary)?;

    tracing::info!(
        today = %clock.today,
        total = stats.total,
        currently_open = stats.currently_open,
        upcoming_open = stats.upcoming_open,
        closed = stats.closed,
        "timeline processed"
    );
    Ok(stats)
}

/// Producer then Enricher, each with its own retry budget. The clock is
/// shared by every attempt.
pub async fn run(
    paths: &DataPaths,
    clock: Clock,
    policy: RetryPolicy,
) -> anyhow::Result<SummaryStats> {
    with_retries("produce", policy, move || async move { produce(paths) }).await?;
    with_retries("enrich", policy, move || async move { enrich(paths, clock) }).await
}

pub async fn with_retries<T, F, Fut>(
    stage: &str,
    policy: RetryPolicy,
    mut attempt: F,
) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut failures = 0u32;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if failures < policy.retries => {
                failures += 1;
                tracing::warn!(
                    stage,
                    attempt = failures,
                    delay_secs = policy.delay.as_secs(),
                    error = %format!("{err:#}"),
                    "stage failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(err) => {
                tracing::error!(stage, attempts = failures + 1, "stage failed");
                return Err(err.context(format!("{stage} stage failed")));
            }
        }
    }
}
