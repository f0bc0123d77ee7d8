use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::app::seed::seed_jobs;
use crate::domain::job::Job;
use crate::infra::cache::LocalCache;
use crate::infra::remote::RemoteJobsApi;

pub const DEFAULT_CACHE_KEY: &str = "jobs";

pub enum SourceOutcome {
    Loaded(Vec<Job>),
    /// Nothing to offer; the next source is tried.
    Unavailable(String),
}

/// One tier of the job list fallback chain. Returning `Err` aborts the
/// chain instead of moving on.
pub trait JobSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn load(&self) -> BoxFuture<'_, Result<SourceOutcome>>;
}

/// Full-list JSON snapshot kept under a single cache key.
#[derive(Clone)]
pub struct SnapshotCache {
    cache: Arc<dyn LocalCache>,
    key: String,
}

impl SnapshotCache {
    pub fn new(cache: Arc<dyn LocalCache>, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
        }
    }

    pub async fn read(&self) -> Result<Option<Vec<Job>>> {
        let Some(payload) = self.cache.get(&self.key).await? else {
            return Ok(None);
        };
        let jobs = serde_json::from_str::<Vec<Job>>(&payload)
            .with_context(|| format!("cached snapshot under {:?} is corrupt", self.key))?;
        // Other writers share this key; their counters are not trusted.
        Ok(Some(jobs.into_iter().map(Job::normalize).collect()))
    }

    pub async fn write(&self, jobs: &[Job]) -> Result<()> {
        let payload = serde_json::to_string(jobs)?;
        self.cache.set(&self.key, payload).await?;
        debug!(key = %self.key, jobs = jobs.len(), "job snapshot written");
        Ok(())
    }
}

pub struct RemoteSource {
    api: Option<RemoteJobsApi>,
}

impl RemoteSource {
    pub fn new(api: Option<RemoteJobsApi>) -> Self {
        Self { api }
    }
}

impl JobSource for RemoteSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn load(&self) -> BoxFuture<'_, Result<SourceOutcome>> {
        Box::pin(async move {
            let Some(api) = &self.api else {
                return Ok(SourceOutcome::Unavailable(
                    "no remote endpoint configured".into(),
                ));
            };

            match api.fetch_jobs().await {
                Ok(records) => Ok(SourceOutcome::Loaded(
                    records.into_iter().map(Job::from).collect(),
                )),
                Err(err) => {
                    warn!(error = ?err, url = %api.url(), "remote job fetch failed");
                    Ok(SourceOutcome::Unavailable(err.to_string()))
                }
            }
        })
    }
}

pub struct CacheSource {
    snapshot: SnapshotCache,
}

impl CacheSource {
    pub fn new(snapshot: SnapshotCache) -> Self {
        Self { snapshot }
    }
}

impl JobSource for CacheSource {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn load(&self) -> BoxFuture<'_, Result<SourceOutcome>> {
        Box::pin(async move {
            Ok(match self.snapshot.read().await? {
                Some(jobs) => SourceOutcome::Loaded(jobs),
                None => SourceOutcome::Unavailable("no cached snapshot".into()),
            })
        })
    }
}

pub struct SeedSource;

impl JobSource for SeedSource {
    fn name(&self) -> &'static str {
        "seed"
    }

    fn load(&self) -> BoxFuture<'_, Result<SourceOutcome>> {
        Box::pin(async move { Ok(SourceOutcome::Loaded(seed_jobs())) })
    }
}

pub struct Loaded {
    pub source: &'static str,
    pub jobs: Vec<Job>,
}

/// Ordered list of sources; the first one that loads wins.
pub struct SourceChain {
    sources: Vec<Box<dyn JobSource>>,
}

impl SourceChain {
    pub fn new(sources: Vec<Box<dyn JobSource>>) -> Self {
        Self { sources }
    }

    /// Remote, then cached snapshot, then seed data.
    pub fn standard(remote: Option<RemoteJobsApi>, snapshot: SnapshotCache) -> Self {
        Self::new(vec![
            Box::new(RemoteSource::new(remote)),
            Box::new(CacheSource::new(snapshot)),
            Box::new(SeedSource),
        ])
    }

    pub async fn load(&self) -> Result<Loaded> {
        for source in &self.sources {
            let outcome = source
                .load()
                .await
                .with_context(|| format!("{} source failed", source.name()))?;

            match outcome {
                SourceOutcome::Loaded(jobs) => {
                    debug!(source = source.name(), jobs = jobs.len(), "job list loaded");
                    return Ok(Loaded {
                        source: source.name(),
                        jobs,
                    });
                }
                SourceOutcome::Unavailable(reason) => {
                    debug!(source = source.name(), reason = %reason, "job source unavailable");
                }
            }
        }

        Err(anyhow!("no job source available"))
    }
}
