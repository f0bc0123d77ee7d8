use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

use crate::domain::job::RemoteJob;

/// Client for the marketplace's read-only job list endpoint.
#[derive(Clone)]
pub struct RemoteJobsApi {
    client: reqwest::Client,
    url: Url,
}

impl RemoteJobsApi {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::ClientBuilder::new().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn fetch_jobs(&self) -> Result<Vec<RemoteJob>> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.url))?
            .error_for_status()?;

        let jobs = response
            .json::<Vec<RemoteJob>>()
            .await
            .context("remote job list is not valid JSON")?;
        Ok(jobs)
    }
}
