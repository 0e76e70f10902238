//! Client for running the extraction actor on the Apify platform

use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::Instant;

use crate::common::config::RemoteConfig;
use crate::common::{Error, Result};
use crate::testing::ActorSettings;

use super::types::{ActorRun, ApiErrorBody, ApiResponse, DatasetItem, RunInfo};

/// Longest server-side wait the API grants per request
const MAX_WAIT_PER_REQUEST_SECS: u64 = 60;

/// Slack added to the HTTP timeout on top of the server-side wait
const REQUEST_TIMEOUT_SLACK_SECS: u64 = 30;

/// Executes extraction jobs for the suite executor
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Submit a batch of URLs and wait for the run to finish
    ///
    /// Returns once the run reaches a terminal state or the wait ceiling
    /// elapses, whichever comes first.
    async fn submit(&self, urls: &[String], settings: &ActorSettings) -> Result<RunInfo>;

    /// Read every record of a result dataset
    async fn fetch_results(&self, dataset_id: &str) -> Result<Vec<DatasetItem>>;
}

/// Apify API client bound to one actor
pub struct ApifyClient {
    http: reqwest::Client,
    base_url: String,
    actor_id: String,
    token: String,
    wait: Duration,
}

impl ApifyClient {
    /// Create a client, reading the token from the configured environment variable
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let token = config
            .token()
            .ok_or_else(|| Error::MissingCredential(config.token_env.clone()))?;
        Self::with_token(config, token)
    }

    /// Create a client with an explicit token
    pub fn with_token(config: &RemoteConfig, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::MissingCredential(config.token_env.clone()));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("platform-test-runner/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            actor_id: config.actor_id.clone(),
            token,
            wait: Duration::from_secs(config.wait_secs),
        })
    }

    /// Start a run and return it after the first server-side wait
    async fn start_run(&self, input: &serde_json::Value, wait_secs: u64) -> Result<ActorRun> {
        let url = format!("{}/v2/acts/{}/runs", self.base_url, self.actor_id);
        tracing::debug!(%url, wait_secs, "Starting actor run");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .query(&[("waitForFinish", wait_secs)])
            .timeout(request_timeout(wait_secs))
            .json(input)
            .send()
            .await?;

        let envelope: ApiResponse<ActorRun> = parse_response(response).await?;
        Ok(envelope.data)
    }

    /// Fetch a run, letting the server hold the request until it finishes or `wait_secs` pass
    async fn get_run(&self, run_id: &str, wait_secs: u64) -> Result<ActorRun> {
        let url = format!("{}/v2/actor-runs/{}", self.base_url, run_id);
        tracing::debug!(%url, wait_secs, "Waiting for actor run");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("waitForFinish", wait_secs)])
            .timeout(request_timeout(wait_secs))
            .send()
            .await?;

        let envelope: ApiResponse<ActorRun> = parse_response(response).await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl JobRunner for ApifyClient {
    async fn submit(&self, urls: &[String], settings: &ActorSettings) -> Result<RunInfo> {
        let input = settings.to_actor_input(urls)?;
        let deadline = Instant::now() + self.wait;

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner} {msg} ({elapsed})") {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner.set_message(format!("Starting actor run with {} URL(s)...", urls.len()));

        let mut run = self
            .start_run(&input, remaining_wait(deadline))
            .await
            .inspect_err(|_| spinner.finish_and_clear())?;
        spinner.set_message(format!("Waiting for run {}", run.id));

        while !run.status.is_terminal() {
            let wait_secs = remaining_wait(deadline);
            if wait_secs == 0 {
                tracing::debug!(run_id = %run.id, status = %run.status, "Wait ceiling reached");
                break;
            }
            run = self
                .get_run(&run.id, wait_secs)
                .await
                .inspect_err(|_| spinner.finish_and_clear())?;
        }
        spinner.finish_and_clear();

        let dataset_id = run
            .default_dataset_id
            .ok_or_else(|| Error::NoDataset { run_id: run.id.clone() })?;

        tracing::info!(run_id = %run.id, status = %run.status, "Actor run completed");

        Ok(RunInfo {
            run_id: run.id,
            dataset_id,
            status: run.status,
        })
    }

    async fn fetch_results(&self, dataset_id: &str) -> Result<Vec<DatasetItem>> {
        let url = format!("{}/v2/datasets/{}/items", self.base_url, dataset_id);
        tracing::debug!(%url, "Fetching dataset items");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("format", "json")])
            .send()
            .await?;

        let records: Vec<serde_json::Value> = parse_response(response).await?;
        tracing::debug!(count = records.len(), "Fetched dataset items");
        Ok(records.into_iter().map(DatasetItem::from).collect())
    }
}

/// Seconds left before the deadline, capped at the per-request maximum
fn remaining_wait(deadline: Instant) -> u64 {
    deadline
        .saturating_duration_since(Instant::now())
        .as_secs()
        .min(MAX_WAIT_PER_REQUEST_SECS)
}

fn request_timeout(wait_secs: u64) -> Duration {
    Duration::from_secs(wait_secs + REQUEST_TIMEOUT_SLACK_SECS)
}

/// Decode a successful JSON body, or turn an error status into `Error::RemoteRequest`
async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(remote_error(status, &body))
}

fn remote_error(status: StatusCode, body: &str) -> Error {
    let message = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => match parsed.error.kind {
            Some(kind) => format!("{} ({})", parsed.error.message, kind),
            None => parsed.error.message,
        },
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        Err(_) => body.trim().to_string(),
    };

    Error::RemoteRequest {
        status: status.as_u16(),
        message,
    }
}
