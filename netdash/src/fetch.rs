//! Minimal HTTP client for pulling the task list from the server.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, warn};
use url::Url;

use crate::types::Record;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid server url '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// The CA file could not be read or holds no usable certificate.
    #[error("cannot use CA certificate {path}: {source}")]
    Tls {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("response is not a task list: {0}")]
    Decode(#[from] serde_json::Error),
}

const PEM_CERT_TAG: &[u8] = b"-----BEGIN CERTIFICATE-----";

/// Where and how to ask for tasks.
#[derive(Debug, Clone)]
pub struct TaskSource {
    base: Url,
    alerts_only: bool,
    agent_target: Option<(String, String)>,
    tls_ca: Option<PathBuf>,
}

impl TaskSource {
    /// `base` is the server root, e.g. `http://127.0.0.1:8000`. A missing
    /// scheme means plain http.
    pub fn new(base: &str) -> Result<Self, FetchError> {
        let raw = if base.contains("://") {
            base.to_string()
        } else {
            format!("http://{base}")
        };
        let base = Url::parse(&raw).map_err(|source| FetchError::Url {
            url: base.to_string(),
            source,
        })?;
        Ok(Self {
            base,
            alerts_only: false,
            agent_target: None,
            tls_ca: None,
        })
    }

    pub fn alerts_only(mut self, on: bool) -> Self {
        self.alerts_only = on;
        self
    }

    /// The server only narrows by agent when a target is given too.
    pub fn agent_target(mut self, agent: impl Into<String>, target: impl Into<String>) -> Self {
        self.agent_target = Some((agent.into(), target.into()));
        self
    }

    pub fn tls_ca(mut self, path: Option<impl AsRef<Path>>) -> Self {
        self.tls_ca = path.map(|p| p.as_ref().to_path_buf());
        self
    }

    pub fn tasks_url(&self) -> Result<Url, FetchError> {
        let mut url = self.base.join("/tasks").map_err(|source| FetchError::Url {
            url: self.base.to_string(),
            source,
        })?;
        {
            let mut q = url.query_pairs_mut();
            if self.alerts_only {
                q.append_pair("alerts_only", "true");
            }
            if let Some((agent, target)) = &self.agent_target {
                q.append_pair("agent", agent);
                q.append_pair("target", target);
            }
        }
        // query_pairs_mut leaves a bare '?' behind when nothing was appended
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    fn client(&self) -> Result<reqwest::Client, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(path) = &self.tls_ca {
            let tls = |source: Box<dyn std::error::Error + Send + Sync>| FetchError::Tls {
                path: path.clone(),
                source,
            };
            let pem = std::fs::read(path).map_err(|e| tls(e.into()))?;
            // reqwest defers PEM parsing to build time, where an empty bundle
            // would pass silently
            if !pem.windows(PEM_CERT_TAG.len()).any(|w| w == PEM_CERT_TAG) {
                return Err(tls("no PEM certificate found".into()));
            }
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| tls(e.into()))?;
            builder = builder.add_root_certificate(cert);
        }
        Ok(builder.build()?)
    }
}

/// GET the task list and decode it. The status code is not checked: whatever
/// body comes back must be a JSON array. Elements that are not records at all
/// (e.g. a bare number) are skipped with a warning; the rest are kept.
pub async fn try_fetch_tasks(src: &TaskSource) -> Result<Vec<Record>, FetchError> {
    let url = src.tasks_url()?;
    debug!(%url, "fetching tasks");
    let resp = src.client()?.get(url).send().await?;
    let body = resp.bytes().await?;
    let items = serde_json::from_slice::<Vec<serde_json::Value>>(&body)?;
    let records: Vec<Record> = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, v)| match serde_json::from_value(v) {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(index = i, "skipping task entry: {e}");
                None
            }
        })
        .collect();
    debug!(count = records.len(), "tasks received");
    Ok(records)
}

/// Like `try_fetch_tasks`, but any failure is logged and yields no records.
pub async fn fetch_tasks(src: &TaskSource) -> Vec<Record> {
    match try_fetch_tasks(src).await {
        Ok(records) => records,
        Err(e) => {
            error!("Error fetching tasks: {e}");
            Vec::new()
        }
    }
}
