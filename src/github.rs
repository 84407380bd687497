// dskt-check/src/github.rs

use anyhow::Result;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

const API_BASE: &str = "https://api.github.com";
const RAW_BASE: &str = "https://raw.githubusercontent.com";

/// Why a manifest fetch on one branch failed. The resolver treats these very
/// differently: only `NotFound` advances to the next candidate branch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("dskt.json not found on this branch")]
    NotFound,
    #[error("dskt.json is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
}

/// Unauthenticated client for the GitHub REST API and the raw-content host.
/// A `GITHUB_TOKEN`, when present, is attached to API calls only (rate
/// limits); raw fetches never need one.
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    raw_base: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: Self::http()?,
            api_base: API_BASE.into(),
            raw_base: RAW_BASE.into(),
            token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
        })
    }

    /// Point both hosts somewhere else. Test hook.
    pub fn with_endpoints(api_base: impl Into<String>, raw_base: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: Self::http()?,
            api_base: api_base.into(),
            raw_base: raw_base.into(),
            token: None,
        })
    }

    fn http() -> Result<reqwest::Client> {
        // GitHub rejects requests without a User-Agent.
        let client = reqwest::Client::builder()
            .user_agent(concat!("dskt-check/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }

    /// Look up the repository's configured default branch via
    /// `GET /repos/<owner>/<name>`. Any failure here (transport, bad status,
    /// bad body) degrades to `None` so the caller falls back to the fixed
    /// branch list instead of aborting.
    pub async fn default_branch(&self, repo: &crate::registry::RepoRef) -> Option<String> {
        let url = format!("{}/repos/{}/{}", self.api_base, repo.owner, repo.name);
        let mut req = self.http.get(&url).header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(err) => {
                debug!(%repo, %err, "default-branch lookup failed, using fallback list");
                return None;
            }
        };
        if !resp.status().is_success() {
            debug!(%repo, status = %resp.status(), "default-branch lookup not usable");
            return None;
        }
        let body: serde_json::Value = match resp.json().await {
            Ok(body) => body,
            Err(err) => {
                debug!(%repo, %err, "default-branch response was not JSON");
                return None;
            }
        };
        body.get("default_branch").and_then(|v| v.as_str()).map(str::to_owned)
    }

    /// Fetch `dskt.json` from one branch of the raw-content host.
    pub async fn fetch_manifest(
        &self,
        repo: &crate::registry::RepoRef,
        branch: &str,
    ) -> Result<serde_json::Value, FetchError> {
        let url = format!("{}/{}/{}/{}/dskt.json", self.raw_base, repo.owner, repo.name, branch);
        let resp = self.http.get(&url).send().await.map_err(FetchError::Transport)?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        let resp = resp.error_for_status().map_err(FetchError::Transport)?;
        let text = resp.text().await.map_err(FetchError::Transport)?;
        serde_json::from_str(&text).map_err(FetchError::Parse)
    }
}
