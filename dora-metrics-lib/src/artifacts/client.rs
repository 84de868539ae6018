//! GitHub Actions artifacts API client
//!
//! Minimal client for listing a repository's workflow artifacts and
//! downloading their zip archives.

use super::RepoSpec;
use crate::Result;
use chrono::{DateTime, Utc};
use ohno::{IntoAppError, app_err, bail};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;

const LOG_TARGET: &str = "    github";

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = "dora-metrics";
const PAGE_SIZE: usize = 100;
const MAX_PAGES: u32 = 100;

/// One workflow artifact, with only the fields we need.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Artifact {
    pub id: u64,
    pub name: String,
    pub archive_download_url: String,

    #[serde(default)]
    pub expired: bool,

    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub size_in_bytes: u64,
}

#[derive(Debug, Deserialize)]
struct ArtifactPage {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a client that authenticates every request with `token`.
    pub fn new(token: &str, base_url: impl Into<String>) -> Result<Self> {
        let mut auth_val = HeaderValue::from_str(&format!("token {token}")).into_app_err("invalid GitHub token")?;
        auth_val.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth_val);
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .into_app_err("unable to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List every artifact of `repo`, following pages until a short page is returned.
    ///
    /// Authentication failures (HTTP 401/403) are reported as errors like any
    /// other failure; callers abort on them.
    pub async fn list_artifacts(&self, repo: &RepoSpec) -> Result<Vec<Artifact>> {
        let mut artifacts = Vec::new();

        for page in 1..=MAX_PAGES {
            let url = format!(
                "{}/repos/{}/{}/actions/artifacts?per_page={PAGE_SIZE}&page={page}",
                self.base_url,
                repo.owner(),
                repo.repo()
            );

            log::debug!(target: LOG_TARGET, "Listing artifacts page {page} for '{repo}'");

            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .into_app_err_with(|| format!("unable to list artifacts for '{repo}'"))?;

            let status = resp.status();
            if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
                bail!("authentication failed while listing artifacts for '{repo}': HTTP {status}");
            }

            if !status.is_success() {
                bail!("unable to list artifacts for '{repo}': HTTP {status}");
            }

            let page_data: ArtifactPage = resp
                .json()
                .await
                .into_app_err_with(|| format!("unable to parse artifact list for '{repo}'"))?;

            let count = page_data.artifacts.len();
            artifacts.extend(page_data.artifacts);

            if count < PAGE_SIZE {
                log::debug!(target: LOG_TARGET, "Found {} artifacts for '{repo}'", artifacts.len());
                return Ok(artifacts);
            }
        }

        log::warn!(target: LOG_TARGET, "Stopped listing artifacts for '{repo}' after {MAX_PAGES} pages");
        Ok(artifacts)
    }

    /// Download the zip archive of one artifact into memory.
    pub async fn download(&self, artifact: &Artifact) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(&artifact.archive_download_url)
            .send()
            .await
            .into_app_err_with(|| format!("unable to download artifact '{}'", artifact.name))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(app_err!("unable to download artifact '{}': HTTP {status}", artifact.name));
        }

        let bytes = resp
            .bytes()
            .await
            .into_app_err_with(|| format!("unable to read archive of artifact '{}'", artifact.name))?;

        log::debug!(target: LOG_TARGET, "Downloaded {} bytes for artifact '{}'", bytes.len(), artifact.name);
        Ok(bytes.to_vec())
    }
}
