use super::RepoSpec;
use super::client::{Artifact, Client};
use super::extract::extract_archive;
use super::path_utils::sanitize_path_component;
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, TimeDelta, Utc};
use ohno::{AppError, EnrichableExt, IntoAppError};

const LOG_TARGET: &str = "  download";

/// Which artifacts to fetch and where to put them.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub raw_dir: Utf8PathBuf,

    /// Only artifacts whose name contains this marker are fetched.
    pub marker: String,

    /// Only artifacts created within this many days before `now` are fetched.
    pub lookback_days: u32,

    pub now: DateTime<Utc>,
}

impl DownloadOptions {
    /// Artifacts created before this instant are out of the lookback window.
    #[must_use]
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.now - TimeDelta::days(i64::from(self.lookback_days))
    }
}

/// Results of one download run.
#[derive(Debug, Default)]
pub struct DownloadReport {
    /// Number of artifacts listed for the repository.
    pub listed: usize,

    /// Directories that received a freshly extracted artifact.
    pub downloaded: Vec<Utf8PathBuf>,

    /// Artifacts that could not be downloaded or extracted.
    pub failed: Vec<(String, AppError)>,
}

impl DownloadReport {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Keep artifacts carrying `marker` that are unexpired and recent enough.
///
/// Artifacts without a creation time are kept.
#[must_use]
pub fn select_artifacts<'a>(artifacts: &'a [Artifact], marker: &str, cutoff: DateTime<Utc>) -> Vec<&'a Artifact> {
    artifacts
        .iter()
        .filter(|a| a.name.contains(marker))
        .filter(|a| !a.expired)
        .filter(|a| a.created_at.is_none_or(|created| created >= cutoff))
        .collect()
}

/// Directory under the ingestion root that receives one artifact.
///
/// The artifact id keeps successive uploads under the same name apart.
#[must_use]
pub fn artifact_dir_name(artifact: &Artifact) -> String {
    format!("{}-{}", sanitize_path_component(&artifact.name), artifact.id)
}

/// List, filter, download and extract the metric artifacts of `repo`.
///
/// A listing failure aborts the run. A failure on one artifact is logged and
/// recorded, and the remaining artifacts are still processed.
pub async fn download_artifacts(client: &Client, repo: &RepoSpec, options: &DownloadOptions) -> Result<DownloadReport> {
    let artifacts = client.list_artifacts(repo).await?;
    let selected = select_artifacts(&artifacts, &options.marker, options.cutoff());

    log::info!(
        target: LOG_TARGET,
        "Found {} artifacts for '{repo}', {} match '{}' within {} days",
        artifacts.len(),
        selected.len(),
        options.marker,
        options.lookback_days
    );

    let mut report = DownloadReport {
        listed: artifacts.len(),
        ..DownloadReport::default()
    };

    for artifact in selected {
        match fetch_one(client, artifact, &options.raw_dir).await {
            Ok(dir) => {
                log::info!(target: LOG_TARGET, "Downloaded '{}' to '{dir}'", artifact.name);
                report.downloaded.push(dir);
            }
            Err(e) => {
                log::error!(target: LOG_TARGET, "Unable to download '{}': {e:#}", artifact.name);
                report.failed.push((artifact.name.clone(), e));
            }
        }
    }

    Ok(report)
}

async fn fetch_one(client: &Client, artifact: &Artifact, raw_dir: &Utf8Path) -> Result<Utf8PathBuf> {
    let archive = client.download(artifact).await?;

    let parent = raw_dir.to_path_buf();
    let dir_name = artifact_dir_name(artifact);
    let extracted = tokio::task::spawn_blocking(move || extract_archive(&archive, &parent, &dir_name))
        .await
        .into_app_err("extraction task failed")?;

    match extracted {
        Ok(dir) => Ok(dir),
        Err(e) => Err(e.enrich_with(|| format!("extracting artifact '{}'", artifact.name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(id: u64, name: &str, expired: bool, created_at: Option<&str>) -> Artifact {
        Artifact {
            id,
            name: name.to_string(),
            archive_download_url: format!("http://localhost/{id}"),
            expired,
            created_at: created_at.map(|s| s.parse().unwrap()),
            size_in_bytes: 0,
        }
    }

    fn now() -> DateTime<Utc> {
        "2024-04-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_cutoff() {
        let options = DownloadOptions {
            raw_dir: Utf8PathBuf::from("metrics/raw"),
            marker: "dora-metrics".to_string(),
            lookback_days: 90,
            now: now(),
        };
        assert_eq!(options.cutoff().to_rfc3339(), "2024-01-02T00:00:00+00:00");
    }

    #[test]
    fn test_select_artifacts() {
        let cutoff: DateTime<Utc> = "2024-01-02T00:00:00Z".parse().unwrap();
        let artifacts = vec![
            artifact(1, "dora-metrics-api", false, Some("2024-03-01T00:00:00Z")),
            artifact(2, "coverage-report", false, Some("2024-03-01T00:00:00Z")),
            artifact(3, "dora-metrics-web", true, Some("2024-03-01T00:00:00Z")),
            artifact(4, "dora-metrics-old", false, Some("2023-12-31T23:59:59Z")),
            artifact(5, "dora-metrics-edge", false, Some("2024-01-02T00:00:00Z")),
            artifact(6, "dora-metrics-undated", false, None),
        ];

        let ids: Vec<u64> = select_artifacts(&artifacts, "dora-metrics", cutoff).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 5, 6]);
    }

    #[test]
    fn test_artifact_dir_name() {
        assert_eq!(artifact_dir_name(&artifact(42, "dora-metrics", false, None)), "dora-metrics-42");
        assert_eq!(artifact_dir_name(&artifact(7, "../evil", false, None)), "___evil-7");
    }
}
