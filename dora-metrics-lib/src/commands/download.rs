use super::Host;
use super::common::CommonArgs;
use crate::Result;
use crate::artifacts::{Client, DownloadOptions, RepoSpec, download_artifacts};
use camino::Utf8PathBuf;
use chrono::Utc;
use clap::Parser;
use ohno::{app_err, bail};
use std::io::Write;

#[derive(Parser, Debug)]
pub struct DownloadArgs {
    /// Repository to fetch artifacts from, as `owner/repo`
    #[arg(long, value_name = "OWNER/REPO", env = "GITHUB_REPOSITORY")]
    pub repository: Option<RepoSpec>,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Directory receiving the extracted artifacts
    #[arg(long, value_name = "PATH")]
    pub raw_dir: Option<Utf8PathBuf>,

    /// Only download artifacts created within this many days
    #[arg(long, value_name = "DAYS")]
    pub lookback_days: Option<u32>,

    /// Only download artifacts whose name contains this text
    #[arg(long, value_name = "TEXT")]
    pub marker: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Download recent metric artifacts into the raw metrics directory.
///
/// # Errors
///
/// Returns an error if the repository or token is missing, if listing the
/// artifacts fails, or if any selected artifact could not be downloaded.
pub async fn download_metrics<H: Host>(host: &mut H, args: &DownloadArgs) -> Result<()> {
    let config = args.common.setup()?;

    let repo = args
        .repository
        .as_ref()
        .ok_or_else(|| app_err!("no repository given: pass --repository or set GITHUB_REPOSITORY"))?;

    let token = args
        .github_token
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| app_err!("no GitHub token given: pass --github-token or set GITHUB_TOKEN"))?;

    let lookback_days = args.lookback_days.unwrap_or(config.lookback_days);
    if lookback_days == 0 {
        bail!("--lookback-days must be at least 1");
    }

    let marker = args.marker.clone().unwrap_or(config.artifact_marker);
    if marker.trim().is_empty() {
        bail!("--marker must not be empty");
    }

    let options = DownloadOptions {
        raw_dir: args.raw_dir.clone().unwrap_or(config.raw_dir),
        marker,
        lookback_days,
        now: Utc::now(),
    };

    let client = Client::new(token, config.github_api_url)?;
    let report = download_artifacts(&client, repo, &options).await?;

    let _ = writeln!(
        host.output(),
        "Downloaded {} artifact(s) from '{repo}' into '{}'",
        report.downloaded.len(),
        options.raw_dir
    );
    for dir in &report.downloaded {
        let _ = writeln!(host.output(), "  {dir}");
    }

    if report.is_success() {
        return Ok(());
    }

    for (name, e) in &report.failed {
        let _ = writeln!(host.error(), "  failed to download '{name}': {e:#}");
    }

    bail!("unable to download {} artifact(s)", report.failed.len())
}
