//! Command dispatch logic for dora-metrics

use super::{AggregateArgs, DownloadArgs, InitArgs, aggregate_metrics, download_metrics, init_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "dora-metrics", version, author, long_about = None)]
#[command(about = "Aggregate DORA delivery metrics from CI/CD pipeline events")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate raw metric events and export CSV tables and a run summary
    Aggregate(AggregateArgs),
    /// Download metric artifacts from GitHub Actions
    Download(DownloadArgs),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        Command::Aggregate(aggregate_args) => aggregate_metrics(host, aggregate_args),
        Command::Download(download_args) => download_metrics(host, download_args).await,
        Command::Init(init_args) => init_config(host, init_args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_aggregate_overrides() {
        let cli = Cli::try_parse_from(["dora-metrics", "aggregate", "--raw-dir", "in", "--export-dir", "out", "--log-level", "debug"]).unwrap();
        let Command::Aggregate(args) = cli.command else {
            panic!("expected aggregate command");
        };
        assert_eq!(args.raw_dir.as_deref().map(camino::Utf8Path::as_str), Some("in"));
        assert_eq!(args.export_dir.as_deref().map(camino::Utf8Path::as_str), Some("out"));
        assert!(args.summary_dir.is_none());
    }

    #[test]
    fn test_parse_download_repository() {
        let cli = Cli::try_parse_from([
            "dora-metrics",
            "download",
            "--repository",
            "acme/app",
            "--github-token",
            "t",
            "--lookback-days",
            "30",
        ])
        .unwrap();
        let Command::Download(args) = cli.command else {
            panic!("expected download command");
        };
        assert_eq!(args.repository.unwrap().to_string(), "acme/app");
        assert_eq!(args.lookback_days, Some(30));
    }

    #[test]
    fn test_invalid_repository_is_rejected() {
        let _ = Cli::try_parse_from(["dora-metrics", "download", "--repository", "not-a-repo"]).unwrap_err();
    }
}
