//! Retrieval of metric artifacts from GitHub Actions
//!
//! # Implementation Model
//!
//! The [`Client`] lists a repository's workflow artifacts page by page and
//! downloads their zip archives with token authentication.
//! [`download_artifacts`] keeps the artifacts whose name contains the marker,
//! that have not expired and that fall inside the lookback window, then
//! extracts each one under the ingestion root as `{name}-{id}`.
//!
//! Extraction goes through a hidden staging directory so that a failed
//! download or a corrupt archive never disturbs data from earlier runs.

mod client;
mod downloader;
mod extract;
mod path_utils;
mod repo_spec;

pub use client::{Artifact, Client, DEFAULT_API_URL};
pub use downloader::{DownloadOptions, DownloadReport, artifact_dir_name, download_artifacts, select_artifacts};
pub use extract::extract_archive;
pub use repo_spec::RepoSpec;
