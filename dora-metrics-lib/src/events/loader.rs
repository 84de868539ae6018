//! Loading raw metric events from a directory tree.

use super::MetricEvent;
use crate::Dataset;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::IntoAppError;
use std::fs::File;
use std::io::BufReader;
use walkdir::{DirEntry, WalkDir};

const LOG_TARGET: &str = "    ingest";

const EVENT_FILE_EXTENSION: &str = "json";

/// The result of loading every event file below a root directory.
#[derive(Debug)]
pub struct LoadedEvents {
    /// Successfully deserialized events, in no particular order.
    pub events: Dataset<MetricEvent>,

    /// Files that could not be read or parsed.
    pub rejected: Vec<Utf8PathBuf>,

    /// Set when the root directory does not exist at all.
    pub root_missing: bool,
}

/// Load every `*.json` file below `root` as one [`MetricEvent`].
///
/// Files that fail to open or parse are logged and skipped, and hidden files
/// and directories are ignored. A missing root yields an empty result with
/// `root_missing` set rather than an error.
#[must_use]
pub fn load_events(root: &Utf8Path) -> LoadedEvents {
    if !root.exists() {
        log::info!(target: LOG_TARGET, "No metrics directory found at '{root}'");
        return LoadedEvents {
            events: Dataset::Empty,
            rejected: Vec::new(),
            root_missing: true,
        };
    }

    let mut events = Vec::new();
    let mut rejected = Vec::new();

    let walker = WalkDir::new(root).sort_by_file_name().into_iter().filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Unable to read directory entry below '{root}': {e:#}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(path) = Utf8Path::from_path(entry.path()) else {
            log::warn!(target: LOG_TARGET, "Skipping non UTF-8 path '{}'", entry.path().display());
            continue;
        };

        if path.extension() != Some(EVENT_FILE_EXTENSION) {
            continue;
        }

        match load_event(path) {
            Ok(event) => events.push(event),
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Error loading '{path}': {e:#}");
                rejected.push(path.to_path_buf());
            }
        }
    }

    log::debug!(target: LOG_TARGET, "Loaded {} events from '{root}', rejected {}", events.len(), rejected.len());

    LoadedEvents {
        events: Dataset::from_rows(events),
        rejected,
        root_missing: false,
    }
}

/// Hidden entries hold in-progress or retired artifact extractions.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

fn load_event(path: &Utf8Path) -> crate::Result<MetricEvent> {
    let file = File::open(path).into_app_err_with(|| format!("unable to open '{path}'"))?;
    serde_json::from_reader(BufReader::new(file)).into_app_err_with(|| format!("unable to parse '{path}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        (tmp, root)
    }

    #[test]
    fn test_missing_root_is_no_data() {
        let (_tmp, root) = temp_root();
        let loaded = load_events(&root.join("does-not-exist"));
        assert!(loaded.root_missing);
        assert!(loaded.events.is_empty());
        assert!(loaded.rejected.is_empty());
    }

    #[test]
    fn test_empty_root_is_empty_but_present() {
        let (_tmp, root) = temp_root();
        let loaded = load_events(&root);
        assert!(!loaded.root_missing);
        assert!(loaded.events.is_empty());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_loads_nested_files_and_skips_bad_ones() {
        let (_tmp, root) = temp_root();
        let nested = root.join("dora-metrics-1");
        fs::create_dir_all(&nested).unwrap();

        fs::write(
            nested.join("deploy.json"),
            r#"{"timestamp": "2024-01-01T00:00:00Z", "service": "api", "deployment_frequency": {"deployment_id": "1"}}"#,
        )
        .unwrap();
        fs::write(root.join("broken.json"), "{ not json").unwrap();
        fs::write(root.join("no-service.json"), r#"{"timestamp": "2024-01-01T00:00:00Z"}"#).unwrap();
        fs::write(root.join("notes.txt"), "ignored").unwrap();

        let loaded = load_events(&root);
        assert!(!loaded.root_missing);
        assert_eq!(loaded.events.len(), 1);
        assert_eq!(loaded.events.rows()[0].service, "api");
        assert_eq!(loaded.rejected.len(), 2);
        assert!(loaded.rejected.iter().any(|p| p.file_name() == Some("broken.json")));
        assert!(loaded.rejected.iter().any(|p| p.file_name() == Some("no-service.json")));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_hidden_directories_are_skipped() {
        let (_tmp, root) = temp_root();
        let staging = root.join(".staging-dora-metrics-1");
        fs::create_dir_all(&staging).unwrap();
        fs::write(
            staging.join("deploy.json"),
            r#"{"timestamp": "2024-01-01T00:00:00Z", "service": "api", "deployment_frequency": {"deployment_id": "1"}}"#,
        )
        .unwrap();

        let loaded = load_events(&root);
        assert!(loaded.events.is_empty());
        assert!(loaded.rejected.is_empty());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_inert_event_is_loaded() {
        let (_tmp, root) = temp_root();
        fs::write(
            root.join("inert.json"),
            r#"{"timestamp": "2024-01-01T00:00:00Z", "service": "api", "unknown_kind": {}}"#,
        )
        .unwrap();

        let loaded = load_events(&root);
        assert_eq!(loaded.events.len(), 1);
        assert!(loaded.rejected.is_empty());
    }
}
