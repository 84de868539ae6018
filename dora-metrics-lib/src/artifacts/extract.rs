//! Staged extraction of artifact archives.

use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, bail};
use std::fs::{self, File};
use std::io::{self, Cursor};
use zip::ZipArchive;

const LOG_TARGET: &str = "   extract";

const STAGING_PREFIX: &str = ".staging-";
const RETIRED_PREFIX: &str = ".retired-";

/// Extract a zip archive into `parent/dir_name`.
///
/// The archive is unpacked into a hidden staging directory first and only
/// moved into place once every entry has been written. An existing
/// `parent/dir_name` is replaced only after that point. On failure the staging
/// directory is removed and any previous copy is left untouched.
pub fn extract_archive(archive: &[u8], parent: &Utf8Path, dir_name: &str) -> Result<Utf8PathBuf> {
    let target = parent.join(dir_name);
    let staging = parent.join(format!("{STAGING_PREFIX}{dir_name}"));

    fs::create_dir_all(parent).into_app_err_with(|| format!("unable to create directory '{parent}'"))?;
    remove_dir_if_present(&staging)?;

    if let Err(e) = unpack(archive, &staging) {
        if let Err(cleanup) = remove_dir_if_present(&staging) {
            log::warn!(target: LOG_TARGET, "Unable to clean up '{staging}': {cleanup:#}");
        }
        return Err(e);
    }

    replace_dir(&staging, &target, &parent.join(format!("{RETIRED_PREFIX}{dir_name}")))?;
    Ok(target)
}

fn unpack(archive: &[u8], dest: &Utf8Path) -> Result<usize> {
    let mut zip = ZipArchive::new(Cursor::new(archive)).into_app_err("unable to read zip archive")?;

    fs::create_dir_all(dest).into_app_err_with(|| format!("unable to create directory '{dest}'"))?;

    let mut files = 0;
    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .into_app_err_with(|| format!("unable to read entry {index} of zip archive"))?;

        let Some(relative) = entry.enclosed_name() else {
            bail!("zip entry '{}' escapes the extraction directory", entry.name());
        };
        let path = dest.as_std_path().join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&path).into_app_err_with(|| format!("unable to create directory '{}'", path.display()))?;
            continue;
        }

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).into_app_err_with(|| format!("unable to create directory '{}'", dir.display()))?;
        }

        let mut out = File::create(&path).into_app_err_with(|| format!("unable to create file '{}'", path.display()))?;
        let _ = io::copy(&mut entry, &mut out).into_app_err_with(|| format!("unable to extract '{}'", path.display()))?;
        files += 1;
    }

    log::debug!(target: LOG_TARGET, "Extracted {files} files into '{dest}'");
    Ok(files)
}

/// Move `staging` to `target`, setting any previous `target` aside until the move succeeds.
fn replace_dir(staging: &Utf8Path, target: &Utf8Path, retired: &Utf8Path) -> Result<()> {
    remove_dir_if_present(retired)?;

    let had_previous = target.exists();
    if had_previous {
        fs::rename(target, retired).into_app_err_with(|| format!("unable to move '{target}' aside"))?;
    }

    if let Err(e) = fs::rename(staging, target) {
        if had_previous && let Err(restore) = fs::rename(retired, target) {
            log::error!(target: LOG_TARGET, "Unable to restore '{target}' from '{retired}': {restore:#}");
        }
        let _ = remove_dir_if_present(staging);
        return Err(e).into_app_err_with(|| format!("unable to move '{staging}' to '{target}'"));
    }

    if had_previous && let Err(e) = remove_dir_if_present(retired) {
        log::warn!(target: LOG_TARGET, "Unable to remove '{retired}': {e:#}");
    }

    Ok(())
}

fn remove_dir_if_present(path: &Utf8Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).into_app_err_with(|| format!("unable to remove '{path}'")),
    }
}
