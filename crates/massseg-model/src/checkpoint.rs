//! Locating checkpoint records on disk.

use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::error::{ModelError, ModelResult};

/// File extension written by `NamedMpkFileRecorder`.
pub const CHECKPOINT_EXTENSION: &str = "mpk";

/// Returns the `.mpk` record to restore from `path`.
///
/// `path` may be a record, a directory (resolved to its most recent record)
/// or a record path without its extension, as passed to `save_file`.
///
/// # Errors
///
/// Returns [`ModelError::UnsupportedCheckpointFormat`] for an existing file
/// with another extension, and [`ModelError::CheckpointNotFound`] if nothing
/// matches or a directory holds no record.
pub fn resolve_checkpoint(path: &Path) -> ModelResult<PathBuf> {
    if path.is_dir() {
        return latest_checkpoint(path);
    }
    if path.is_file() {
        return if has_checkpoint_extension(path) {
            Ok(path.to_path_buf())
        } else {
            Err(ModelError::UnsupportedCheckpointFormat {
                path: path.to_path_buf(),
            })
        };
    }

    let record = with_checkpoint_extension(path);
    if record.is_file() {
        Ok(record)
    } else {
        Err(ModelError::CheckpointNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Finds the most recently modified `.mpk` record in `dir`.
///
/// Ties on modification time are broken by file name, so the result is
/// stable for checkpoints written within the same clock tick.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or contains no record.
pub fn latest_checkpoint(dir: &Path) -> ModelResult<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|source| ModelError::CheckpointDirectoryReadFailed {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry.map_err(|source| ModelError::CheckpointDirectoryReadFailed {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if !path.is_file() || !has_checkpoint_extension(&path) {
            continue;
        }

        let modified = entry
            .metadata()
            .and_then(|metadata| metadata.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let is_newer = match &latest {
            Some((time, current)) => (modified, &path) > (*time, current),
            None => true,
        };
        if is_newer {
            latest = Some((modified, path));
        }
    }

    match latest {
        Some((_, path)) => {
            tracing::debug!(checkpoint = %path.display(), "found latest checkpoint");
            Ok(path)
        }
        None => Err(ModelError::CheckpointNotFound {
            path: dir.to_path_buf(),
        }),
    }
}

/// Appends `.mpk`, keeping any dots already in the file name.
fn with_checkpoint_extension(path: &Path) -> PathBuf {
    let mut record = path.as_os_str().to_owned();
    record.push(".");
    record.push(CHECKPOINT_EXTENSION);
    PathBuf::from(record)
}

fn has_checkpoint_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == CHECKPOINT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "massseg-checkpoint-{name}-{}",
            std::process::id()
        ));
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).expect("temp dir");
        dir
    }

    #[test]
    fn picks_checkpoint_records_only() {
        let dir = scratch_dir("records");
        fs::write(dir.join("notes.txt"), b"not a checkpoint").expect("write");
        fs::write(dir.join("epoch-1.mpk"), b"").expect("write");

        let latest = latest_checkpoint(&dir).expect("checkpoint found");

        assert_eq!(latest, dir.join("epoch-1.mpk"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn ties_resolve_to_the_last_name() {
        let dir = scratch_dir("ties");
        for name in ["epoch-1.mpk", "epoch-3.mpk", "epoch-2.mpk"] {
            fs::write(dir.join(name), b"").expect("write");
        }
        let now = SystemTime::now();
        for name in ["epoch-1.mpk", "epoch-3.mpk", "epoch-2.mpk"] {
            fs::File::options()
                .write(true)
                .open(dir.join(name))
                .and_then(|file| file.set_modified(now))
                .expect("set mtime");
        }

        let latest = latest_checkpoint(&dir).expect("checkpoint found");

        assert_eq!(latest, dir.join("epoch-3.mpk"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn empty_directory_has_no_checkpoint() {
        let dir = scratch_dir("empty");

        assert!(matches!(
            latest_checkpoint(&dir),
            Err(ModelError::CheckpointNotFound { .. })
        ));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn resolve_accepts_files_and_rejects_missing_paths() {
        let dir = scratch_dir("resolve");
        let file = dir.join("model.mpk");
        fs::write(&file, b"").expect("write");

        assert_eq!(resolve_checkpoint(&file).expect("file"), file);
        assert_eq!(resolve_checkpoint(&dir).expect("dir"), file);
        assert!(matches!(
            resolve_checkpoint(&dir.join("missing.mpk")),
            Err(ModelError::CheckpointNotFound { .. })
        ));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn other_extensions_are_not_swapped_for_a_sibling_record() {
        let dir = scratch_dir("foreign");
        fs::write(dir.join("weights.mpk"), b"").expect("write");
        fs::write(dir.join("weights.bin"), b"").expect("write");

        assert!(matches!(
            resolve_checkpoint(&dir.join("weights.bin")),
            Err(ModelError::UnsupportedCheckpointFormat { path }) if path == dir.join("weights.bin")
        ));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn bare_stem_resolves_to_its_record() {
        let dir = scratch_dir("stem");
        fs::write(dir.join("model.mpk"), b"").expect("write");
        fs::write(dir.join("run.v2.mpk"), b"").expect("write");

        assert_eq!(
            resolve_checkpoint(&dir.join("model")).expect("stem"),
            dir.join("model.mpk")
        );
        assert_eq!(
            resolve_checkpoint(&dir.join("run.v2")).expect("dotted stem"),
            dir.join("run.v2.mpk")
        );
        assert!(matches!(
            resolve_checkpoint(&dir.join("other")),
            Err(ModelError::CheckpointNotFound { .. })
        ));
        fs::remove_dir_all(&dir).ok();
    }
}
