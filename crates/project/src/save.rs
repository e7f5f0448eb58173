//! Snapshot serialization — writing project snapshots to JSON files.
//!
//! Projects are persisted one file per project under a store directory,
//! keyed by a sanitized form of the project name (`<key>.fcp`).

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ProjectError, ProjectResult};
use crate::snapshot::Snapshot;

/// File extension for persisted project snapshots.
pub const PROJECT_EXT: &str = "fcp";

/// Serialize a snapshot to a pretty-printed JSON string.
pub fn to_json_string(snapshot: &Snapshot) -> ProjectResult<String> {
    let json = serde_json::to_string_pretty(snapshot)?;
    debug!(
        project_name = %snapshot.name(),
        json_len = json.len(),
        "Serialized snapshot to JSON"
    );
    Ok(json)
}

/// Serialize a snapshot to a compact (non-pretty) JSON string.
pub fn to_json_string_compact(snapshot: &Snapshot) -> ProjectResult<String> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Derive the storage key for a project name: alphanumerics kept, everything
/// else collapsed to `_`, empty names become `untitled`.
pub fn storage_key(name: &str) -> String {
    let key: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if key.is_empty() {
        "untitled".to_string()
    } else {
        key
    }
}

/// Path of the file a snapshot with the given name would be saved to.
pub fn project_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.{PROJECT_EXT}", storage_key(name)))
}

/// Save a snapshot into the store directory, returning its storage key.
///
/// The file is written atomically: data goes to a temporary file in the same
/// directory first, then is renamed onto the target path. This prevents data
/// loss if the process is interrupted mid-write.
pub fn save_snapshot(snapshot: &Snapshot, dir: &Path) -> ProjectResult<String> {
    std::fs::create_dir_all(dir)?;

    let key = storage_key(snapshot.name());
    let path = project_path(dir, snapshot.name());
    let json = to_json_string(snapshot)?;

    let temp_path = path.with_extension(format!("{PROJECT_EXT}.tmp"));
    std::fs::write(&temp_path, json.as_bytes()).map_err(|e| {
        tracing::error!(path = %temp_path.display(), error = %e, "Failed to write temp file");
        ProjectError::Io(e)
    })?;
    std::fs::rename(&temp_path, &path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        tracing::error!(
            from = %temp_path.display(),
            to = %path.display(),
            error = %e,
            "Failed to rename temp file to target"
        );
        ProjectError::Io(e)
    })?;

    info!(
        project_name = %snapshot.name(),
        path = %path.display(),
        "Project saved"
    );
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Project;

    fn sample_snapshot(name: &str) -> Snapshot {
        Snapshot::capture(&Project::new(name, 30, 300))
    }

    #[test]
    fn storage_key_sanitizes() {
        assert_eq!(storage_key("My Project/1"), "My_Project_1");
        assert_eq!(storage_key(""), "untitled");
        assert_eq!(storage_key("clean"), "clean");
    }

    #[test]
    fn to_json_string_produces_valid_json() {
        let json = to_json_string(&sample_snapshot("Save Test")).expect("serialize");
        let _: serde_json::Value = serde_json::from_str(&json).expect("parse as Value");
        assert!(json.contains("Save Test"));
    }

    #[test]
    fn compact_is_smaller_than_pretty() {
        let snap = sample_snapshot("Compact Test");
        let pretty = to_json_string(&snap).unwrap();
        let compact = to_json_string_compact(&snap).unwrap();
        assert!(compact.len() < pretty.len());
    }

    #[test]
    fn save_creates_file_and_returns_key() {
        let dir = std::env::temp_dir().join("fc_project_save_test");
        let _ = std::fs::remove_dir_all(&dir);

        let key = save_snapshot(&sample_snapshot("Disk Test"), &dir).expect("save");
        assert_eq!(key, "Disk_Test");

        let path = dir.join("Disk_Test.fcp");
        assert!(path.exists());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Disk Test"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_leaves_no_temp_residue() {
        let dir = std::env::temp_dir().join("fc_project_atomic_test");
        let _ = std::fs::remove_dir_all(&dir);

        save_snapshot(&sample_snapshot("Atomic"), &dir).expect("save");
        let leftovers: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "tmp").unwrap_or(false))
            .collect();
        assert!(leftovers.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
