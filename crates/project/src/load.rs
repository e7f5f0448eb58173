//! Snapshot deserialization — loading project snapshots from JSON files.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{ProjectError, ProjectResult};
use crate::save::{project_path, PROJECT_EXT};
use crate::snapshot::Snapshot;

/// Deserialize and validate a snapshot from a JSON string.
pub fn from_json_string(json: &str) -> ProjectResult<Snapshot> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    validate_snapshot(&snapshot)?;
    debug!(
        project_name = %snapshot.name(),
        tracks = snapshot.tracks().len(),
        "Deserialized snapshot from JSON"
    );
    Ok(snapshot)
}

/// Load the snapshot stored under the given project name, or `None` when no
/// such project has been saved.
pub fn load_snapshot(dir: &Path, name: &str) -> ProjectResult<Option<Snapshot>> {
    let path = project_path(dir, name);
    if !path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(&path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to read project file");
        ProjectError::Io(e)
    })?;
    let snapshot = from_json_string(&json)?;
    info!(
        project_name = %snapshot.name(),
        path = %path.display(),
        "Project loaded"
    );
    Ok(Some(snapshot))
}

/// Load the most recent project in the store directory (last storage key in
/// lexicographic order), or `None` when the directory holds no projects.
pub fn load_latest(dir: &Path) -> ProjectResult<Option<Snapshot>> {
    if !dir.exists() {
        return Ok(None);
    }
    let mut keys: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|x| x == PROJECT_EXT).unwrap_or(false))
        .collect();
    keys.sort();
    let Some(path) = keys.last() else {
        return Ok(None);
    };
    let json = std::fs::read_to_string(path)?;
    let snapshot = from_json_string(&json)?;
    info!(path = %path.display(), "Latest project loaded");
    Ok(Some(snapshot))
}

/// Structural validation of a loaded snapshot: positive fps and duration,
/// well-formed clip ranges, clip kinds matching their tracks.
fn validate_snapshot(snapshot: &Snapshot) -> ProjectResult<()> {
    if snapshot.fps() == 0 {
        return Err(ProjectError::InvalidProject {
            reason: "fps must be positive".to_string(),
        });
    }
    if snapshot.duration_frames() == 0 {
        return Err(ProjectError::InvalidProject {
            reason: "duration_frames must be positive".to_string(),
        });
    }
    for track in snapshot.tracks() {
        for clip in &track.clips {
            if clip.start >= clip.end {
                return Err(ProjectError::InvalidProject {
                    reason: format!(
                        "clip {} has invalid range [{}, {})",
                        clip.id, clip.start.0, clip.end.0
                    ),
                });
            }
            if clip.kind() != track.kind {
                return Err(ProjectError::InvalidProject {
                    reason: format!(
                        "clip {} kind {:?} does not match track {} kind {:?}",
                        clip.id,
                        clip.kind(),
                        track.id,
                        track.kind
                    ),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewClip, Project};
    use crate::save::{save_snapshot, to_json_string};
    use crate::types::{ClipData, TextParams, TrackKind, VideoParams};
    use fc_common::FrameNumber;

    fn sample_project(name: &str) -> Project {
        let mut pj = Project::new(name, 30, 300);
        let track = pj.add_track(TrackKind::Video);
        pj.add_clip(
            &track,
            NewClip::new(
                FrameNumber(0),
                FrameNumber(90),
                ClipData::Video(VideoParams::default()),
            ),
        )
        .unwrap();
        let text = pj.add_track(TrackKind::Text);
        pj.add_clip(
            &text,
            NewClip::new(
                FrameNumber(30),
                FrameNumber(60),
                ClipData::Text(TextParams::default()),
            ),
        )
        .unwrap();
        pj
    }

    #[test]
    fn json_roundtrip_preserves_model() {
        let pj = sample_project("Roundtrip");
        let snap = Snapshot::capture(&pj);
        let json = to_json_string(&snap).unwrap();
        let back = from_json_string(&json).unwrap();
        assert_eq!(back.into_project(), pj);
    }

    #[test]
    fn save_then_load_by_name() {
        let dir = std::env::temp_dir().join("fc_project_load_test");
        let _ = std::fs::remove_dir_all(&dir);

        let pj = sample_project("Load Me");
        save_snapshot(&Snapshot::capture(&pj), &dir).unwrap();

        let loaded = load_snapshot(&dir, "Load Me").unwrap().unwrap();
        assert_eq!(loaded.into_project(), pj);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_missing_returns_none() {
        let dir = std::env::temp_dir().join("fc_project_missing_test");
        let _ = std::fs::remove_dir_all(&dir);
        assert!(load_snapshot(&dir, "Nothing Here").unwrap().is_none());
        assert!(load_latest(&dir).unwrap().is_none());
    }

    #[test]
    fn load_latest_picks_last_key() {
        let dir = std::env::temp_dir().join("fc_project_latest_test");
        let _ = std::fs::remove_dir_all(&dir);

        save_snapshot(&Snapshot::capture(&sample_project("aaa")), &dir).unwrap();
        save_snapshot(&Snapshot::capture(&sample_project("zzz")), &dir).unwrap();

        let latest = load_latest(&dir).unwrap().unwrap();
        assert_eq!(latest.name(), "zzz");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn invalid_documents_are_rejected() {
        // fps of zero
        let json = r#"{"name":"bad","fps":0,"duration_frames":10,"tracks":[]}"#;
        assert!(matches!(
            from_json_string(json),
            Err(ProjectError::InvalidProject { .. })
        ));

        // clip range inverted
        let json = r#"{
            "name":"bad","fps":30,"duration_frames":10,
            "tracks":[{"id":"t_1","kind":"video","clips":[
                {"id":"c_1","start":5,"end":5,"data":{"type":"video"}}
            ]}]
        }"#;
        assert!(matches!(
            from_json_string(json),
            Err(ProjectError::InvalidProject { .. })
        ));

        // clip kind mismatching its track
        let json = r#"{
            "name":"bad","fps":30,"duration_frames":10,
            "tracks":[{"id":"t_1","kind":"video","clips":[
                {"id":"c_1","start":0,"end":5,"data":{"type":"text"}}
            ]}]
        }"#;
        assert!(matches!(
            from_json_string(json),
            Err(ProjectError::InvalidProject { .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            from_json_string("not json"),
            Err(ProjectError::Json(_))
        ));
    }
}
