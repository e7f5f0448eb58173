//! Serializable project snapshot for undo/redo and persistence.
//!
//! A [`Snapshot`] is a fully independent deep copy of the project state.
//! Its fields are private, so a captured snapshot can never be mutated —
//! it is only ever restored or serialized.

use serde::{Deserialize, Serialize};

use crate::model::Project;
use crate::types::Track;

/// An immutable deep copy of `{ name, fps, duration_frames, tracks }`.
///
/// Snapshots never share mutable structure with the live project: every
/// track and clip is an owned value, cloned on capture and cloned again on
/// restore.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    name: String,
    fps: u32,
    duration_frames: u64,
    tracks: Vec<Track>,
    #[serde(default)]
    id_counter: u64,
}

impl Snapshot {
    /// Capture the current project state.
    pub fn capture(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            fps: project.fps,
            duration_frames: project.duration_frames,
            tracks: project.tracks.clone(),
            id_counter: project.id_counter,
        }
    }

    /// Restore this snapshot into the given project, overwriting its state.
    pub fn restore(&self, project: &mut Project) {
        project.name = self.name.clone();
        project.fps = self.fps;
        project.duration_frames = self.duration_frames;
        project.tracks = self.tracks.clone();
        project.id_counter = self.id_counter;

        tracing::debug!(
            name = %project.name,
            tracks = project.tracks.len(),
            clips = project.total_clips(),
            "Snapshot restored"
        );
    }

    /// Build a fresh project from this snapshot (used by persistence load).
    pub fn into_project(self) -> Project {
        let mut project = Project::new(self.name.clone(), self.fps, self.duration_frames);
        self.restore(&mut project);
        project
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn duration_frames(&self) -> u64 {
        self.duration_frames
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewClip;
    use crate::types::{ClipData, ParamUpdate, TrackKind, VideoParams};
    use fc_common::{FrameNumber, SourceId};

    fn sample_project() -> Project {
        let mut pj = Project::new("Snapshot Test", 30, 300);
        let track = pj.add_track(TrackKind::Video);
        pj.add_clip(
            &track,
            NewClip::new(
                FrameNumber(0),
                FrameNumber(90),
                ClipData::Video(VideoParams::default()),
            )
            .with_source(SourceId::new("a.mp4"))
            .with_label("intro"),
        )
        .unwrap();
        pj
    }

    #[test]
    fn capture_restore_roundtrip() {
        let pj = sample_project();
        let snap = Snapshot::capture(&pj);

        let mut other = Project::new("Other", 24, 10);
        snap.restore(&mut other);
        assert_eq!(other, pj);
    }

    #[test]
    fn snapshot_is_independent_of_live_state() {
        let mut pj = sample_project();
        let snap = Snapshot::capture(&pj);

        let clip_id = pj.tracks[0].clips[0].id.clone();
        pj.set_clip_param(&clip_id, ParamUpdate::Exposure(2.0))
            .unwrap();
        pj.remove_clip(&clip_id).unwrap();

        // Snapshot still holds the original clip.
        assert_eq!(snap.tracks()[0].clips.len(), 1);
        match &snap.tracks()[0].clips[0].data {
            ClipData::Video(p) => assert_eq!(p.exposure, 0.0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn restore_preserves_id_allocation() {
        let pj = sample_project();
        let snap = Snapshot::capture(&pj);

        let mut other = Project::new("Other", 30, 300);
        snap.restore(&mut other);

        // Ids allocated after a restore do not collide with restored ones.
        let t = other.add_track(TrackKind::Text);
        let existing: Vec<&str> = other.tracks.iter().map(|tr| tr.id.as_str()).collect();
        assert_eq!(existing.iter().filter(|id| **id == t).count(), 1);
    }

    #[test]
    fn serialization_roundtrip() {
        let snap = Snapshot::capture(&sample_project());
        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap, back);
    }

    #[test]
    fn into_project_matches_source() {
        let pj = sample_project();
        let rebuilt = Snapshot::capture(&pj).into_project();
        assert_eq!(rebuilt, pj);
    }
}
