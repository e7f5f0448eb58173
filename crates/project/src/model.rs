//! The project model — single source of truth for the editing session.
//!
//! All mutation goes through the command methods here. Each command validates
//! its inputs first and leaves the project untouched on error, so callers can
//! capture a history snapshot before attempting a mutation without needing
//! rollback plumbing.

use fc_common::{FrameNumber, SourceId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProjectError, ProjectResult};
use crate::types::{Clip, ClipData, ParamUpdate, Track, TrackKind};

/// Fields for a clip about to be added to a track. The model assigns the id.
#[derive(Clone, Debug)]
pub struct NewClip {
    pub start: FrameNumber,
    pub end: FrameNumber,
    pub data: ClipData,
    pub label: Option<String>,
    pub source: Option<SourceId>,
}

impl NewClip {
    pub fn new(start: FrameNumber, end: FrameNumber, data: ClipData) -> Self {
        Self {
            start,
            end,
            data,
            label: None,
            source: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_source(mut self, source: SourceId) -> Self {
        self.source = Some(source);
        self
    }
}

/// A multi-track editing project.
///
/// Track order defines compositing order (later tracks render above earlier
/// ones). `duration_frames` grows when clips are added past the current end
/// and never shrinks automatically.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Human-readable project name.
    pub name: String,
    /// Frame rate, frames per second. Always >= 1.
    pub fps: u32,
    /// Timeline length in frames. Always >= 1.
    pub duration_frames: u64,
    /// Ordered tracks, bottom-most first.
    pub tracks: Vec<Track>,
    /// Monotonic counter backing id allocation.
    #[serde(default)]
    pub(crate) id_counter: u64,
}

impl Project {
    /// Create an empty project. `fps` and `duration_frames` are floored to 1.
    pub fn new(name: impl Into<String>, fps: u32, duration_frames: u64) -> Self {
        Self {
            name: name.into(),
            fps: fps.max(1),
            duration_frames: duration_frames.max(1),
            tracks: Vec::new(),
            id_counter: 0,
        }
    }

    fn alloc_id(&mut self, prefix: &str) -> String {
        self.id_counter += 1;
        format!("{prefix}_{}", self.id_counter)
    }

    /// End of the timeline as a frame number (exclusive upper bound of clips,
    /// inclusive upper bound for the playhead).
    pub fn end_frame(&self) -> FrameNumber {
        FrameNumber(self.duration_frames)
    }

    /// Total clip count across all tracks.
    pub fn total_clips(&self) -> usize {
        self.tracks.iter().map(|t| t.clips.len()).sum()
    }

    // --- Lookup ---------------------------------------------------------

    pub fn find_track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn find_clip(&self, id: &str) -> Option<&Clip> {
        self.tracks
            .iter()
            .flat_map(|t| t.clips.iter())
            .find(|c| c.id == id)
    }

    /// The track containing the clip with the given id.
    pub fn track_of_clip(&self, clip_id: &str) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| t.clips.iter().any(|c| c.id == clip_id))
    }

    /// Position of a clip as (track index, clip index).
    fn clip_position(&self, clip_id: &str) -> Option<(usize, usize)> {
        for (ti, track) in self.tracks.iter().enumerate() {
            if let Some(ci) = track.clips.iter().position(|c| c.id == clip_id) {
                return Some((ti, ci));
            }
        }
        None
    }

    // --- Track commands -------------------------------------------------

    /// Append a new empty track of the given kind. Returns its id.
    pub fn add_track(&mut self, kind: TrackKind) -> String {
        let id = self.alloc_id("t");
        self.tracks.push(Track {
            id: id.clone(),
            kind,
            clips: Vec::new(),
        });
        debug!(track_id = %id, ?kind, "Track added");
        id
    }

    /// Remove a track and all of its clips.
    pub fn remove_track(&mut self, id: &str) -> ProjectResult<()> {
        let idx = self
            .tracks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ProjectError::TrackNotFound { id: id.to_string() })?;
        let removed = self.tracks.remove(idx);
        debug!(track_id = %id, clips = removed.clips.len(), "Track removed");
        Ok(())
    }

    /// Swap a track with its predecessor (toward the bottom of the stack).
    /// Returns `false` when the track is already first.
    pub fn move_track_up(&mut self, id: &str) -> ProjectResult<bool> {
        let idx = self
            .tracks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ProjectError::TrackNotFound { id: id.to_string() })?;
        if idx == 0 {
            return Ok(false);
        }
        self.tracks.swap(idx, idx - 1);
        debug!(track_id = %id, from = idx, to = idx - 1, "Track moved");
        Ok(true)
    }

    /// Swap a track with its successor (toward the top of the stack).
    /// Returns `false` when the track is already last.
    pub fn move_track_down(&mut self, id: &str) -> ProjectResult<bool> {
        let idx = self
            .tracks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ProjectError::TrackNotFound { id: id.to_string() })?;
        if idx + 1 >= self.tracks.len() {
            return Ok(false);
        }
        self.tracks.swap(idx, idx + 1);
        debug!(track_id = %id, from = idx, to = idx + 1, "Track moved");
        Ok(true)
    }

    // --- Clip commands --------------------------------------------------

    /// Add a clip to a track. The clip kind must match the track kind and the
    /// range must satisfy `start < end`. Extends `duration_frames` when the
    /// clip ends past the current timeline end. Returns the new clip's id.
    pub fn add_clip(&mut self, track_id: &str, clip: NewClip) -> ProjectResult<String> {
        if clip.start >= clip.end {
            return Err(ProjectError::InvalidClipRange {
                start: clip.start.0,
                end: clip.end.0,
            });
        }
        let track_kind = self
            .find_track(track_id)
            .ok_or_else(|| ProjectError::TrackNotFound {
                id: track_id.to_string(),
            })?
            .kind;
        if clip.data.kind() != track_kind {
            return Err(ProjectError::KindMismatch {
                clip: clip.data.kind(),
                track: track_kind,
            });
        }

        let id = self.alloc_id("c");
        let end = clip.end;
        let track = self
            .tracks
            .iter_mut()
            .find(|t| t.id == track_id)
            .expect("track existence checked above");
        track.clips.push(Clip {
            id: id.clone(),
            start: clip.start,
            end: clip.end,
            label: clip.label,
            source: clip.source,
            data: clip.data,
        });
        if end.0 > self.duration_frames {
            debug!(from = self.duration_frames, to = end.0, "Timeline extended");
            self.duration_frames = end.0;
        }
        debug!(clip_id = %id, track_id = %track_id, "Clip added");
        Ok(id)
    }

    /// Move a clip to a new start frame, preserving its length. The new
    /// position is clamped so the clip stays within `[0, duration_frames]`.
    pub fn move_clip(&mut self, clip_id: &str, new_start: FrameNumber) -> ProjectResult<()> {
        let duration = self.duration_frames;
        let (ti, ci) = self
            .clip_position(clip_id)
            .ok_or_else(|| ProjectError::ClipNotFound {
                id: clip_id.to_string(),
            })?;
        let clip = &mut self.tracks[ti].clips[ci];
        let len = clip.duration_frames();
        let start = new_start.0.min(duration.saturating_sub(len));
        clip.start = FrameNumber(start);
        clip.end = FrameNumber(start + len);
        debug!(clip_id = %clip_id, start, end = start + len, "Clip moved");
        Ok(())
    }

    /// Change a clip's start/end frames. `new_start < new_end` is required;
    /// the end is clamped to the timeline end.
    pub fn trim_clip(
        &mut self,
        clip_id: &str,
        new_start: FrameNumber,
        new_end: FrameNumber,
    ) -> ProjectResult<()> {
        let duration = self.duration_frames;
        let (ti, ci) = self
            .clip_position(clip_id)
            .ok_or_else(|| ProjectError::ClipNotFound {
                id: clip_id.to_string(),
            })?;
        let end = new_end.0.min(duration);
        if new_start.0 >= end {
            return Err(ProjectError::InvalidClipRange {
                start: new_start.0,
                end,
            });
        }
        let clip = &mut self.tracks[ti].clips[ci];
        clip.start = new_start;
        clip.end = FrameNumber(end);
        debug!(clip_id = %clip_id, start = new_start.0, end, "Clip trimmed");
        Ok(())
    }

    /// Split a clip at frame `at` (with `start < at < end`) into `[start, at)`
    /// and `[at, end)`. The left half keeps the original id; the right half
    /// gets a fresh id and a deep copy of the parameter data. Returns the
    /// right half's id.
    pub fn split_clip(&mut self, clip_id: &str, at: FrameNumber) -> ProjectResult<String> {
        let (ti, ci) = self
            .clip_position(clip_id)
            .ok_or_else(|| ProjectError::ClipNotFound {
                id: clip_id.to_string(),
            })?;
        let (start, end) = {
            let clip = &self.tracks[ti].clips[ci];
            (clip.start, clip.end)
        };
        if at <= start || at >= end {
            return Err(ProjectError::InvalidSplitPoint {
                at: at.0,
                start: start.0,
                end: end.0,
            });
        }

        let right_id = self.alloc_id("c");
        let clip = &mut self.tracks[ti].clips[ci];
        let mut right = clip.clone();
        right.id = right_id.clone();
        right.start = at;
        clip.end = at;
        self.tracks[ti].clips.insert(ci + 1, right);
        debug!(
            clip_id = %clip_id,
            right_id = %right_id,
            at = at.0,
            "Clip split"
        );
        Ok(right_id)
    }

    /// Remove a clip from whichever track holds it.
    pub fn remove_clip(&mut self, clip_id: &str) -> ProjectResult<()> {
        let (ti, ci) = self
            .clip_position(clip_id)
            .ok_or_else(|| ProjectError::ClipNotFound {
                id: clip_id.to_string(),
            })?;
        self.tracks[ti].clips.remove(ci);
        debug!(clip_id = %clip_id, "Clip removed");
        Ok(())
    }

    /// Apply a typed parameter update to a clip. Returns the notification
    /// `(key, value)` pair on success; rejects updates that do not apply to
    /// the clip's kind without mutating anything.
    pub fn set_clip_param(
        &mut self,
        clip_id: &str,
        update: ParamUpdate,
    ) -> ProjectResult<(&'static str, fc_common::ParamValue)> {
        let (ti, ci) = self
            .clip_position(clip_id)
            .ok_or_else(|| ProjectError::ClipNotFound {
                id: clip_id.to_string(),
            })?;
        let clip = &mut self.tracks[ti].clips[ci];
        if !update.apply(&mut clip.data) {
            return Err(ProjectError::ParamKindMismatch {
                key: update.key(),
                kind: clip.kind(),
            });
        }
        debug!(clip_id = %clip_id, key = update.key(), "Clip parameter updated");
        Ok((update.key(), update.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StickerParams, TextParams, VideoParams};

    fn project_with_video_clip() -> (Project, String, String) {
        let mut pj = Project::new("Test", 30, 300);
        let track = pj.add_track(TrackKind::Video);
        let clip = pj
            .add_clip(
                &track,
                NewClip::new(
                    FrameNumber(0),
                    FrameNumber(90),
                    ClipData::Video(VideoParams::default()),
                )
                .with_source(SourceId::new("a.mp4")),
            )
            .unwrap();
        (pj, track, clip)
    }

    #[test]
    fn new_project_floors_to_one() {
        let pj = Project::new("P", 0, 0);
        assert_eq!(pj.fps, 1);
        assert_eq!(pj.duration_frames, 1);
    }

    #[test]
    fn add_clip_rejects_kind_mismatch() {
        let mut pj = Project::new("Test", 30, 300);
        let track = pj.add_track(TrackKind::Video);
        let err = pj
            .add_clip(
                &track,
                NewClip::new(
                    FrameNumber(0),
                    FrameNumber(10),
                    ClipData::Text(TextParams::default()),
                ),
            )
            .unwrap_err();
        assert!(matches!(err, ProjectError::KindMismatch { .. }));
        assert_eq!(pj.total_clips(), 0);
    }

    #[test]
    fn add_clip_rejects_empty_range() {
        let mut pj = Project::new("Test", 30, 300);
        let track = pj.add_track(TrackKind::Video);
        let err = pj
            .add_clip(
                &track,
                NewClip::new(
                    FrameNumber(10),
                    FrameNumber(10),
                    ClipData::Video(VideoParams::default()),
                ),
            )
            .unwrap_err();
        assert!(matches!(err, ProjectError::InvalidClipRange { .. }));
    }

    #[test]
    fn add_clip_past_end_extends_timeline() {
        let mut pj = Project::new("Test", 30, 100);
        let track = pj.add_track(TrackKind::Video);
        pj.add_clip(
            &track,
            NewClip::new(
                FrameNumber(50),
                FrameNumber(250),
                ClipData::Video(VideoParams::default()),
            ),
        )
        .unwrap();
        assert_eq!(pj.duration_frames, 250);

        // Removing the clip does not shrink the timeline.
        let id = pj.tracks[0].clips[0].id.clone();
        pj.remove_clip(&id).unwrap();
        assert_eq!(pj.duration_frames, 250);
    }

    #[test]
    fn move_clip_preserves_length_and_clamps() {
        let (mut pj, _, clip) = project_with_video_clip();
        pj.move_clip(&clip, FrameNumber(100)).unwrap();
        let c = pj.find_clip(&clip).unwrap();
        assert_eq!((c.start, c.end), (FrameNumber(100), FrameNumber(190)));

        // Clamped so the clip stays inside the timeline.
        pj.move_clip(&clip, FrameNumber(100_000)).unwrap();
        let c = pj.find_clip(&clip).unwrap();
        assert_eq!((c.start, c.end), (FrameNumber(210), FrameNumber(300)));
    }

    #[test]
    fn trim_clip_validates_range() {
        let (mut pj, _, clip) = project_with_video_clip();
        pj.trim_clip(&clip, FrameNumber(10), FrameNumber(60)).unwrap();
        let c = pj.find_clip(&clip).unwrap();
        assert_eq!((c.start, c.end), (FrameNumber(10), FrameNumber(60)));

        let err = pj
            .trim_clip(&clip, FrameNumber(60), FrameNumber(60))
            .unwrap_err();
        assert!(matches!(err, ProjectError::InvalidClipRange { .. }));
        // Prior state intact after rejection.
        let c = pj.find_clip(&clip).unwrap();
        assert_eq!((c.start, c.end), (FrameNumber(10), FrameNumber(60)));
    }

    #[test]
    fn split_clip_covers_range_without_gap() {
        let (mut pj, _, clip) = project_with_video_clip();
        let right = pj.split_clip(&clip, FrameNumber(40)).unwrap();

        let left = pj.find_clip(&clip).unwrap();
        assert_eq!((left.start, left.end), (FrameNumber(0), FrameNumber(40)));
        let right = pj.find_clip(&right).unwrap();
        assert_eq!((right.start, right.end), (FrameNumber(40), FrameNumber(90)));

        // The two halves sit adjacent on the same track.
        assert_eq!(pj.tracks[0].clips.len(), 2);
        assert_eq!(pj.tracks[0].clips[0].id, clip);
    }

    #[test]
    fn split_clip_rejects_boundary_points() {
        let (mut pj, _, clip) = project_with_video_clip();
        assert!(pj.split_clip(&clip, FrameNumber(0)).is_err());
        assert!(pj.split_clip(&clip, FrameNumber(90)).is_err());
        assert!(pj.split_clip(&clip, FrameNumber(95)).is_err());
        assert_eq!(pj.total_clips(), 1);
    }

    #[test]
    fn split_clip_deep_copies_data() {
        let (mut pj, _, clip) = project_with_video_clip();
        pj.set_clip_param(&clip, ParamUpdate::Exposure(1.0)).unwrap();
        let right = pj.split_clip(&clip, FrameNumber(40)).unwrap();

        // Mutating the right half leaves the left untouched.
        pj.set_clip_param(&right, ParamUpdate::Exposure(-1.0)).unwrap();
        let left_exposure = match &pj.find_clip(&clip).unwrap().data {
            ClipData::Video(p) => p.exposure,
            _ => unreachable!(),
        };
        assert!((left_exposure - 1.0).abs() < 1e-6);
    }

    #[test]
    fn set_clip_param_reports_key_value() {
        let (mut pj, _, clip) = project_with_video_clip();
        let (key, value) = pj
            .set_clip_param(&clip, ParamUpdate::Contrast(1.4))
            .unwrap();
        assert_eq!(key, "contrast");
        assert_eq!(value.as_float(), Some(1.4));
    }

    #[test]
    fn set_clip_param_rejects_wrong_kind() {
        let (mut pj, _, clip) = project_with_video_clip();
        let err = pj
            .set_clip_param(&clip, ParamUpdate::Content("hi".into()))
            .unwrap_err();
        assert!(matches!(err, ProjectError::ParamKindMismatch { .. }));
    }

    #[test]
    fn track_reordering() {
        let mut pj = Project::new("Test", 30, 300);
        let a = pj.add_track(TrackKind::Video);
        let b = pj.add_track(TrackKind::Text);

        assert!(pj.move_track_up(&b).unwrap());
        assert_eq!(pj.tracks[0].id, b);
        assert!(!pj.move_track_up(&b).unwrap());

        assert!(pj.move_track_down(&b).unwrap());
        assert_eq!(pj.tracks[0].id, a);
        assert_eq!(pj.tracks[1].id, b);
        assert!(!pj.move_track_down(&b).unwrap());

        assert!(pj.move_track_up("missing").is_err());
    }

    #[test]
    fn remove_track_drops_clips() {
        let (mut pj, track, _) = project_with_video_clip();
        pj.remove_track(&track).unwrap();
        assert!(pj.tracks.is_empty());
        assert!(matches!(
            pj.remove_track(&track),
            Err(ProjectError::TrackNotFound { .. })
        ));
    }

    #[test]
    fn ids_are_unique_across_kinds() {
        let mut pj = Project::new("Test", 30, 300);
        let t1 = pj.add_track(TrackKind::Video);
        let t2 = pj.add_track(TrackKind::Sticker);
        let c1 = pj
            .add_clip(
                &t1,
                NewClip::new(
                    FrameNumber(0),
                    FrameNumber(10),
                    ClipData::Video(VideoParams::default()),
                ),
            )
            .unwrap();
        let c2 = pj
            .add_clip(
                &t2,
                NewClip::new(
                    FrameNumber(0),
                    FrameNumber(10),
                    ClipData::Sticker(StickerParams::default()),
                ),
            )
            .unwrap();
        let mut ids = vec![t1, t2, c1, c2];
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }
}
