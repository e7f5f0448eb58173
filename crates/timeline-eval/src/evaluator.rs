//! Core frame resolution: which clip occupies each track at a frame, and in
//! what order the layers composite.
//!
//! The resolution process:
//! 1. For each track (bottom-to-top), find the active clip at the frame —
//!    first match by clip index when clips overlap.
//! 2. Video hits become the base layer; the track latest in project order
//!    wins, occluding earlier video bases.
//! 3. Text/sticker hits become overlays in track order: the top-most
//!    authored track paints last, i.e. on top. Audio is resolved separately
//!    for mixing and never participates in visual layering.

use fc_common::{
    BaseLayer, FrameLayers, FrameNumber, GradeParams, OverlayLayer, OverlayTransform, SourceId,
    StickerLayer, TextLayer, TimeCode,
};
use fc_project::{Clip, ClipData, Project};

/// The raw per-frame selection: at most one base clip plus the overlay clips
/// in compositing order (bottom-to-top).
#[derive(Clone, Debug, Default)]
pub struct ResolvedFrame<'a> {
    /// The active video clip, if any.
    pub base: Option<&'a Clip>,
    /// Active text/sticker clips, ordered by track position (last paints on top).
    pub overlays: Vec<&'a Clip>,
}

/// Select the active clips at `frame` across all tracks.
///
/// When several video tracks have an active clip, the one from the track
/// latest in project order is kept. Overlay order follows track order, with
/// ties (clips from the same track) impossible by construction — one active
/// clip per track, lowest clip index winning on overlap.
pub fn resolve(project: &Project, frame: FrameNumber) -> ResolvedFrame<'_> {
    let mut resolved = ResolvedFrame::default();
    for track in &project.tracks {
        let Some(clip) = track.active_clip(frame) else {
            continue;
        };
        match clip.data {
            ClipData::Video(_) => resolved.base = Some(clip),
            ClipData::Text(_) | ClipData::Sticker(_) => resolved.overlays.push(clip),
            ClipData::Audio(_) => {}
        }
    }
    resolved
}

/// An active audio clip with its mix gain.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioLayer {
    pub clip_id: String,
    pub source: SourceId,
    pub gain: f32,
}

/// Resolve the audio clips active at `frame` for mixing.
///
/// Muted clips and clips without a bound source are excluded.
pub fn active_audio(project: &Project, frame: FrameNumber) -> Vec<AudioLayer> {
    let mut layers = Vec::new();
    for track in &project.tracks {
        let Some(clip) = track.active_clip(frame) else {
            continue;
        };
        if let ClipData::Audio(params) = &clip.data {
            if params.muted {
                continue;
            }
            let Some(source) = &clip.source else {
                continue;
            };
            layers.push(AudioLayer {
                clip_id: clip.id.clone(),
                source: source.clone(),
                gain: params.volume.clamp(0.0, 1.0),
            });
        }
    }
    layers
}

/// Resolve `frame` and translate the selection into compositor layer
/// descriptions.
///
/// A video clip with no bound source yields no base layer, and a sticker
/// with no bound source yields no overlay — missing media degrades to the
/// remaining layers rather than failing the frame.
pub fn evaluate(project: &Project, frame: FrameNumber) -> FrameLayers {
    let resolved = resolve(project, frame);
    let mut layers = FrameLayers::default();

    if let Some(clip) = resolved.base {
        if let (ClipData::Video(params), Some(source)) = (&clip.data, &clip.source) {
            layers.base = Some(BaseLayer {
                clip_id: clip.id.clone(),
                source: source.clone(),
                local_time: base_local_time(project.fps, frame, clip.start, params.clamped_speed()),
                grade: GradeParams {
                    exposure: params.exposure,
                    contrast: params.contrast,
                    saturation: params.saturation,
                    temperature: params.temperature,
                },
                sharpen: params.sharpen.clamp(0.0, 1.0),
                opacity: params.opacity.clamp(0.0, 1.0),
            });
        }
    }

    for clip in resolved.overlays {
        match &clip.data {
            ClipData::Text(params) => {
                layers.overlays.push(OverlayLayer::Text(TextLayer {
                    clip_id: clip.id.clone(),
                    content: params.content.clone(),
                    color: params.color,
                    font_size: params.font_size.max(8.0),
                    bold: params.bold,
                    outline: params.outline,
                    outline_color: params.outline_color,
                    transform: OverlayTransform {
                        x: params.x,
                        y: params.y,
                        scale: params.scale,
                        rotation: params.rotation,
                    },
                    opacity: params.opacity.clamp(0.0, 1.0),
                }));
            }
            ClipData::Sticker(params) => {
                let Some(source) = &clip.source else {
                    tracing::debug!(clip_id = %clip.id, "Sticker without source skipped");
                    continue;
                };
                layers.overlays.push(OverlayLayer::Sticker(StickerLayer {
                    clip_id: clip.id.clone(),
                    source: source.clone(),
                    transform: OverlayTransform {
                        x: params.x,
                        y: params.y,
                        scale: params.scale,
                        rotation: params.rotation,
                    },
                    opacity: params.opacity.clamp(0.0, 1.0),
                }));
            }
            _ => {}
        }
    }

    layers
}

/// Local media time for a base clip: `(frame - start) / (fps * speed)`,
/// floored at zero.
fn base_local_time(fps: u32, frame: FrameNumber, start: FrameNumber, speed: f64) -> TimeCode {
    let offset = (frame - start).max(0) as f64;
    TimeCode::from_secs(offset / (fps.max(1) as f64 * speed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_project::{
        AudioParams, NewClip, ParamUpdate, StickerParams, TextParams, TrackKind, VideoParams,
    };

    /// One video track holding `[0, 90)` and one text track holding
    /// `[30, 60)` at 30 fps.
    fn example_project() -> Project {
        let mut pj = Project::new("Example", 30, 90);
        let video = pj.add_track(TrackKind::Video);
        pj.add_clip(
            &video,
            NewClip::new(
                FrameNumber(0),
                FrameNumber(90),
                ClipData::Video(VideoParams::default()),
            )
            .with_source(SourceId::new("clip.mp4")),
        )
        .unwrap();
        let text = pj.add_track(TrackKind::Text);
        pj.add_clip(
            &text,
            NewClip::new(
                FrameNumber(30),
                FrameNumber(60),
                ClipData::Text(TextParams {
                    content: "Hi".to_string(),
                    ..TextParams::default()
                }),
            ),
        )
        .unwrap();
        pj
    }

    #[test]
    fn resolve_example_frames() {
        let pj = example_project();

        let r = resolve(&pj, FrameNumber(10));
        assert!(r.base.is_some());
        assert!(r.overlays.is_empty());

        let r = resolve(&pj, FrameNumber(45));
        assert!(r.base.is_some());
        assert_eq!(r.overlays.len(), 1);
        assert!(matches!(r.overlays[0].data, ClipData::Text(_)));

        let r = resolve(&pj, FrameNumber(95));
        assert!(r.base.is_none());
        assert!(r.overlays.is_empty());
    }

    #[test]
    fn later_video_track_occludes_earlier() {
        let mut pj = Project::new("Two bases", 30, 100);
        for name in ["lower.mp4", "upper.mp4"] {
            let track = pj.add_track(TrackKind::Video);
            pj.add_clip(
                &track,
                NewClip::new(
                    FrameNumber(0),
                    FrameNumber(100),
                    ClipData::Video(VideoParams::default()),
                )
                .with_source(SourceId::new(name)),
            )
            .unwrap();
        }

        let r = resolve(&pj, FrameNumber(50));
        assert_eq!(
            r.base.unwrap().source.as_ref().unwrap(),
            &SourceId::new("upper.mp4")
        );
    }

    #[test]
    fn overlays_follow_track_order() {
        let mut pj = Project::new("Order", 30, 100);
        let text = pj.add_track(TrackKind::Text);
        let sticker = pj.add_track(TrackKind::Sticker);
        let text_clip = pj
            .add_clip(
                &text,
                NewClip::new(
                    FrameNumber(0),
                    FrameNumber(100),
                    ClipData::Text(TextParams::default()),
                ),
            )
            .unwrap();
        let sticker_clip = pj
            .add_clip(
                &sticker,
                NewClip::new(
                    FrameNumber(0),
                    FrameNumber(100),
                    ClipData::Sticker(StickerParams::default()),
                )
                .with_source(SourceId::new("sticker.png")),
            )
            .unwrap();

        // Text track is below the sticker track, so it paints first.
        let r = resolve(&pj, FrameNumber(0));
        assert_eq!(r.overlays[0].id, text_clip);
        assert_eq!(r.overlays[1].id, sticker_clip);

        // Moving the sticker track below the text track flips the order.
        pj.move_track_up(&sticker).unwrap();
        let r = resolve(&pj, FrameNumber(0));
        assert_eq!(r.overlays[0].id, sticker_clip);
        assert_eq!(r.overlays[1].id, text_clip);
    }

    #[test]
    fn evaluate_builds_base_layer_with_local_time() {
        let mut pj = example_project();
        let clip_id = pj.tracks[0].clips[0].id.clone();
        pj.set_clip_param(&clip_id, ParamUpdate::Speed(2.0)).unwrap();

        let layers = evaluate(&pj, FrameNumber(60));
        let base = layers.base.unwrap();
        // (60 - 0) / (30 fps * 2.0 speed) = 1 second
        assert!((base.local_time.as_secs() - 1.0).abs() < 1e-9);
        assert_eq!(base.source, SourceId::new("clip.mp4"));
    }

    #[test]
    fn evaluate_clamps_out_of_range_params() {
        let mut pj = example_project();
        let clip_id = pj.tracks[0].clips[0].id.clone();
        pj.set_clip_param(&clip_id, ParamUpdate::Opacity(4.0)).unwrap();
        pj.set_clip_param(&clip_id, ParamUpdate::Sharpen(2.5)).unwrap();

        let layers = evaluate(&pj, FrameNumber(10));
        let base = layers.base.unwrap();
        assert!((base.opacity - 1.0).abs() < 1e-6);
        assert!((base.sharpen - 1.0).abs() < 1e-6);
    }

    #[test]
    fn evaluate_skips_video_without_source() {
        let mut pj = Project::new("No source", 30, 100);
        let track = pj.add_track(TrackKind::Video);
        pj.add_clip(
            &track,
            NewClip::new(
                FrameNumber(0),
                FrameNumber(100),
                ClipData::Video(VideoParams::default()),
            ),
        )
        .unwrap();

        // resolve still reports the clip; evaluate degrades to no base.
        assert!(resolve(&pj, FrameNumber(10)).base.is_some());
        assert!(evaluate(&pj, FrameNumber(10)).base.is_none());
    }

    #[test]
    fn evaluate_skips_sticker_without_source() {
        let mut pj = Project::new("No source", 30, 100);
        let track = pj.add_track(TrackKind::Sticker);
        pj.add_clip(
            &track,
            NewClip::new(
                FrameNumber(0),
                FrameNumber(100),
                ClipData::Sticker(StickerParams::default()),
            ),
        )
        .unwrap();

        assert!(evaluate(&pj, FrameNumber(10)).overlays.is_empty());
    }

    #[test]
    fn text_font_size_floor_applied() {
        let mut pj = Project::new("Tiny text", 30, 100);
        let track = pj.add_track(TrackKind::Text);
        pj.add_clip(
            &track,
            NewClip::new(
                FrameNumber(0),
                FrameNumber(100),
                ClipData::Text(TextParams {
                    font_size: 2.0,
                    ..TextParams::default()
                }),
            ),
        )
        .unwrap();

        let layers = evaluate(&pj, FrameNumber(0));
        match &layers.overlays[0] {
            OverlayLayer::Text(t) => assert!((t.font_size - 8.0).abs() < 1e-6),
            _ => unreachable!(),
        }
    }

    #[test]
    fn audio_resolution_excludes_muted_and_sourceless() {
        let mut pj = Project::new("Audio", 30, 100);
        let a1 = pj.add_track(TrackKind::Audio);
        let a2 = pj.add_track(TrackKind::Audio);
        let a3 = pj.add_track(TrackKind::Audio);
        pj.add_clip(
            &a1,
            NewClip::new(
                FrameNumber(0),
                FrameNumber(100),
                ClipData::Audio(AudioParams {
                    volume: 0.5,
                    muted: false,
                }),
            )
            .with_source(SourceId::new("music.wav")),
        )
        .unwrap();
        pj.add_clip(
            &a2,
            NewClip::new(
                FrameNumber(0),
                FrameNumber(100),
                ClipData::Audio(AudioParams {
                    volume: 1.0,
                    muted: true,
                }),
            )
            .with_source(SourceId::new("voice.wav")),
        )
        .unwrap();
        pj.add_clip(
            &a3,
            NewClip::new(
                FrameNumber(0),
                FrameNumber(100),
                ClipData::Audio(AudioParams::default()),
            ),
        )
        .unwrap();

        let layers = active_audio(&pj, FrameNumber(10));
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].source, SourceId::new("music.wav"));
        assert!((layers[0].gain - 0.5).abs() < 1e-6);

        // Audio never appears in visual layers.
        let visual = resolve(&pj, FrameNumber(10));
        assert!(visual.base.is_none());
        assert!(visual.overlays.is_empty());
    }

    #[test]
    fn local_time_floors_at_zero() {
        let tc = base_local_time(30, FrameNumber(0), FrameNumber(10), 1.0);
        assert_eq!(tc.as_secs(), 0.0);
    }
}
