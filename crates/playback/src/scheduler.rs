//! Playback scheduling: play/pause/seek state and dual-mode playhead advance.
//!
//! The scheduler owns the playhead and the render target. Advance is driven
//! two ways:
//!
//! - **Media-driven** (a base clip is active): each tick reads the media
//!   source's own playback position and derives
//!   `frame = clip.start + round(position × fps × speed)`.
//! - **Wall-clock** (no base clip): each tick advances by
//!   `max(1, floor(Δt_ms × fps / 1000))`.
//!
//! `seek` is the deterministic path: it positions the base media
//! synchronously and renders exactly one frame. The export driver drives
//! playback exclusively through it.
//!
//! Within one tick the ordering is: playhead update → render → `rendered`
//! notification. Consumers never observe a `rendered` for a frame whose
//! playhead update has not committed.

use std::sync::Arc;
use std::time::Instant;

use fc_common::{
    EngineEvent, EventBus, FrameNumber, PixelBuffer, RenderSettings, Resolution, SourceId,
};
use fc_compositor::{Compositor, RenderOptions, TextRenderer};
use fc_project::{ClipData, Project};
use fc_timeline_eval::{evaluate, resolve};
use tracing::{debug, warn};

use crate::media::MediaProvider;

/// Transport state. Paused is initial and always safe to return to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TransportState {
    #[default]
    Paused,
    Playing,
}

/// The base clip whose media source currently drives playback.
#[derive(Clone, Debug)]
struct ActiveBase {
    clip_id: String,
    source: SourceId,
}

/// Owns play/pause/seek state, the playhead, and the render target.
///
/// The scheduler holds no project reference: every entry point takes the
/// project and the media provider, which serializes all mutation and render
/// work on the caller's single logical timeline.
pub struct PlaybackScheduler {
    state: TransportState,
    playhead: FrameNumber,
    compositor: Compositor,
    bus: Arc<EventBus>,
    active: Option<ActiveBase>,
    last_tick: Option<Instant>,
    editing_clip: Option<String>,
    frozen: bool,
    deferred_resolution: Option<Resolution>,
    last_frame: Option<PixelBuffer>,
    pending_sources: Vec<SourceId>,
}

impl PlaybackScheduler {
    pub fn new(settings: RenderSettings, bus: Arc<EventBus>) -> Self {
        Self {
            state: TransportState::Paused,
            playhead: FrameNumber::ZERO,
            compositor: Compositor::new(settings),
            bus,
            active: None,
            last_tick: None,
            editing_clip: None,
            frozen: false,
            deferred_resolution: None,
            last_frame: None,
            pending_sources: Vec::new(),
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn playhead(&self) -> FrameNumber {
        self.playhead
    }

    /// The most recently rendered buffer, if any frame has been rendered.
    pub fn last_frame(&self) -> Option<&PixelBuffer> {
        self.last_frame.as_ref()
    }

    /// Sources that were not ready during the last render. The host should
    /// re-issue a seek to the current frame once they become available.
    pub fn pending_sources(&self) -> &[SourceId] {
        &self.pending_sources
    }

    /// Install the font used for text overlays.
    pub fn set_font(&mut self, renderer: TextRenderer) {
        self.compositor.set_font(renderer);
    }

    /// Mark a text overlay clip as under interactive in-place editing (or
    /// clear the mark with `None`). The overlay is suppressed from renders
    /// until cleared; the caller re-seeks to refresh the display.
    pub fn set_editing_clip(&mut self, clip_id: Option<String>) {
        self.editing_clip = clip_id;
    }

    pub fn resolution(&self) -> Resolution {
        self.compositor.resolution()
    }

    /// Track the live display surface size. While an export has the
    /// dimensions frozen the request is remembered and applied on unfreeze.
    pub fn set_output_resolution(&mut self, resolution: Resolution) {
        if self.frozen {
            debug!(%resolution, "Output resolution deferred while frozen");
            self.deferred_resolution = Some(resolution);
        } else {
            self.compositor.set_resolution(resolution);
        }
    }

    /// Freeze the output dimensions at the given resolution for the duration
    /// of an export. Returns the previous resolution for restoring.
    pub fn freeze_resolution(&mut self, resolution: Resolution) -> Resolution {
        let previous = self.compositor.resolution();
        self.frozen = true;
        self.compositor.set_resolution(resolution);
        debug!(%resolution, %previous, "Output resolution frozen");
        previous
    }

    /// Unfreeze the output dimensions. A display resize that arrived during
    /// the freeze wins over the restored resolution.
    pub fn unfreeze_resolution(&mut self, restore: Resolution) {
        self.frozen = false;
        let target = self.deferred_resolution.take().unwrap_or(restore);
        self.compositor.set_resolution(target);
        debug!(resolution = %target, "Output resolution unfrozen");
    }

    pub fn is_resolution_frozen(&self) -> bool {
        self.frozen
    }

    /// Deterministic synchronous seek: clamp, commit the playhead, position
    /// the base media, render once, notify. Valid in either state; seeking
    /// while playing pauses first so the scheduler tick cannot race the
    /// render.
    pub fn seek<P: MediaProvider>(
        &mut self,
        project: &Project,
        provider: &mut P,
        frame: FrameNumber,
    ) -> &PixelBuffer {
        if self.state == TransportState::Playing {
            self.pause(provider);
        }

        let clamped = frame.clamp_to(project.end_frame());
        self.playhead = clamped;
        self.bus.emit(EngineEvent::PlayheadChanged { frame: clamped });

        let layers = evaluate(project, clamped);
        if let Some(base) = &layers.base {
            if let Err(err) = provider.position_at(&base.source, base.local_time) {
                warn!(source = %base.source, error = %err, "Base media positioning failed");
                self.bus.emit(EngineEvent::MediaInvalid {
                    clip_id: base.clip_id.clone(),
                    source: base.source.clone(),
                });
            }
        }

        self.render_current(project, provider);
        self.last_frame
            .as_ref()
            .expect("render_current always stores a frame")
    }

    /// Paused → Playing. Binds the base clip active at the playhead (seeking
    /// and starting its media source); with no base clip, advance falls back
    /// to the wall clock.
    pub fn play<P: MediaProvider>(&mut self, project: &Project, provider: &mut P) {
        if self.state == TransportState::Playing {
            return;
        }
        self.state = TransportState::Playing;
        self.last_tick = None;
        // Force a fresh bind so the media source is positioned and started.
        if let Some(old) = self.active.take() {
            provider.pause(&old.source);
        }
        self.rebind(project, provider, self.playhead);
        debug!(frame = %self.playhead, "Playback started");
    }

    /// Playing → Paused. The last rendered frame remains displayed.
    pub fn pause<P: MediaProvider>(&mut self, provider: &mut P) {
        if self.state == TransportState::Paused {
            return;
        }
        if let Some(active) = &self.active {
            provider.pause(&active.source);
        }
        self.state = TransportState::Paused;
        self.last_tick = None;
        debug!(frame = %self.playhead, "Playback paused");
    }

    /// One scheduling tick (call once per display refresh while playing).
    /// Returns the frame rendered this tick, or `None` when paused or when
    /// the tick reached the timeline end.
    pub fn tick<P: MediaProvider>(
        &mut self,
        project: &Project,
        provider: &mut P,
    ) -> Option<FrameNumber> {
        self.tick_at(project, provider, Instant::now())
    }

    /// [`tick`](Self::tick) with an explicit clock reading.
    pub fn tick_at<P: MediaProvider>(
        &mut self,
        project: &Project,
        provider: &mut P,
        now: Instant,
    ) -> Option<FrameNumber> {
        if self.state != TransportState::Playing {
            return None;
        }

        let fps = project.fps;
        let active = self.active.clone();
        let next = match &active {
            Some(active) => {
                let position = provider.playback_position(&active.source);
                let clip = project.find_clip(&active.clip_id);
                match (position, clip) {
                    (Some(position), Some(clip)) => {
                        let speed = match &clip.data {
                            ClipData::Video(params) => params.clamped_speed(),
                            _ => 1.0,
                        };
                        let offset =
                            (position.as_secs() * fps as f64 * speed).round().max(0.0) as u64;
                        FrameNumber(clip.start.0 + offset)
                    }
                    _ => self.wall_clock_step(fps, now),
                }
            }
            None => self.wall_clock_step(fps, now),
        };

        if next.0 >= project.duration_frames {
            debug!(frame = %next, "Reached timeline end");
            self.pause(provider);
            return None;
        }

        // The playhead may have crossed into a different base clip.
        self.rebind(project, provider, next);

        if next != self.playhead {
            self.playhead = next;
            self.bus.emit(EngineEvent::PlayheadChanged { frame: next });
        }
        self.render_current(project, provider);
        Some(next)
    }

    /// The project was mutated externally: stop cleanly and re-render the
    /// current frame against the new state.
    pub fn project_rebuilt<P: MediaProvider>(&mut self, project: &Project, provider: &mut P) {
        self.pause(provider);
        self.active = None;
        let _ = self.seek(project, provider, self.playhead);
    }

    /// Wall-clock advance: `max(1, floor(Δt_ms × fps / 1000))` from the
    /// current playhead.
    fn wall_clock_step(&mut self, fps: u32, now: Instant) -> FrameNumber {
        let last = *self.last_tick.get_or_insert(now);
        let dt_ms = now.duration_since(last).as_millis() as u64;
        let step = (dt_ms * fps as u64 / 1000).max(1);
        self.last_tick = Some(now);
        self.playhead + step
    }

    /// Ensure the media binding matches the base clip resolved at `frame`.
    /// Only meaningful while playing: binding seeks the source to the local
    /// time and starts it.
    fn rebind<P: MediaProvider>(
        &mut self,
        project: &Project,
        provider: &mut P,
        frame: FrameNumber,
    ) {
        let resolved = resolve(project, frame);
        let target = resolved.base.and_then(|clip| {
            clip.source
                .clone()
                .map(|source| (clip.id.clone(), source, clip))
        });

        if let (Some(active), Some((clip_id, _, _))) = (&self.active, &target) {
            if active.clip_id == *clip_id {
                return;
            }
        }
        if self.active.is_none() && target.is_none() {
            return;
        }

        if let Some(old) = self.active.take() {
            provider.pause(&old.source);
        }

        let Some((clip_id, source, clip)) = target else {
            debug!(frame = %frame, "No base clip, advancing on wall clock");
            return;
        };

        let speed = match &clip.data {
            ClipData::Video(params) => params.clamped_speed(),
            _ => 1.0,
        };
        let offset = (frame - clip.start).max(0) as f64;
        let local_time = fc_common::TimeCode::from_secs(offset / (project.fps as f64 * speed));

        provider.set_rate(&source, speed);
        let bound = provider
            .position_at(&source, local_time)
            .and_then(|_| provider.play(&source));
        match bound {
            Ok(()) => {
                debug!(clip_id = %clip_id, source = %source, "Base media bound");
                self.active = Some(ActiveBase { clip_id, source });
            }
            Err(err) => {
                warn!(clip_id = %clip_id, source = %source, error = %err, "Base media bind failed");
                self.bus.emit(EngineEvent::MediaInvalid { clip_id, source });
            }
        }
    }

    /// Render the frame at the playhead and notify. Happens strictly after
    /// the playhead update for this tick.
    fn render_current<P: MediaProvider>(&mut self, project: &Project, provider: &P) {
        let layers = evaluate(project, self.playhead);
        let options = RenderOptions {
            editing_clip: self.editing_clip.clone(),
        };
        let rendered = self.compositor.render(&layers, provider, &options);
        if !rendered.pending.is_empty() {
            debug!(
                pending = rendered.pending.len(),
                frame = %self.playhead,
                "Render incomplete, sources pending"
            );
        }
        self.pending_sources = rendered.pending;
        self.last_frame = Some(rendered.buffer);
        self.bus.emit(EngineEvent::Rendered {
            frame: self.playhead,
        });
    }
}
