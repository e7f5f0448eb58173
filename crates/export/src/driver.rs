//! Export driver — the deterministic, non-real-time frame pump.
//!
//! The driver freezes the scheduler's output dimensions, then walks every
//! frame from 0 through `duration_frames` inclusive using the synchronous
//! seek path, handing each composited buffer to the capture sink. Wall-clock
//! timing never skips or duplicates a frame because the real-time scheduler
//! path is bypassed entirely — the scheduler is forced to Paused before the
//! pump starts and stays there.
//!
//! Progress is reported as `(current, total, percent)` per frame with the
//! percentage floored, so 100% is reached exactly once, at the terminal
//! frame. Dimensions are restored on every exit path, success or failure.

use std::sync::Arc;

use fc_common::{EngineEvent, EventBus, FrameNumber, Resolution};
use fc_playback::{MediaProvider, PlaybackScheduler};
use fc_project::Project;
use tracing::{debug, info};

use crate::error::ExportError;
use crate::sink::CaptureSink;

/// Configuration for one export operation.
#[derive(Clone, Debug)]
pub struct ExportConfig {
    /// Output buffer dimensions, frozen for the duration of the export.
    pub resolution: Resolution,
    /// Capture rate override. Defaults to the project frame rate; the
    /// effective rate is clamped to [10, 60].
    pub fps: Option<u32>,
}

impl ExportConfig {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            fps: None,
        }
    }

    /// Effective capture rate for a project.
    pub fn effective_fps(&self, project_fps: u32) -> u32 {
        self.fps.unwrap_or(project_fps).clamp(10, 60)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(ExportError::InvalidConfig(
                "resolution must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of a completed export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportSummary {
    /// Number of buffers handed to the sink (`duration_frames + 1`).
    pub frames_written: u64,
    /// Bytes the sink reported persisting.
    pub bytes_written: u64,
    /// Frozen output resolution used for every frame.
    pub resolution: Resolution,
    /// Capture rate handed to the sink.
    pub fps: u32,
}

/// Drives a frame-locked export over the scheduler's synchronous seek path.
pub struct ExportDriver {
    config: ExportConfig,
    bus: Arc<EventBus>,
}

impl ExportDriver {
    pub fn new(config: ExportConfig, bus: Arc<EventBus>) -> Self {
        Self { config, bus }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Run the export. The scheduler is forced to Paused first, its output
    /// dimensions are frozen to the configured resolution, and every frame
    /// in `0..=duration_frames` is seeked, rendered, and written in order.
    ///
    /// On any failure — including a sink that reports zero bytes — the
    /// dimensions are restored, `export-complete(false)` is emitted, and the
    /// error is returned. Failures are never retried automatically.
    pub fn export<P: MediaProvider, S: CaptureSink>(
        &self,
        project: &Project,
        scheduler: &mut PlaybackScheduler,
        provider: &mut P,
        sink: &mut S,
    ) -> Result<ExportSummary, ExportError> {
        self.config.validate()?;

        // The real-time scheduler and the export pump must never run
        // concurrently on one project.
        scheduler.pause(provider);
        let previous = scheduler.freeze_resolution(self.config.resolution);

        info!(
            project = %project.name,
            resolution = %self.config.resolution,
            frames = project.duration_frames + 1,
            "Starting export"
        );

        let result = self.pump(project, scheduler, provider, sink);

        scheduler.unfreeze_resolution(previous);
        self.bus.emit(EngineEvent::ExportComplete {
            ok: result.is_ok(),
        });

        match &result {
            Ok(summary) => info!(
                frames = summary.frames_written,
                bytes = summary.bytes_written,
                "Export completed"
            ),
            Err(err) => tracing::error!(error = %err, "Export failed"),
        }
        result
    }

    fn pump<P: MediaProvider, S: CaptureSink>(
        &self,
        project: &Project,
        scheduler: &mut PlaybackScheduler,
        provider: &mut P,
        sink: &mut S,
    ) -> Result<ExportSummary, ExportError> {
        let total = project.duration_frames;
        let fps = self.config.effective_fps(project.fps);
        sink.begin(self.config.resolution, fps)?;

        for frame in 0..=total {
            let buffer = scheduler.seek(project, provider, FrameNumber(frame));
            sink.write(FrameNumber(frame), buffer)?;

            let percent = floor_percent(frame, total);
            self.bus.emit(EngineEvent::ExportProgress {
                current: frame,
                total,
                percent,
            });
            debug!(frame, total, percent, "Export frame written");
        }

        let bytes_written = sink.finish()?;
        if bytes_written == 0 {
            return Err(ExportError::EmptyOutput);
        }

        Ok(ExportSummary {
            frames_written: total + 1,
            bytes_written,
            resolution: self.config.resolution,
            fps,
        })
    }
}

/// Floored progress percentage: stays at 99 or below until `current`
/// reaches `total`, so 100 occurs exactly once.
fn floor_percent(current: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    (current as u128 * 100 / total as u128) as u8
}
