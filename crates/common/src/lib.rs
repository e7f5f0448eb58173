//! `fc-common` — Shared types, traits, and events for the Framecut engine.
//!
//! This crate is the foundation that all other engine crates depend on.
//! It defines the core abstractions:
//!
//! - **Types**: `FrameNumber`, `TimeCode`, `Resolution`, `SourceId` (newtypes for safety)
//! - **Frame**: `PixelBuffer` (RGBA8 pixel data flowing through the pipeline)
//! - **Layer**: `FrameLayers`, `BaseLayer`, `TextLayer`, `StickerLayer` (compositor interface)
//! - **Params**: `ParamValue` (typed clip parameter values for notifications)
//! - **Events**: `EngineEvent`, `EventBus` (publish/subscribe notification bus)
//! - **Config**: `RenderSettings` (output dimensions and background)

pub mod config;
pub mod events;
pub mod frame;
pub mod layer;
pub mod param;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{RenderSettings, DEFAULT_BACKGROUND};
pub use events::{EngineEvent, EventBus};
pub use frame::PixelBuffer;
pub use layer::{
    BaseLayer, FrameLayers, GradeParams, OverlayLayer, OverlayTransform, StickerLayer, TextLayer,
};
pub use param::ParamValue;
pub use types::{FrameNumber, Resolution, SourceId, TimeCode};
