//! `fc-timeline-eval` — Per-frame timeline resolution for the Framecut engine.
//!
//! Given a project and a frame number, this crate answers "what is on
//! screen": [`resolve`] selects the active base and overlay clips, and
//! [`evaluate`] translates them into the layer descriptions the compositor
//! consumes. [`active_audio`] resolves audio clips separately for mixing.

pub mod evaluator;

pub use evaluator::{active_audio, evaluate, resolve, AudioLayer, ResolvedFrame};
