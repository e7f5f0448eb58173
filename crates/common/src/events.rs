//! Typed engine notifications and the publish/subscribe bus.
//!
//! The core emits [`EngineEvent`]s for the hosting UI (playhead movement,
//! rendered frames, export progress); consumers subscribe and receive events
//! over a crossbeam channel. Subscribers that drop their receiver are pruned
//! on the next emit.

use crossbeam::channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::param::ParamValue;
use crate::types::{FrameNumber, SourceId};

/// Notification emitted by the engine core.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// The shared playhead moved.
    PlayheadChanged { frame: FrameNumber },
    /// A frame finished rendering. Always preceded by the corresponding
    /// `PlayheadChanged` within the same tick.
    Rendered { frame: FrameNumber },
    /// A clip parameter was changed through the model.
    ClipDataChanged {
        clip_id: String,
        key: String,
        value: ParamValue,
    },
    /// Export progress, one per exported frame plus a terminal 100% event.
    ExportProgress {
        current: u64,
        total: u64,
        percent: u8,
    },
    /// Export finished; `ok` is false when the sink produced no data.
    ExportComplete { ok: bool },
    /// A clip's media source could not be bound (stale handle, decode failure).
    MediaInvalid { clip_id: String, source: SourceId },
}

/// Fan-out event bus.
///
/// `emit` delivers a clone of the event to every live subscriber. Emission
/// never blocks and never fails; disconnected subscribers are dropped.
#[derive(Default)]
pub struct EventBus {
    senders: Mutex<Vec<Sender<EngineEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber and return its receiving end.
    pub fn subscribe(&self) -> Receiver<EngineEvent> {
        let (tx, rx) = unbounded();
        self.senders.lock().push(tx);
        rx
    }

    /// Deliver an event to all live subscribers.
    pub fn emit(&self, event: EngineEvent) {
        let mut senders = self.senders.lock();
        senders.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of live subscribers (as of the last emit).
    pub fn subscriber_count(&self) -> usize {
        self.senders.lock().len()
    }
}
