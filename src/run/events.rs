//! Event system for runs
//!
//! Provides typed event emission for run lifecycle events

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::RunMode;

/// Runtime event types emitted over the life of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RunEvent {
    RunStarted {
        run_id: String,
        mode: RunMode,
        task_count: usize,
    },
    TaskStarted {
        run_id: String,
        position: usize,
        task_id: String,
    },
    TaskCompleted {
        run_id: String,
        position: usize,
        task_id: String,
        success: bool,
        duration_ms: u64,
        /// True when the run had already reached a terminal state; such
        /// outcomes are observed here but never change the run result
        late: bool,
    },
    RunCompleted {
        run_id: String,
        success: bool,
        duration_ms: u64,
    },
}

/// Event envelope with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEventEnvelope {
    pub sequence: u64,
    pub timestamp: u64,
    pub event: RunEvent,
}

/// Event sink trait for emitting events
pub trait EventSink: Send + Sync {
    /// Emit an event
    fn emit(&self, envelope: &RunEventEnvelope);
}

/// A simple logging event sink
pub struct LoggingEventSink;

impl EventSink for LoggingEventSink {
    fn emit(&self, envelope: &RunEventEnvelope) {
        tracing::debug!("Event: {:?}", envelope);
    }
}

/// A buffering event sink that collects events
pub struct BufferingEventSink {
    events: RwLock<Vec<RunEventEnvelope>>,
}

impl BufferingEventSink {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<RunEventEnvelope> {
        self.events.read().expect("event buffer poisoned").clone()
    }

    pub fn clear(&self) {
        self.events.write().expect("event buffer poisoned").clear();
    }
}

impl Default for BufferingEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for BufferingEventSink {
    fn emit(&self, envelope: &RunEventEnvelope) {
        self.events
            .write()
            .expect("event buffer poisoned")
            .push(envelope.clone());
    }
}

/// Global sequence counter for events
static EVENT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Get the next event sequence number
pub fn next_sequence() -> u64 {
    EVENT_SEQUENCE.fetch_add(1, Ordering::SeqCst)
}

/// Get current timestamp in milliseconds
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Emit an event through an optional sink
pub(crate) fn emit(sink: Option<&Arc<dyn EventSink>>, event: RunEvent) {
    if let Some(sink) = sink {
        let envelope = RunEventEnvelope {
            sequence: next_sequence(),
            timestamp: now_ms(),
            event,
        };
        sink.emit(&envelope);
    }
}
