//! Editor event vocabulary and the emitter abstraction
//!
//! The facade exposes publish/subscribe over a closed set of events. Any type
//! implementing [`EventEmitter`] can back it; [`LocalEmitter`] is the
//! in-process default.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

use crate::document::{DocChar, Position, RemoteCursor, TextChange};

/// Names of all events the editor emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PositionChange,
    SelectionChange,
    FocusGained,
    FocusLost,
    RemoteCursorAdd,
    RemoteCursorRemove,
    RemoteCursorChangeName,
    TextInsert,
    TextDelete,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::PositionChange,
        EventKind::SelectionChange,
        EventKind::FocusGained,
        EventKind::FocusLost,
        EventKind::RemoteCursorAdd,
        EventKind::RemoteCursorRemove,
        EventKind::RemoteCursorChangeName,
        EventKind::TextInsert,
        EventKind::TextDelete,
    ];

    /// Wire name of the event, as hosts know it
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PositionChange => "position-change",
            Self::SelectionChange => "selection-change",
            Self::FocusGained => "focus-gained",
            Self::FocusLost => "focus-lost",
            Self::RemoteCursorAdd => "remote-cursor-add",
            Self::RemoteCursorRemove => "remote-cursor-remove",
            Self::RemoteCursorChangeName => "remote-cursor-change-name",
            Self::TextInsert => "text-insert",
            Self::TextDelete => "text-delete",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event together with its collaborator-supplied payload
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    PositionChange(Position),
    SelectionChange(Vec<DocChar>),
    FocusGained,
    FocusLost,
    RemoteCursorAdd(RemoteCursor),
    RemoteCursorRemove(RemoteCursor),
    RemoteCursorChangeName(RemoteCursor),
    TextInsert(TextChange),
    TextDelete(TextChange),
}

impl EditorEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PositionChange(_) => EventKind::PositionChange,
            Self::SelectionChange(_) => EventKind::SelectionChange,
            Self::FocusGained => EventKind::FocusGained,
            Self::FocusLost => EventKind::FocusLost,
            Self::RemoteCursorAdd(_) => EventKind::RemoteCursorAdd,
            Self::RemoteCursorRemove(_) => EventKind::RemoteCursorRemove,
            Self::RemoteCursorChangeName(_) => EventKind::RemoteCursorChangeName,
            Self::TextInsert(_) => EventKind::TextInsert,
            Self::TextDelete(_) => EventKind::TextDelete,
        }
    }
}

/// Host callback invoked with each matching event
pub type Callback = Arc<dyn Fn(&EditorEvent) + Send + Sync>;

/// Register/emit/query capability set backing the facade's event surface
pub trait EventEmitter: Send + Sync {
    /// Register a callback; registrations are additive
    fn on(&self, kind: EventKind, callback: Callback);

    /// Deliver an event to every callback registered for its kind, in
    /// registration order. Returns whether any callback was invoked.
    fn emit(&self, event: &EditorEvent) -> bool;

    /// Number of callbacks registered for `kind`
    fn listener_count(&self, kind: EventKind) -> usize;

    fn has_listeners(&self, kind: EventKind) -> bool {
        self.listener_count(kind) > 0
    }
}

/// Default in-process emitter
#[derive(Default)]
pub struct LocalEmitter {
    listeners: Mutex<HashMap<EventKind, Vec<Callback>>>,
}

impl LocalEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<dyn EventEmitter> {
        Arc::new(Self::new())
    }
}

impl fmt::Debug for LocalEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&'static str, usize> = self
            .listeners
            .lock()
            .map(|map| map.iter().map(|(k, v)| (k.as_str(), v.len())).collect())
            .unwrap_or_default();
        f.debug_struct("LocalEmitter").field("listeners", &counts).finish()
    }
}

impl EventEmitter for LocalEmitter {
    fn on(&self, kind: EventKind, callback: Callback) {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        let entry = listeners.entry(kind).or_default();
        entry.push(callback);
        debug!(event = %kind, count = entry.len(), "Registered event listener");
    }

    fn emit(&self, event: &EditorEvent) -> bool {
        let kind = event.kind();
        // Snapshot under the lock so callbacks may register further listeners
        let callbacks: Vec<Callback> = {
            let listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
            listeners.get(&kind).cloned().unwrap_or_default()
        };

        trace!(event = %kind, listeners = callbacks.len(), "Emitting event");
        for callback in &callbacks {
            callback(event);
        }
        !callbacks.is_empty()
    }

    fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&kind)
            .map_or(0, Vec::len)
    }
}
