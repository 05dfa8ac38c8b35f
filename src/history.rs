//! Bounded linear undo/redo history of scene snapshots.
//!
//! The history always holds at least one entry (the state the cursor points
//! at). Committing after an undo discards the redo branch; the oldest entries
//! fall off once the limit is reached.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::doc::{CanvasObject, Scene};

/// Owned copy of both sides and the canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub front: Vec<CanvasObject>,
    pub back: Vec<CanvasObject>,
    pub width: f64,
    pub height: f64,
}

impl Snapshot {
    /// Deep-copy the scene's object collections and dimensions.
    #[must_use]
    pub fn capture(scene: &Scene) -> Self {
        Self {
            front: scene.front.objects().to_vec(),
            back: scene.back.objects().to_vec(),
            width: scene.width,
            height: scene.height,
        }
    }

    /// Overwrite the scene's objects and dimensions. The active side is untouched.
    pub fn restore(&self, scene: &mut Scene) {
        scene.front.load_snapshot(self.front.clone());
        scene.back.load_snapshot(self.back.clone());
        scene.width = self.width;
        scene.height = self.height;
    }
}

/// Undo/redo stack with a movable cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// Start a history whose only entry is `initial`. `limit` is at least 1.
    #[must_use]
    pub fn new(initial: Snapshot, limit: usize) -> Self {
        Self { entries: vec![initial], cursor: 0, limit: limit.max(1) }
    }

    /// Record a new state after the cursor, dropping any redo entries and the
    /// oldest entries beyond the limit.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
        tracing::debug!(cursor = self.cursor, len = self.entries.len(), "history commit");
    }

    /// Step back one entry and return it, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        tracing::debug!(cursor = self.cursor, "history undo");
        self.entries.get(self.cursor)
    }

    /// Step forward one entry and return it, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        tracing::debug!(cursor = self.cursor, "history redo");
        self.entries.get(self.cursor)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The entry the cursor points at.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor)
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; the history is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}
