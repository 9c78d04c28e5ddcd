//! Undo/redo history of applied edits.
//!
//! Each record holds shared references to the artifact before and after the
//! edit, so undo and redo swap pointers instead of recomputing audio:
//! - Two stacks, most recent last
//! - Pushing a new record clears the redo stack (new branch)
//! - An optional depth limit evicts the oldest records; their artifacts are
//!   freed as soon as nothing else references them

use serde::Serialize;
use std::fmt;

use crate::audio::ArtifactRef;
use crate::edit::selection::Selection;

/// The kind of destructive edit a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    /// Keep only the selection
    Cut,
    /// Delete the selection and join the remainder
    Remove,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditKind::Cut => write!(f, "cut"),
            EditKind::Remove => write!(f, "remove"),
        }
    }
}

/// One applied edit. Immutable once created.
#[derive(Debug, Clone)]
pub struct EditRecord {
    pub kind: EditKind,
    /// The selection that was active when the edit was applied
    pub selection: Selection,
    pub before: ArtifactRef,
    pub after: ArtifactRef,
}

#[derive(Debug, Default)]
pub struct EditHistory {
    undo_stack: Vec<EditRecord>,
    redo_stack: Vec<EditRecord>,
    /// Maximum undo depth; `None` keeps everything
    limit: Option<usize>,
}

impl EditHistory {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Record a freshly applied edit and drop the redo branch
    pub fn push(&mut self, record: EditRecord) {
        self.redo_stack.clear();
        self.undo_stack.push(record);

        if let Some(limit) = self.limit {
            while self.undo_stack.len() > limit {
                let evicted = self.undo_stack.remove(0);
                tracing::debug!(kind = %evicted.kind, "History limit reached, oldest edit evicted");
            }
        }

        tracing::debug!(
            undo_depth = self.undo_stack.len(),
            "History entry pushed"
        );
    }

    /// Move the most recent edit to the redo stack and return it
    pub fn undo(&mut self) -> Option<&EditRecord> {
        let record = self.undo_stack.pop()?;
        self.redo_stack.push(record);
        self.redo_stack.last()
    }

    /// Move the most recently undone edit back to the undo stack and return it
    pub fn redo(&mut self) -> Option<&EditRecord> {
        let record = self.redo_stack.pop()?;
        self.undo_stack.push(record);
        self.undo_stack.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}
