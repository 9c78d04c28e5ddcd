//! Timeline edit engine for trimming audio.
//!
//! A presentation layer loads a file, moves a selection around and calls
//! cut/remove/undo/redo on an [`EditEngine`] (or a shared [`Session`]),
//! re-rendering from the returned [`ArtifactSummary`] after every call.

pub mod audio;
pub mod config;
pub mod edit;
pub mod error;
pub mod export;
pub mod session;
pub mod shell;

// Re-export for convenience
pub use audio::{ArtifactRef, AudioArtifact, AudioInfo};
pub use config::EngineConfig;
pub use edit::{ArtifactSummary, EditEngine, EditKind, EngineState, Selection};
pub use error::{AudioError, Result};
pub use export::{ExportFormat, ExportedAudio};
pub use session::Session;
