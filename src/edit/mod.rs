// src/edit/mod.rs

pub mod engine;
pub mod history;
pub mod selection;
pub mod store;

pub use engine::{ArtifactSummary, EditEngine, EngineState};
pub use history::{EditHistory, EditKind, EditRecord};
pub use selection::{Selection, SelectionModel};
pub use store::SegmentStore;
