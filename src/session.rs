// src/session.rs
//! Shared, serialized access to one [`EditEngine`].
//!
//! Calls from any number of tasks are funnelled through a single mutex, so
//! at most one operation touches the engine at a time. File ingestion is the
//! only async step: reading and probing run on tokio's blocking pool, and the
//! result is installed in one go.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::audio::AudioInfo;
use crate::config::EngineConfig;
use crate::edit::{ArtifactSummary, EditEngine, EngineState, SegmentStore, Selection};
use crate::error::{AudioError, Result};
use crate::export::{mime_for_extension, ExportedAudio};

#[derive(Debug, Clone, Default)]
pub struct Session {
    engine: Arc<Mutex<EditEngine>>,
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: Arc::new(Mutex::new(EditEngine::new(config))),
        }
    }

    fn engine(&self) -> MutexGuard<'_, EditEngine> {
        // A poisoned lock still guards a consistent engine
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the engine
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut EditEngine) -> R) -> R {
        f(&mut self.engine())
    }

    /// Read an audio file from disk and make it the active file
    ///
    /// The MIME type is inferred from the file extension.
    pub async fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<f64> {
        let path = path.as_ref().to_path_buf();

        // Run blocking file I/O and probing in a dedicated thread pool
        let store = tokio::task::spawn_blocking(move || read_source(&path))
            .await
            .map_err(|e| {
                AudioError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Task join error: {}", e),
                ))
            })??;

        Ok(self.engine().install(store))
    }

    pub fn load_bytes(&self, bytes: Vec<u8>, mime_type: &str, name: Option<String>) -> Result<f64> {
        self.engine().load_named(bytes, mime_type, name)
    }

    pub fn close(&self) {
        self.engine().close()
    }

    pub fn state(&self) -> EngineState {
        self.engine().state()
    }

    pub fn set_selection(&self, start: f64, end: f64) -> Result<()> {
        self.engine().set_selection(start, end)
    }

    pub fn selection(&self) -> Option<Selection> {
        self.engine().selection()
    }

    pub fn summary(&self) -> Option<ArtifactSummary> {
        self.engine().summary()
    }

    pub fn info(&self) -> Option<AudioInfo> {
        self.engine().info()
    }

    pub fn cut(&self) -> Result<ArtifactSummary> {
        self.engine().cut()
    }

    pub fn remove(&self) -> Result<ArtifactSummary> {
        self.engine().remove()
    }

    pub fn undo(&self) -> Result<ArtifactSummary> {
        self.engine().undo()
    }

    pub fn redo(&self) -> Result<ArtifactSummary> {
        self.engine().redo()
    }

    pub fn export(&self, format_label: Option<&str>) -> Result<ExportedAudio> {
        self.engine().export(format_label)
    }
}

/// Read and probe a source file, off the async runtime
fn read_source(path: &Path) -> Result<SegmentStore> {
    let bytes = std::fs::read(path).map_err(|e| AudioError::FileOpen {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    let mime_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(mime_for_extension)
        .unwrap_or("application/octet-stream");

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string());

    SegmentStore::load(bytes, mime_type, name)
}
