// src/edit/engine.rs

use serde::Serialize;
use std::sync::Arc;

use crate::audio::{cut_range, remove_range, ArtifactRef, AudioInfo};
use crate::config::EngineConfig;
use crate::edit::history::{EditHistory, EditKind, EditRecord};
use crate::edit::selection::{Selection, SelectionModel};
use crate::edit::store::SegmentStore;
use crate::error::{AudioError, Result};
use crate::export::{export_filename, ExportFormat, ExportedAudio};

/// Whether a file is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EngineState {
    Idle,
    Ready,
}

/// What the presentation layer re-renders from after every call
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArtifactSummary {
    pub duration_seconds: f64,
    pub selection: Selection,
}

/// Everything that belongs to one loaded file
#[derive(Debug)]
struct Workspace {
    store: SegmentStore,
    selection: SelectionModel,
    history: EditHistory,
}

impl Workspace {
    fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            duration_seconds: self.store.duration(),
            selection: self.selection.get(),
        }
    }
}

/// The single source of truth for an editing session
///
/// Every operation runs to completion and either succeeds or leaves the
/// engine exactly as it was.
///
/// # Example
/// ```
/// use audio_cutter_lib::edit::EditEngine;
/// use audio_cutter_lib::audio::{encode_wav_bytes, PcmLayout, PcmSamples};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let layout = PcmLayout { sample_rate: 100, channels: 1, bits_per_sample: 16, float: false };
/// let wav = encode_wav_bytes(&layout, &PcmSamples::Int(vec![0; 1000]))?;
///
/// let mut engine = EditEngine::default();
/// assert_eq!(engine.load(wav, "audio/wav")?, 10.0);
///
/// engine.set_selection(2.0, 4.0)?;
/// assert_eq!(engine.cut()?.duration_seconds, 2.0);
///
/// let restored = engine.undo()?;
/// assert_eq!(restored.duration_seconds, 10.0);
/// assert_eq!((restored.selection.start, restored.selection.end), (2.0, 4.0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct EditEngine {
    config: EngineConfig,
    workspace: Option<Workspace>,
}

impl EditEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            workspace: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        match self.workspace {
            Some(_) => EngineState::Ready,
            None => EngineState::Idle,
        }
    }

    /// Load new source bytes, returning their duration in seconds
    pub fn load(&mut self, bytes: Vec<u8>, mime_type: &str) -> Result<f64> {
        self.load_named(bytes, mime_type, None)
    }

    /// Load new source bytes, remembering the original file name for export
    ///
    /// Selection is reset to the full duration and history is emptied. If the
    /// bytes cannot be decoded the previous file, if any, stays loaded.
    pub fn load_named(
        &mut self,
        bytes: Vec<u8>,
        mime_type: &str,
        source_name: Option<String>,
    ) -> Result<f64> {
        let store = SegmentStore::load(bytes, mime_type, source_name)?;
        Ok(self.install(store))
    }

    /// Make an already probed store the active file, returning its duration
    pub(crate) fn install(&mut self, store: SegmentStore) -> f64 {
        let duration = store.duration();

        self.workspace = Some(Workspace {
            selection: SelectionModel::full(duration),
            history: EditHistory::new(self.config.history_limit),
            store,
        });

        duration
    }

    /// Drop the loaded file and its history
    pub fn close(&mut self) {
        if self.workspace.take().is_some() {
            tracing::info!("Audio closed");
        }
    }

    pub fn set_selection(&mut self, start: f64, end: f64) -> Result<()> {
        let workspace = self.workspace.as_mut().ok_or(AudioError::NotLoaded)?;
        let duration = workspace.store.duration();
        workspace.selection.set(start, end, duration)?;
        tracing::debug!(start, end, "Selection updated");
        Ok(())
    }

    pub fn selection(&self) -> Option<Selection> {
        self.workspace.as_ref().map(|w| w.selection.get())
    }

    /// Selection bounds in minutes, rounded to 2 decimals
    pub fn selection_minutes(&self) -> Option<(f64, f64)> {
        self.workspace.as_ref().map(|w| w.selection.as_minutes())
    }

    pub fn summary(&self) -> Option<ArtifactSummary> {
        self.workspace.as_ref().map(Workspace::summary)
    }

    pub fn current(&self) -> Option<&ArtifactRef> {
        self.workspace.as_ref().map(|w| w.store.current())
    }

    pub fn info(&self) -> Option<AudioInfo> {
        self.workspace.as_ref().map(|w| w.store.info())
    }

    pub fn source_name(&self) -> Option<&str> {
        self.workspace.as_ref().and_then(|w| w.store.source_name())
    }

    /// Duration of the file as loaded, before any edit
    pub fn source_duration(&self) -> Option<f64> {
        self.workspace
            .as_ref()
            .map(|w| w.store.source().duration_seconds())
    }

    /// Keep only the selected range
    ///
    /// Selecting the whole file makes this a no-op that is still recorded,
    /// so that undo and redo stay symmetric.
    pub fn cut(&mut self) -> Result<ArtifactSummary> {
        self.apply(EditKind::Cut)
    }

    /// Delete the selected range and join what is left on either side
    pub fn remove(&mut self) -> Result<ArtifactSummary> {
        self.apply(EditKind::Remove)
    }

    fn apply(&mut self, kind: EditKind) -> Result<ArtifactSummary> {
        let workspace = self.workspace.as_mut().ok_or(AudioError::NotLoaded)?;
        let selection = workspace.selection.get();
        let before = Arc::clone(workspace.store.current());

        let after = match kind {
            EditKind::Cut if selection.spans(before.duration_seconds()) => Arc::clone(&before),
            EditKind::Cut => Arc::new(cut_range(&before, selection.start, selection.end)?),
            EditKind::Remove => Arc::new(remove_range(&before, selection.start, selection.end)?),
        };

        tracing::debug!(
            %kind,
            start = selection.start,
            end = selection.end,
            before = before.duration_seconds(),
            after = after.duration_seconds(),
            "Edit applied"
        );

        workspace.history.push(EditRecord {
            kind,
            selection,
            before,
            after: Arc::clone(&after),
        });
        workspace.selection.reset(after.duration_seconds());
        workspace.store.replace(after);

        Ok(workspace.summary())
    }

    /// Step back one edit, restoring the artifact and selection from before it
    ///
    /// With nothing to undo this returns [`AudioError::NothingToUndo`] and
    /// changes nothing.
    pub fn undo(&mut self) -> Result<ArtifactSummary> {
        let Some(workspace) = self.workspace.as_mut() else {
            return Err(AudioError::NothingToUndo);
        };

        let Some(record) = workspace.history.undo().cloned() else {
            tracing::debug!("Undo requested with empty history");
            return Err(AudioError::NothingToUndo);
        };

        workspace.store.replace(record.before);
        workspace.selection.restore(record.selection);

        tracing::debug!(
            kind = %record.kind,
            undo_depth = workspace.history.undo_depth(),
            "Undo"
        );

        Ok(workspace.summary())
    }

    /// Re-apply the most recently undone edit
    ///
    /// The selection goes back to the full width of the re-applied artifact,
    /// the same state the edit originally left behind.
    pub fn redo(&mut self) -> Result<ArtifactSummary> {
        let Some(workspace) = self.workspace.as_mut() else {
            return Err(AudioError::NothingToRedo);
        };

        let Some(record) = workspace.history.redo().cloned() else {
            tracing::debug!("Redo requested with empty redo stack");
            return Err(AudioError::NothingToRedo);
        };

        workspace.selection.reset(record.after.duration_seconds());
        workspace.store.replace(record.after);

        tracing::debug!(
            kind = %record.kind,
            redo_depth = workspace.history.redo_depth(),
            "Redo"
        );

        Ok(workspace.summary())
    }

    pub fn can_undo(&self) -> bool {
        self.workspace.as_ref().is_some_and(|w| w.history.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.workspace.as_ref().is_some_and(|w| w.history.can_redo())
    }

    pub fn undo_depth(&self) -> usize {
        self.workspace.as_ref().map_or(0, |w| w.history.undo_depth())
    }

    pub fn redo_depth(&self) -> usize {
        self.workspace.as_ref().map_or(0, |w| w.history.redo_depth())
    }

    /// Package the current artifact for download
    ///
    /// `format_label` only names the file; `None` uses the configured default.
    pub fn export(&self, format_label: Option<&str>) -> Result<ExportedAudio> {
        let workspace = self.workspace.as_ref().ok_or(AudioError::NotLoaded)?;
        let format: ExportFormat = format_label
            .unwrap_or(self.config.default_format.as_str())
            .parse()?;

        let filename = export_filename(
            workspace.store.source_name(),
            &self.config.default_name,
            format,
        );

        tracing::info!(%filename, %format, "Exporting current audio");
        Ok(ExportedAudio::new(Arc::clone(workspace.store.current()), filename))
    }
}
