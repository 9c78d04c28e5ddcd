// src/edit/store.rs

use std::sync::Arc;

use crate::audio::{load_artifact, ArtifactRef, AudioInfo};
use crate::error::Result;

/// Owns the loaded source and the artifact produced by the latest edit
#[derive(Debug)]
pub struct SegmentStore {
    source: ArtifactRef,
    current: ArtifactRef,
    source_name: Option<String>,
    info: AudioInfo,
}

impl SegmentStore {
    /// Probe `bytes` and start a store with them as both source and current
    ///
    /// Fails with a decode error if no duration can be determined.
    pub fn load(bytes: Vec<u8>, mime_type: &str, source_name: Option<String>) -> Result<Self> {
        let (artifact, info) = load_artifact(bytes, mime_type)?;
        let source = Arc::new(artifact);

        tracing::info!(
            name = source_name.as_deref().unwrap_or("<unnamed>"),
            duration = source.duration_seconds(),
            bytes = source.len(),
            sample_accurate = source.is_sample_accurate(),
            "Audio loaded"
        );

        Ok(Self {
            current: Arc::clone(&source),
            source,
            source_name,
            info,
        })
    }

    pub fn current(&self) -> &ArtifactRef {
        &self.current
    }

    /// The artifact as originally loaded, before any edit
    pub fn source(&self) -> &ArtifactRef {
        &self.source
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Probe results of the source, with the duration of the current artifact
    pub fn info(&self) -> AudioInfo {
        AudioInfo {
            duration_seconds: self.current.duration_seconds(),
            ..self.info.clone()
        }
    }

    pub fn duration(&self) -> f64 {
        self.current.duration_seconds()
    }

    /// Swap in a new current artifact
    pub(crate) fn replace(&mut self, artifact: ArtifactRef) {
        self.current = artifact;
    }

    #[cfg(test)]
    pub(crate) fn from_artifact(artifact: crate::audio::AudioArtifact) -> Self {
        let info = AudioInfo {
            duration_seconds: artifact.duration_seconds(),
            sample_rate: 0,
            channels: 0,
            format: "test".to_string(),
            bit_depth: None,
        };
        let source = Arc::new(artifact);
        Self {
            current: Arc::clone(&source),
            source,
            source_name: None,
            info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::encoder::test_wav_bytes;
    use crate::audio::AudioArtifact;

    #[test]
    fn test_load_sets_source_and_current() {
        let store =
            SegmentStore::load(test_wav_bytes(3.0, 8000, 1), "audio/wav", Some("a.wav".into()))
                .unwrap();

        assert!(Arc::ptr_eq(store.source(), store.current()));
        assert_eq!(store.duration(), 3.0);
        assert_eq!(store.source_name(), Some("a.wav"));
        assert_eq!(store.info().sample_rate, 8000);
    }

    #[test]
    fn test_replace_keeps_source() {
        let mut store = SegmentStore::load(test_wav_bytes(3.0, 8000, 1), "audio/wav", None).unwrap();
        let edited = Arc::new(AudioArtifact::approximate(vec![1u8; 10], 1.0, "audio/wav").unwrap());

        store.replace(Arc::clone(&edited));

        assert!(Arc::ptr_eq(store.current(), &edited));
        assert_eq!(store.source().duration_seconds(), 3.0);
        assert_eq!(store.info().duration_seconds, 1.0);
    }

    #[test]
    fn test_load_failure_is_reported() {
        assert!(SegmentStore::load(vec![0u8; 64], "audio/mpeg", None).is_err());
    }
}
