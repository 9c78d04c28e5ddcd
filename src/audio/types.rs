use hound::{SampleFormat, WavSpec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::{AudioError, Result};

/// Shared handle to an artifact.
///
/// The current pointer and every history record hold these, so a buffer is
/// kept alive exactly as long as something can still reach it via undo/redo.
pub type ArtifactRef = Arc<AudioArtifact>;

/// Sample layout of a WAV artifact that can be edited frame-accurately
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmLayout {
    /// Sample rate in Hz (e.g., 44100, 48000)
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Bits per sample as stored in the file
    pub bits_per_sample: u16,

    /// IEEE float samples rather than integer PCM
    pub float: bool,
}

impl PcmLayout {
    pub fn from_spec(spec: WavSpec) -> Self {
        Self {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            float: spec.sample_format == SampleFormat::Float,
        }
    }

    pub fn spec(&self) -> WavSpec {
        WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: if self.float {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }

    /// Convert a time in seconds to a frame index (one sample per channel)
    pub fn frame_at(&self, seconds: f64) -> usize {
        (seconds * self.sample_rate as f64).round() as usize
    }
}

/// How selection times map onto the artifact's bytes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ByteLayout {
    /// Uncompressed WAV: times map to whole frames and the header is rewritten
    Pcm(PcmLayout),

    /// Any other container: times map to `round(t * byte_rate)` over the raw
    /// bytes. Not sample-accurate for compressed formats.
    Approximate { byte_rate: f64 },
}

/// An immutable encoded audio buffer plus the metadata the engine edits by
///
/// Artifacts are never mutated; an edit produces a new one.
pub struct AudioArtifact {
    bytes: Vec<u8>,
    duration_seconds: f64,
    mime_type: String,
    layout: ByteLayout,
}

impl AudioArtifact {
    pub(crate) fn new(
        bytes: Vec<u8>,
        duration_seconds: f64,
        mime_type: impl Into<String>,
        layout: ByteLayout,
    ) -> Self {
        Self {
            bytes,
            duration_seconds,
            mime_type: mime_type.into(),
            layout,
        }
    }

    /// Build an artifact edited by byte-rate approximation
    ///
    /// The byte rate is derived from the whole buffer: `len / duration`.
    pub fn approximate(
        bytes: Vec<u8>,
        duration_seconds: f64,
        mime_type: impl Into<String>,
    ) -> Result<Self> {
        if bytes.is_empty() {
            return Err(AudioError::Decode("Audio buffer is empty".to_string()));
        }
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(AudioError::Decode(format!(
                "Duration could not be determined (got {})",
                duration_seconds
            )));
        }

        let byte_rate = bytes.len() as f64 / duration_seconds;
        Ok(Self::new(
            bytes,
            duration_seconds,
            mime_type,
            ByteLayout::Approximate { byte_rate },
        ))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn layout(&self) -> ByteLayout {
        self.layout
    }

    /// True when edits on this artifact land on exact sample boundaries
    pub fn is_sample_accurate(&self) -> bool {
        matches!(self.layout, ByteLayout::Pcm(_))
    }
}

impl fmt::Debug for AudioArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioArtifact")
            .field("len", &self.bytes.len())
            .field("duration_seconds", &self.duration_seconds)
            .field("mime_type", &self.mime_type)
            .field("layout", &self.layout)
            .finish()
    }
}

/// Metadata about a loaded audio file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioInfo {
    /// Total duration in seconds
    pub duration_seconds: f64,

    /// Sample rate in Hz, 0 if the container does not say
    pub sample_rate: u32,

    /// Number of channels, 0 if the container does not say
    pub channels: u16,

    /// Audio format/codec name (e.g., "PCM_S16LE", "MP3", "FLAC")
    pub format: String,

    /// Bit depth if available (e.g., 16, 24)
    pub bit_depth: Option<u16>,
}
