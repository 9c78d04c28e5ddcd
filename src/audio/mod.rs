// src/audio/mod.rs

pub mod encoder;
pub mod probe;
pub mod slice;
pub mod types;

// Re-export commonly used items
pub use encoder::{encode_wav_bytes, PcmSamples};
pub use probe::{load_artifact, probe_with_symphonia};
pub use slice::{byte_range, cut_range, remove_range};
pub use types::{ArtifactRef, AudioArtifact, AudioInfo, ByteLayout, PcmLayout};
