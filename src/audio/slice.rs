// src/audio/slice.rs
//! Byte-range extraction for edits.
//!
//! Two strategies, picked by the artifact's [`ByteLayout`]:
//! - PCM WAV: times map to whole frames, the sample payload is sliced and a
//!   fresh header is written. Sample-accurate.
//! - Everything else: `byte = round(seconds * byte_rate)` over the raw
//!   container bytes. Deterministic, but not format-safe for compressed audio;
//!   undo never depends on it because history keeps the previous artifact.

use std::ops::Range;

use crate::audio::encoder::{encode_wav_bytes, read_wav_frames, PcmSamples};
use crate::audio::types::{AudioArtifact, ByteLayout, PcmLayout};
use crate::error::{AudioError, Result};

/// Keep only `start..end` seconds of the artifact
///
/// # Example
/// ```
/// use audio_cutter_lib::audio::{cut_range, AudioArtifact};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let artifact = AudioArtifact::approximate(vec![0u8; 1000], 10.0, "audio/mpeg")?;
/// let cut = cut_range(&artifact, 2.0, 4.0)?;
/// assert_eq!(cut.len(), 200);
/// assert!((cut.duration_seconds() - 2.0).abs() < 1e-9);
/// # Ok(())
/// # }
/// ```
pub fn cut_range(artifact: &AudioArtifact, start: f64, end: f64) -> Result<AudioArtifact> {
    match artifact.layout() {
        ByteLayout::Pcm(layout) => {
            let samples = read_samples(artifact.bytes(), &layout)?;
            let range = sample_range(&layout, samples.len(), start, end);
            if range.is_empty() {
                return Err(empty_result(artifact, start, end));
            }
            pcm_artifact(artifact, &layout, &samples.extract(range))
        }
        ByteLayout::Approximate { byte_rate } => {
            let range = byte_range(byte_rate, artifact.len(), start, end);
            if range.is_empty() {
                return Err(empty_result(artifact, start, end));
            }
            let bytes = artifact.bytes()[range].to_vec();
            Ok(approximate_artifact(artifact, byte_rate, bytes))
        }
    }
}

/// Delete `start..end` seconds and join the audio on either side
pub fn remove_range(artifact: &AudioArtifact, start: f64, end: f64) -> Result<AudioArtifact> {
    match artifact.layout() {
        ByteLayout::Pcm(layout) => {
            let samples = read_samples(artifact.bytes(), &layout)?;
            let range = sample_range(&layout, samples.len(), start, end);
            if range.len() == samples.len() {
                return Err(empty_result(artifact, start, end));
            }
            pcm_artifact(artifact, &layout, &samples.splice_out(range))
        }
        ByteLayout::Approximate { byte_rate } => {
            let range = byte_range(byte_rate, artifact.len(), start, end);
            if range.len() == artifact.len() {
                return Err(empty_result(artifact, start, end));
            }
            let source = artifact.bytes();
            let mut bytes = Vec::with_capacity(source.len() - range.len());
            bytes.extend_from_slice(&source[..range.start]);
            bytes.extend_from_slice(&source[range.end..]);
            Ok(approximate_artifact(artifact, byte_rate, bytes))
        }
    }
}

/// Map a time range onto raw bytes: `round(t * byte_rate)`, clamped to the buffer
pub fn byte_range(byte_rate: f64, len: usize, start: f64, end: f64) -> Range<usize> {
    let start_byte = ((start * byte_rate).round() as usize).min(len);
    let end_byte = ((end * byte_rate).round() as usize).min(len);
    start_byte..end_byte.max(start_byte)
}

/// Map a time range onto interleaved sample indices, aligned to whole frames
fn sample_range(layout: &PcmLayout, total_samples: usize, start: f64, end: f64) -> Range<usize> {
    let channels = layout.channels as usize;
    let total_frames = total_samples / channels;

    let start_frame = layout.frame_at(start).min(total_frames);
    let end_frame = layout.frame_at(end).min(total_frames).max(start_frame);

    (start_frame * channels)..(end_frame * channels)
}

fn read_samples(bytes: &[u8], layout: &PcmLayout) -> Result<PcmSamples> {
    match read_wav_frames(bytes, layout)? {
        (samples, true) => Ok(samples),
        (_, false) => Err(AudioError::Decode(
            "WAV data is shorter than its header".to_string(),
        )),
    }
}

fn pcm_artifact(
    source: &AudioArtifact,
    layout: &PcmLayout,
    samples: &PcmSamples,
) -> Result<AudioArtifact> {
    let frames = samples.len() / layout.channels as usize;
    let bytes = encode_wav_bytes(layout, samples)?;
    Ok(AudioArtifact::new(
        bytes,
        frames as f64 / layout.sample_rate as f64,
        source.mime_type(),
        ByteLayout::Pcm(*layout),
    ))
}

fn approximate_artifact(source: &AudioArtifact, byte_rate: f64, bytes: Vec<u8>) -> AudioArtifact {
    let duration = bytes.len() as f64 / byte_rate;
    AudioArtifact::new(
        bytes,
        duration,
        source.mime_type(),
        ByteLayout::Approximate { byte_rate },
    )
}

fn empty_result(artifact: &AudioArtifact, start: f64, end: f64) -> AudioError {
    AudioError::EmptyResult {
        start,
        end,
        duration: artifact.duration_seconds(),
    }
}
