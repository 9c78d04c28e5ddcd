// src/audio/encoder.rs

use hound::{WavReader, WavWriter};
use std::io::Cursor;

use crate::audio::types::PcmLayout;
use crate::error::{AudioError, Result};

/// Interleaved PCM samples pulled out of a WAV artifact
///
/// Integer formats of every bit depth are widened to `i32` so that they can
/// be written back at their original depth without conversion loss.
#[derive(Debug, Clone, PartialEq)]
pub enum PcmSamples {
    Int(Vec<i32>),
    Float(Vec<f32>),
}

impl PcmSamples {
    pub fn len(&self) -> usize {
        match self {
            PcmSamples::Int(s) => s.len(),
            PcmSamples::Float(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep only the samples in `range`
    pub fn extract(&self, range: std::ops::Range<usize>) -> PcmSamples {
        match self {
            PcmSamples::Int(s) => PcmSamples::Int(s[range].to_vec()),
            PcmSamples::Float(s) => PcmSamples::Float(s[range].to_vec()),
        }
    }

    /// Drop the samples in `range` and join what is left on either side
    pub fn splice_out(&self, range: std::ops::Range<usize>) -> PcmSamples {
        fn join<T: Copy>(s: &[T], range: std::ops::Range<usize>) -> Vec<T> {
            let mut out = Vec::with_capacity(s.len() - range.len());
            out.extend_from_slice(&s[..range.start]);
            out.extend_from_slice(&s[range.end..]);
            out
        }

        match self {
            PcmSamples::Int(s) => PcmSamples::Int(join(s, range)),
            PcmSamples::Float(s) => PcmSamples::Float(join(s, range)),
        }
    }
}

/// Encode PCM samples to an in-memory WAV file
///
/// The output keeps the sample format and bit depth described by `layout`,
/// so an edited artifact is byte-compatible with its source apart from length.
///
/// # Example
/// ```
/// use audio_cutter_lib::audio::{encode_wav_bytes, PcmLayout, PcmSamples};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let layout = PcmLayout { sample_rate: 8000, channels: 1, bits_per_sample: 16, float: false };
/// let bytes = encode_wav_bytes(&layout, &PcmSamples::Int(vec![0, 1000, -1000, 0]))?;
/// assert_eq!(&bytes[0..4], b"RIFF");
/// # Ok(())
/// # }
/// ```
pub fn encode_wav_bytes(layout: &PcmLayout, samples: &PcmSamples) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut buffer), layout.spec())?;

        match samples {
            PcmSamples::Int(s) => {
                for &sample in s {
                    writer.write_sample(sample)?;
                }
            }
            PcmSamples::Float(s) => {
                for &sample in s {
                    writer.write_sample(sample)?;
                }
            }
        }

        // Finalize writes the RIFF and data chunk sizes
        writer.finalize()?;
    }

    Ok(buffer)
}

/// Read the whole frames present in a WAV buffer
///
/// Reading stops at the first sample that cannot be read, so a file cut
/// short yields the frames before the cut. The flag is `false` when fewer
/// samples were present than the header announces.
pub(crate) fn read_wav_frames(bytes: &[u8], layout: &PcmLayout) -> Result<(PcmSamples, bool)> {
    let mut reader = WavReader::new(bytes)
        .map_err(|e| AudioError::Decode(format!("Failed to open WAV: {}", e)))?;
    let announced = reader.len() as usize;

    let samples = if layout.float {
        PcmSamples::Float(reader.samples::<f32>().map_while(|s| s.ok()).collect())
    } else {
        PcmSamples::Int(reader.samples::<i32>().map_while(|s| s.ok()).collect())
    };

    let complete = samples.len() == announced;
    let whole = samples.len() - samples.len() % layout.channels as usize;
    if whole < samples.len() {
        return Ok((samples.extract(0..whole), complete));
    }
    Ok((samples, complete))
}

/// Build a 16-bit WAV of a 440 Hz tone for tests
#[cfg(test)]
pub(crate) fn test_wav_bytes(duration_seconds: f64, sample_rate: u32, channels: u16) -> Vec<u8> {
    let layout = PcmLayout {
        sample_rate,
        channels,
        bits_per_sample: 16,
        float: false,
    };
    let frames = (duration_seconds * sample_rate as f64).round() as usize;
    let mut samples = Vec::with_capacity(frames * channels as usize);
    for i in 0..frames {
        let t = i as f64 / sample_rate as f64;
        let value = ((t * 440.0 * std::f64::consts::TAU).sin() * 16000.0) as i32;
        for _ in 0..channels {
            samples.push(value);
        }
    }
    encode_wav_bytes(&layout, &PcmSamples::Int(samples)).unwrap()
}
