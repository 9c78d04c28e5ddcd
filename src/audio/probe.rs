// src/audio/probe.rs

use hound::{SampleFormat, WavReader};
use std::io::Cursor;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::audio::encoder::{encode_wav_bytes, read_wav_frames};
use crate::audio::types::{AudioArtifact, AudioInfo, ByteLayout, PcmLayout};
use crate::error::{AudioError, Result};
use crate::export::extension_for_mime;

/// Turn raw source bytes into an editable artifact
///
/// WAV files that hound can read get a frame-accurate PCM layout. Every
/// other container is probed with symphonia and edited by byte-rate
/// approximation. Fails with [`AudioError::Decode`] when no positive
/// duration can be determined; nothing is kept in that case.
///
/// # Example
/// ```no_run
/// use audio_cutter_lib::audio::load_artifact;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes = std::fs::read("interview.mp3")?;
/// let (artifact, info) = load_artifact(bytes, "audio/mpeg")?;
/// println!("{:.2}s of {}", artifact.duration_seconds(), info.format);
/// # Ok(())
/// # }
/// ```
pub fn load_artifact(bytes: Vec<u8>, mime_type: &str) -> Result<(AudioArtifact, AudioInfo)> {
    if bytes.is_empty() {
        return Err(AudioError::Decode("Audio buffer is empty".to_string()));
    }

    if is_riff_wave(&bytes) {
        match probe_wav(&bytes) {
            Ok((layout, info)) => return load_pcm(bytes, mime_type, layout, info),
            // Compressed WAV payloads (ADPCM, etc.) still have a duration symphonia can find
            Err(e) => tracing::debug!("hound rejected WAV, falling back to probe: {}", e),
        }
    }

    let info = probe_with_symphonia(&bytes, mime_type)?;
    let artifact = AudioArtifact::approximate(bytes, info.duration_seconds, mime_type)?;
    Ok((artifact, info))
}

/// Build a PCM artifact from the frames actually present in the file
///
/// A file cut short keeps the frames before the cut and gets a rewritten
/// header, so its duration never exceeds what can be edited.
fn load_pcm(
    bytes: Vec<u8>,
    mime_type: &str,
    layout: PcmLayout,
    mut info: AudioInfo,
) -> Result<(AudioArtifact, AudioInfo)> {
    let (samples, complete) = read_wav_frames(&bytes, &layout)?;
    let frames = samples.len() / layout.channels as usize;
    if frames == 0 {
        return Err(AudioError::Decode("WAV file has no audio frames".to_string()));
    }

    let bytes = if complete {
        bytes
    } else {
        tracing::warn!(
            header_duration = info.duration_seconds,
            frames,
            "WAV data is shorter than its header, keeping the frames present"
        );
        encode_wav_bytes(&layout, &samples)?
    };

    info.duration_seconds = frames as f64 / layout.sample_rate as f64;
    let artifact = AudioArtifact::new(bytes, info.duration_seconds, mime_type, ByteLayout::Pcm(layout));
    Ok((artifact, info))
}

/// Check the RIFF/WAVE magic at the start of the buffer
fn is_riff_wave(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

/// Read the header of an uncompressed WAV file
fn probe_wav(bytes: &[u8]) -> Result<(PcmLayout, AudioInfo)> {
    let reader = WavReader::new(bytes)
        .map_err(|e| AudioError::Decode(format!("Failed to open WAV: {}", e)))?;

    let spec = reader.spec();
    if spec.sample_rate == 0 || spec.channels == 0 {
        return Err(AudioError::Decode("WAV header has no sample rate or channels".to_string()));
    }

    let kind = match spec.sample_format {
        SampleFormat::Float => "float",
        SampleFormat::Int => "int",
    };

    let info = AudioInfo {
        duration_seconds: reader.duration() as f64 / spec.sample_rate as f64,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        format: format!("WAV PCM {}{}", kind, spec.bits_per_sample),
        bit_depth: Some(spec.bits_per_sample),
    };

    Ok((PcmLayout::from_spec(spec), info))
}

/// Probe any container symphonia understands and work out its duration
///
/// Uses the track's frame count when the container reports one, otherwise
/// sums the packet durations of the audio track.
pub fn probe_with_symphonia(bytes: &[u8], mime_type: &str) -> Result<AudioInfo> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

    // Create a hint to help symphonia detect the format
    let mut hint = Hint::new();
    if !mime_type.is_empty() {
        hint.mime_type(mime_type);
    }
    if let Some(extension) = extension_for_mime(mime_type) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| AudioError::Decode(format!("Failed to probe format: {}", e)))?;

    let mut format = probed.format;

    let (track_id, codec_params) = {
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::Decode("No audio track found".to_string()))?;
        (track.id, track.codec_params.clone())
    };

    let sample_rate = codec_params.sample_rate.unwrap_or(0);

    let duration_seconds = match (codec_params.n_frames, codec_params.sample_rate) {
        (Some(n_frames), Some(sr)) if sr > 0 => n_frames as f64 / sr as f64,
        _ => {
            // No frame count in the header: walk the packets
            let mut total_ts: u64 = 0;
            loop {
                match format.next_packet() {
                    Ok(packet) if packet.track_id() == track_id => total_ts += packet.dur,
                    Ok(_) => (),
                    Err(e) if is_end_of_stream(&e) => break,
                    Err(e) => {
                        return Err(AudioError::Decode(format!("Failed to read packet: {}", e)))
                    }
                }
            }

            if let Some(time_base) = codec_params.time_base {
                let time = time_base.calc_time(total_ts);
                time.seconds as f64 + time.frac
            } else if sample_rate > 0 {
                total_ts as f64 / sample_rate as f64
            } else {
                0.0
            }
        }
    };

    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return Err(AudioError::Decode(
            "Duration could not be determined from the audio stream".to_string(),
        ));
    }

    let format_name = symphonia::default::get_codecs()
        .get_codec(codec_params.codec)
        .map(|descriptor| descriptor.short_name.to_string())
        .unwrap_or_else(|| format!("{:?}", codec_params.codec));

    Ok(AudioInfo {
        duration_seconds,
        sample_rate,
        channels: codec_params.channels.map(|c| c.count() as u16).unwrap_or(0),
        format: format_name,
        bit_depth: codec_params.bits_per_sample.map(|b| b as u16),
    })
}

/// Symphonia signals the end of a stream with an unexpected-EOF I/O error
fn is_end_of_stream(err: &SymphoniaError) -> bool {
    matches!(err, SymphoniaError::IoError(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::encoder::test_wav_bytes;

    #[test]
    fn test_wav_gets_pcm_layout() {
        let bytes = test_wav_bytes(10.0, 8000, 1);
        let (artifact, info) = load_artifact(bytes, "audio/wav").unwrap();

        assert_eq!(artifact.duration_seconds(), 10.0);
        assert!(artifact.is_sample_accurate());
        assert_eq!(info.sample_rate, 8000);
        assert_eq!(info.channels, 1);
        assert_eq!(info.bit_depth, Some(16));
    }

    #[test]
    fn test_wav_detected_by_magic_not_mime() {
        let bytes = test_wav_bytes(1.0, 8000, 2);
        let (artifact, _) = load_artifact(bytes, "application/octet-stream").unwrap();
        assert!(artifact.is_sample_accurate());
        assert_eq!(artifact.mime_type(), "application/octet-stream");
    }

    #[test]
    fn test_symphonia_reads_wav_duration() {
        let bytes = test_wav_bytes(2.5, 8000, 1);
        let info = probe_with_symphonia(&bytes, "audio/wav").unwrap();
        assert!((info.duration_seconds - 2.5).abs() < 1e-6);
        assert_eq!(info.sample_rate, 8000);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let result = load_artifact(vec![0x42; 512], "audio/mpeg");
        match result {
            Err(AudioError::Decode(_)) => (),
            other => panic!("Expected Decode error, got {:?}", other.map(|(a, _)| a)),
        }
    }

    #[test]
    fn test_empty_is_decode_error() {
        assert!(matches!(
            load_artifact(Vec::new(), "audio/wav"),
            Err(AudioError::Decode(_))
        ));
    }

    #[test]
    fn test_truncated_wav_keeps_frames_present() {
        let bytes = test_wav_bytes(10.0, 8000, 1);
        let truncated = bytes[..bytes.len() / 2].to_vec();

        let (artifact, info) = load_artifact(truncated, "audio/wav").unwrap();
        assert!(artifact.duration_seconds() < 10.0);
        assert!((artifact.duration_seconds() - 5.0).abs() < 0.01);
        assert_eq!(info.duration_seconds, artifact.duration_seconds());

        // The rewritten header agrees with the payload
        let reader = WavReader::new(artifact.bytes()).unwrap();
        assert_eq!(reader.duration() as f64 / 8000.0, artifact.duration_seconds());

        let cut = crate::audio::cut_range(&artifact, 1.0, 3.0).unwrap();
        assert_eq!(cut.duration_seconds(), 2.0);
    }

    #[test]
    fn test_wav_without_a_whole_sample_is_decode_error() {
        let bytes = test_wav_bytes(1.0, 8000, 1);
        assert!(matches!(
            load_artifact(bytes[..45].to_vec(), "audio/wav"),
            Err(AudioError::Decode(_))
        ));
    }

    #[test]
    fn test_only_eof_ends_the_packet_walk() {
        let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "end of stream");
        assert!(is_end_of_stream(&SymphoniaError::IoError(eof)));

        let other = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad page");
        assert!(!is_end_of_stream(&SymphoniaError::IoError(other)));
        assert!(!is_end_of_stream(&SymphoniaError::DecodeError("corrupt frame")));
    }

    #[test]
    fn test_zero_length_wav_is_decode_error() {
        let bytes = test_wav_bytes(0.0, 8000, 1);
        assert!(matches!(
            load_artifact(bytes, "audio/wav"),
            Err(AudioError::Decode(_))
        ));
    }
}
