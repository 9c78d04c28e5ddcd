// src/export.rs
//! The export boundary.
//!
//! No re-encoding happens here: the chosen format only names the file. The
//! MIME type handed back is always the artifact's real one.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::audio::ArtifactRef;
use crate::error::{AudioError, Result};

/// Format labels offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Mp3,
    Wav,
    Ogg,
    Flac,
    M4a,
    Aac,
    Webm,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Mp3 => "mp3",
            ExportFormat::Wav => "wav",
            ExportFormat::Ogg => "ogg",
            ExportFormat::Flac => "flac",
            ExportFormat::M4a => "m4a",
            ExportFormat::Aac => "aac",
            ExportFormat::Webm => "webm",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AudioError;

    fn from_str(label: &str) -> Result<Self> {
        let normalized = label.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "mp3" => Ok(ExportFormat::Mp3),
            "wav" | "wave" => Ok(ExportFormat::Wav),
            "ogg" => Ok(ExportFormat::Ogg),
            "flac" => Ok(ExportFormat::Flac),
            "m4a" => Ok(ExportFormat::M4a),
            "aac" => Ok(ExportFormat::Aac),
            "webm" => Ok(ExportFormat::Webm),
            _ => Err(AudioError::UnsupportedFormat(label.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// The current artifact packaged for download
#[derive(Debug, Clone)]
pub struct ExportedAudio {
    artifact: ArtifactRef,
    pub filename: String,
    pub mime_type: String,
}

impl ExportedAudio {
    pub(crate) fn new(artifact: ArtifactRef, filename: String) -> Self {
        let mime_type = artifact.mime_type().to_string();
        Self {
            artifact,
            filename,
            mime_type,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        self.artifact.bytes()
    }

    /// Write the export into `dir` under its suggested filename
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, self.bytes())?;
        tracing::info!(path = %path.display(), bytes = self.bytes().len(), "Export saved");
        Ok(path)
    }
}

/// `<stem of source name>.<format>`, falling back to `default_stem`
pub fn export_filename(source_name: Option<&str>, default_stem: &str, format: ExportFormat) -> String {
    let stem = source_name
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(default_stem);

    format!("{}.{}", stem, format.extension())
}

const MIME_TABLE: &[(&str, &str)] = &[
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("flac", "audio/flac"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
    ("webm", "audio/webm"),
];

/// MIME type for a file extension, for loads that only have a path
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    let extension = extension.to_ascii_lowercase();
    MIME_TABLE
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

/// File extension for a MIME type, used as a probe hint
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    let mime_type = mime_type.to_ascii_lowercase();
    match mime_type.as_str() {
        "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => Some("wav"),
        "audio/mp3" => Some("mp3"),
        "audio/x-flac" => Some("flac"),
        "audio/x-m4a" => Some("m4a"),
        _ => MIME_TABLE
            .iter()
            .find(|(_, mime)| *mime == mime_type)
            .map(|(ext, _)| *ext),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioArtifact;
    use std::sync::Arc;

    #[test]
    fn test_format_labels() {
        assert_eq!("MP3".parse::<ExportFormat>().unwrap(), ExportFormat::Mp3);
        assert_eq!(".wav".parse::<ExportFormat>().unwrap(), ExportFormat::Wav);
        assert_eq!(" flac ".parse::<ExportFormat>().unwrap(), ExportFormat::Flac);
        assert!(matches!(
            "midi".parse::<ExportFormat>(),
            Err(AudioError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_filename_from_source() {
        assert_eq!(
            export_filename(Some("podcast episode.wav"), "audio", ExportFormat::Mp3),
            "podcast episode.mp3"
        );
        assert_eq!(
            export_filename(Some("/tmp/takes/take.1.flac"), "audio", ExportFormat::Wav),
            "take.1.wav"
        );
        assert_eq!(export_filename(None, "audio", ExportFormat::Mp3), "audio.mp3");
        assert_eq!(export_filename(Some(""), "audio", ExportFormat::Ogg), "audio.ogg");
    }

    #[test]
    fn test_mime_lookups() {
        assert_eq!(mime_for_extension("MP3"), Some("audio/mpeg"));
        assert_eq!(mime_for_extension("txt"), None);
        assert_eq!(extension_for_mime("audio/mpeg"), Some("mp3"));
        assert_eq!(extension_for_mime("audio/x-wav"), Some("wav"));
        assert_eq!(extension_for_mime("application/octet-stream"), None);
    }

    #[test]
    fn test_export_keeps_real_mime_and_saves() {
        let artifact =
            Arc::new(AudioArtifact::approximate(vec![1, 2, 3, 4], 1.0, "audio/mpeg").unwrap());
        let export = ExportedAudio::new(artifact, "audio_cutter_test_export.wav".to_string());

        assert_eq!(export.mime_type, "audio/mpeg");

        let path = export.save(std::env::temp_dir()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3, 4]);
        std::fs::remove_file(path).ok();
    }
}
