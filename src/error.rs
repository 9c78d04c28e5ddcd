use thiserror::Error;

/// All possible errors that can occur while loading, editing or exporting audio
#[derive(Debug, Error)]
pub enum AudioError {
    /// Failed to open or read the audio file from disk
    #[error("Failed to open audio file '{path}': {source}")]
    FileOpen {
        path: String,
        source: std::io::Error,
    },

    /// The source bytes have no determinable duration
    #[error("Audio decoding failed: {0}")]
    Decode(String),

    /// The requested export format label is not known
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Selection bounds are inverted, negative or past the end of the artifact
    #[error("Invalid selection ({start}s to {end}s) for audio of {duration}s")]
    InvalidSelection {
        start: f64,
        end: f64,
        duration: f64,
    },

    /// An edit or export was requested while no file is loaded
    #[error("No audio file loaded")]
    NotLoaded,

    /// The edit would leave an artifact with no audio in it
    #[error("Edit of {start}s to {end}s would leave no audio (duration {duration}s)")]
    EmptyResult {
        start: f64,
        end: f64,
        duration: f64,
    },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    /// Engine configuration could not be read or parsed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from hound WAV encoder
    #[error("Hound WAV error: {0}")]
    Hound(#[from] hound::Error),
}

impl AudioError {
    /// Whether the engine is still in a usable state after this error.
    ///
    /// Load failures are fatal to that load: the caller has to pick another
    /// file. Everything else leaves the engine exactly as it was.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            AudioError::Decode(_) | AudioError::FileOpen { .. } | AudioError::Io(_)
        )
    }
}

/// Convenient Result type that uses our AudioError
pub type Result<T> = std::result::Result<T, AudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(!AudioError::Decode("no duration".into()).is_recoverable());
        assert!(AudioError::NothingToUndo.is_recoverable());
        assert!(AudioError::InvalidSelection {
            start: 3.0,
            end: 3.0,
            duration: 10.0
        }
        .is_recoverable());
    }

    #[test]
    fn test_messages_carry_bounds() {
        let err = AudioError::InvalidSelection {
            start: -1.0,
            end: 5.0,
            duration: 10.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid selection (-1s to 5s) for audio of 10s"
        );
    }
}
