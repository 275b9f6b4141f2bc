//! Error handling for Wavtrim
//!
//! Every fallible operation returns [`WavTrimError`]. Range errors come from
//! user input and can be corrected; invariant violations point at a bug in
//! whatever produced the sample buffer.

use thiserror::Error;

/// Result type alias for Wavtrim operations
pub type Result<T> = std::result::Result<T, WavTrimError>;

/// Main error type for Wavtrim operations
#[derive(Error, Debug)]
pub enum WavTrimError {
    // Range Errors
    #[error("Invalid range: end ({end_secs:.3}s) must be after start ({start_secs:.3}s) within {duration_secs:.3}s of audio")]
    InvalidRange {
        start_secs: f64,
        end_secs: f64,
        duration_secs: f64,
    },

    // Buffer Errors
    #[error("Sample buffer invariant violated: {reason}")]
    InvariantViolation { reason: String },

    // Decoder Boundary Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WavTrimError {
    /// Shorthand for building an [`WavTrimError::InvariantViolation`]
    pub fn invariant(reason: impl Into<String>) -> Self {
        WavTrimError::InvariantViolation {
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            WavTrimError::InvalidRange { .. } => "INVALID_RANGE",
            WavTrimError::InvariantViolation { .. } => "INVARIANT_VIOLATION",
            WavTrimError::FileNotFound { .. } => "FILE_NOT_FOUND",
            WavTrimError::InvalidAudio { .. } => "INVALID_AUDIO",
            WavTrimError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            WavTrimError::Io(_) => "IO_ERROR",
            WavTrimError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the user can fix this error by changing their input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WavTrimError::InvalidRange { .. }
                | WavTrimError::FileNotFound { .. }
                | WavTrimError::InvalidAudio { .. }
                | WavTrimError::UnsupportedFormat { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            WavTrimError::InvalidRange { .. } => vec![
                "End time must be after start time",
                "Both times must fall within the length of the audio",
                "Run 'wavtrim-cli info <file>' to see the duration",
            ],
            WavTrimError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            WavTrimError::InvalidAudio { .. } => vec![
                "Check if the file plays in another application",
                "The file may be corrupted - try re-exporting from source",
            ],
            WavTrimError::UnsupportedFormat { .. } => vec![
                "Convert to an uncompressed WAV file first",
                "Supported inputs: 8/16/24/32-bit integer or 32-bit float WAV",
            ],
            _ => vec![],
        }
    }

    /// Get a user-friendly message for this error
    pub fn friendly_message(&self) -> String {
        match self {
            WavTrimError::InvalidRange {
                start_secs,
                end_secs,
                duration_secs,
            } => {
                format!(
                    "End must be after start. You asked for {:.3}s to {:.3}s, but the audio is {:.3}s long.",
                    start_secs, end_secs, duration_secs
                )
            }
            WavTrimError::FileNotFound { path, .. } => {
                format!("I couldn't find the file at '{}'.", path)
            }
            WavTrimError::InvariantViolation { reason } => {
                format!(
                    "The audio buffer cannot be processed ({}). This is an internal error, not a problem with your input.",
                    reason
                )
            }
            _ => self.to_string(),
        }
    }
}
