use std::fmt;

/// Pipeline-level failures of a UBX conversion.
///
/// Frame, message and fix level problems are recovered inside the pipeline
/// and only show up in [`crate::MessageStats`].
#[derive(Debug)]
pub enum ConvertError {
    /// A complete pass produced zero accepted position fixes
    NoValidPositionData {
        /// Number of messages identified during the pass
        messages: u32,
    },
    /// Unexpected internal failure
    Internal(String),
    /// I/O errors from file based entry points
    Io(std::io::Error),
}

impl ConvertError {
    /// True for the "log contains no usable positions" outcome
    pub fn is_no_position_data(&self) -> bool {
        matches!(self, ConvertError::NoValidPositionData { .. })
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::NoValidPositionData { messages } => write!(
                f,
                "No valid position data found ({} messages scanned)",
                messages
            ),
            ConvertError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ConvertError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::Io(err)
    }
}

impl From<std::fmt::Error> for ConvertError {
    fn from(err: std::fmt::Error) -> Self {
        ConvertError::Internal(format!("document formatting failed: {}", err))
    }
}
