use std::fmt;

/// Result type for Pythia operations
pub type Result<T> = std::result::Result<T, PythiaError>;

/// Main error type for the Pythia library
#[derive(Debug, Clone)]
pub enum PythiaError {
    /// Invalid dimensions for operations
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Backward-pass state requested before the matching forward pass ran
    UninitializedState(String),

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),
}

impl fmt::Display for PythiaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PythiaError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            PythiaError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            PythiaError::UninitializedState(msg) => write!(f, "Uninitialized state: {}", msg),
            PythiaError::IoError(msg) => write!(f, "IO error: {}", msg),
            PythiaError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for PythiaError {}

// Conversion from std::io::Error
impl From<std::io::Error> for PythiaError {
    fn from(err: std::io::Error) -> Self {
        PythiaError::IoError(err.to_string())
    }
}

// Conversion from bincode::Error
impl From<bincode::Error> for PythiaError {
    fn from(err: bincode::Error) -> Self {
        PythiaError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl PythiaError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        PythiaError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        PythiaError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn uninitialized_state<S: Into<String>>(msg: S) -> Self {
        PythiaError::UninitializedState(msg.into())
    }
}
