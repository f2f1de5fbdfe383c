//! Error handling for key derivation and serialization

use thiserror::Error;

/// Key derivation errors
#[derive(Debug, Error)]
pub enum KeyError {
    /// Requested stretch output is below the 8 byte minimum
    #[error("requested key of {0} bytes is too short, minimum is 8")]
    ShortKey(usize),

    /// Requested stretch output is above the 1024 byte maximum
    #[error("requested key of {0} bytes overstretches the password, maximum is 1024")]
    KeyOverstretch(usize),

    /// Derivation or finalization attempted on a key already finalized
    #[error("key is finalized and cannot be derived further")]
    KeyFinalized,

    /// Material export attempted on a key that is not finalized
    #[error("key is not finalized, finalize it before exporting its bytes")]
    KeyNotFinal,

    /// A non-empty derivation path contained no usable segments
    #[error("derivation path contains no usable segments")]
    PathInvalid,

    /// Serialization attempted on a key whose material was never derived
    #[error("key material is not fully derived and cannot be serialized")]
    MaterialNotDerived,

    /// Serialized input is not valid base64
    #[error("serialized key is not valid base64: {0}")]
    BadEncoding(#[from] base64::DecodeError),

    /// Serialized input decoded to the wrong byte length
    #[error("serialized key decoded to {actual} bytes, expected {expected}")]
    BadLayout {
        /// Expected decoded length in bytes
        expected: usize,
        /// Actual decoded length in bytes
        actual: usize,
    },

    /// The configured hash provider failed
    #[error("hash provider failure: {0}")]
    Provider(String),
}

/// Result type for key operations
pub type Result<T> = std::result::Result<T, KeyError>;
