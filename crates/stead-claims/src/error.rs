//! Error types for the claim document layer.

use std::error::Error;
use std::fmt;

/// Errors from reading or writing the persisted claim document.
///
/// Individual corrupt claims never surface here; they are skipped so
/// one bad record cannot take the rest of the document down. Only a
/// structurally unusable document is an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentError {
    /// The document root is not a JSON object.
    MalformedRoot {
        /// Description of what was found instead.
        reason: String,
    },
    /// A claim could not be rendered into the persisted form.
    Serialize {
        /// The claim that failed, as `owner/id`.
        claim: String,
        /// The underlying serializer message.
        reason: String,
    },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRoot { reason } => {
                write!(f, "malformed claim document: {reason}")
            }
            Self::Serialize { claim, reason } => {
                write!(f, "failed to serialize claim '{claim}': {reason}")
            }
        }
    }
}

impl Error for DocumentError {}
