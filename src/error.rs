//! Error types shared across the crate.
//!
//! Only two things can go wrong with a directory operation: the draft is
//! rejected locally ([`ValidationError`]) or the remote call fails
//! ([`NetworkError`]). [`DirectoryError`] carries either one back to the view.

use thiserror::Error;

/// Local rejection of a draft. Blocks submission; the message is shown inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name must be at least 3 characters")]
    NameTooShort,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Invalid phone number (expected exactly 10 digits)")]
    InvalidPhone,
    #[error("Address fields are required")]
    MissingAddressField,
    #[error("Select a user before saving changes")]
    NoSelection,
    #[error("No user id left to assign")]
    IdsExhausted,
}

/// A remote call failed for any reason: connectivity, timeout, decode or non-2xx.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("{method} {url}: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} returned {status}")]
    Status {
        method: &'static str,
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Result of a controller operation as seen by the view.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl DirectoryError {
    /// Text shown to the user in the form or the info modal.
    pub fn user_message(&self) -> String {
        match self {
            DirectoryError::Validation(e) => e.to_string(),
            DirectoryError::Network(e) => format!("Request failed: {e}"),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DirectoryError::Validation(_))
    }
}

pub type Result<T, E = DirectoryError> = std::result::Result<T, E>;
