//! Error types for message building and delivery handoff.

/// Result type alias for mimecraft operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur around a message.
///
/// Rendering itself never fails; these come from the I/O edges
/// (reading attachments from disk, writing rendered output) and from
/// decoding helpers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Attachment could not be constructed.
    #[error("Invalid attachment: {0}")]
    InvalidAttachment(String),

    /// Message has no recipients to deliver to.
    #[error("Message has no recipients")]
    NoRecipients,
}
