//! File attachments.

use crate::error::{Error, Result};
use std::path::Path;

/// A binary attachment carried as its own multipart/mixed part.
///
/// Neither the name nor the MIME type is validated; both are written
/// into the part headers as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name shown to the recipient.
    pub name: String,
    /// Optional description; the name is used when unset.
    pub description: Option<String>,
    /// MIME type, e.g. `application/pdf`.
    pub mime: String,
    /// Raw payload.
    pub data: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment from in-memory bytes.
    #[must_use]
    pub fn new(name: impl Into<String>, mime: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            description: None,
            mime: mime.into(),
            data: data.into(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Reads an attachment from disk, using the file name as its name.
    ///
    /// The MIME type must be supplied by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no file name or cannot be read.
    pub fn from_file(path: impl AsRef<Path>, mime: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                Error::InvalidAttachment(format!("no file name in {}", path.display()))
            })?;
        let data = std::fs::read(path)?;
        tracing::debug!(name, bytes = data.len(), "loaded attachment");
        Ok(Self::new(name, mime, data))
    }

    /// Description written to `Content-Description`.
    #[must_use]
    pub fn description_or_name(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.name)
    }
}
