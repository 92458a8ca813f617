//! Handoff of rendered messages to a delivery mechanism.
//!
//! Network delivery lives outside this crate. The [`Transport`] trait is
//! the seam an SMTP client or queue plugs into; [`FileTransport`] is a
//! local implementation that drops `.eml` files into a directory.

use crate::error::{Error, Result};
use crate::message::Message;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::PathBuf;

/// Something that accepts rendered messages for delivery.
pub trait Transport {
    /// Hands a message off for delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be delivered.
    fn send(&mut self, message: &Message) -> Result<()>;
}

/// Number of boundary characters used in generated file names.
const FILE_TAG_LEN: usize = 16;

/// Writes each message as an `.eml` file in a directory.
///
/// Every send produces a new file, even when the same message is sent
/// twice; existing files are never overwritten.
#[derive(Debug)]
pub struct FileTransport {
    dir: PathBuf,
    delivered: Vec<PathBuf>,
    sequence: u64,
}

impl FileTransport {
    /// Creates a transport writing into `dir`.
    ///
    /// The directory is created on first send if it does not exist.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            delivered: Vec::new(),
            sequence: 0,
        }
    }

    /// Paths written so far, in send order.
    #[must_use]
    pub fn delivered(&self) -> &[PathBuf] {
        &self.delivered
    }

    fn next_file_name(&mut self, message: &Message) -> String {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let tag: String = message.boundary().chars().take(FILE_TAG_LEN).collect();
        let seq = self.sequence;
        self.sequence += 1;
        format!("{stamp}-{tag}-{seq:06}.eml")
    }
}

impl Transport for FileTransport {
    fn send(&mut self, message: &Message) -> Result<()> {
        let envelope = message.envelope();
        if envelope.recipients.is_empty() {
            return Err(Error::NoRecipients);
        }

        std::fs::create_dir_all(&self.dir)?;
        // create_new: on a name clash (another transport sharing the
        // directory) take the next sequence number, never truncate.
        let (file, path) = loop {
            let name = self.next_file_name(message);
            let path = self.dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (file, path),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(e.into()),
            }
        };
        message.write_to(BufWriter::new(file))?;

        tracing::info!(
            path = %path.display(),
            sender = envelope.sender.unwrap_or_default(),
            recipients = envelope.recipients.len(),
            "message written"
        );
        self.delivered.push(path);
        Ok(())
    }
}
