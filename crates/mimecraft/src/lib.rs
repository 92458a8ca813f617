//! # mimecraft
//!
//! MIME email message builder and serializer.
//!
//! ## Features
//!
//! - **Builder**: chainable setters for sender, recipients, subject,
//!   text and HTML bodies, attachments and custom headers
//! - **Rendering**: a multipart/mixed message wrapping a
//!   multipart/alternative part, attachments Base64-encoded, CRLF line
//!   endings throughout
//! - **Boundaries**: SHA-256 derived tokens generated per message
//! - **Handoff**: a [`Transport`] seam plus a [`FileTransport`] that
//!   writes `.eml` files
//!
//! ## Quick Start
//!
//! ```
//! use mimecraft::{Attachment, Message};
//!
//! let mut message = Message::new();
//! message
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .cc("copy@example.com")
//!     .subject("Quarterly report")
//!     .text("Plain text version")
//!     .html("<p>HTML version</p>")
//!     .attachment(Attachment::new("report.csv", "text/csv", b"a,b\n1,2\n".to_vec()))
//!     .header("X-Mailer", "mimecraft");
//!
//! let bytes = message.render();
//! assert!(bytes.ends_with(format!("--{}--", message.boundary()).as_bytes()));
//! assert_eq!(
//!     message.destinations(),
//!     vec!["recipient@example.com", "copy@example.com"]
//! );
//! ```
//!
//! ### Hiding BCC recipients
//!
//! ```
//! use mimecraft::{BccHeader, Message, RenderConfig};
//!
//! let mut message = Message::new();
//! message.to("a@example.com").bcc("hidden@example.com");
//!
//! let config = RenderConfig::new().with_bcc_header(BccHeader::Omit);
//! let bytes = message.render_with(&config);
//! assert!(!String::from_utf8_lossy(&bytes).contains("hidden@example.com"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod attachment;
mod boundary;
mod config;
mod error;
mod header;
mod message;

pub mod encoding;
pub mod transport;

pub use attachment::Attachment;
pub use boundary::{ALTERNATIVE_PREFIX, Boundary};
pub use config::{BccHeader, RenderConfig};
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{CRLF, Envelope, Message};
pub use transport::{FileTransport, Transport};
