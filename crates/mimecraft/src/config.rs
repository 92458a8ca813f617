//! Render configuration.

/// Whether BCC recipients are written into the header block.
///
/// BCC addresses always stay in [`Message::destinations`](crate::Message::destinations)
/// regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BccHeader {
    /// Write a `BCC:` line when there are BCC recipients.
    #[default]
    Emit,
    /// Never write a `BCC:` line.
    Omit,
}

/// Options applied when rendering a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderConfig {
    /// BCC header policy.
    pub bcc_header: BccHeader,
}

impl RenderConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the BCC header policy.
    #[must_use]
    pub const fn with_bcc_header(mut self, bcc_header: BccHeader) -> Self {
        self.bcc_header = bcc_header;
        self
    }
}
