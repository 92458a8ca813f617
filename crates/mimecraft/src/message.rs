//! Message builder and renderer.

use crate::attachment::Attachment;
use crate::boundary::Boundary;
use crate::config::{BccHeader, RenderConfig};
use crate::encoding::{TransferEncoding, encode_base64};
use crate::error::Result;
use crate::header::Headers;
use std::io::Write;

/// Line terminator used between every rendered line.
pub const CRLF: &str = "\r\n";

/// An email message under construction.
///
/// Setters take `&mut self` and return `&mut Self` so calls can be
/// chained. `to`, `cc`, `bcc` and `attachment` append; every other
/// setter overwrites. Nothing is validated.
///
/// ```
/// use mimecraft::Message;
///
/// let mut message = Message::new();
/// message
///     .from("a@example.com")
///     .to("b@example.com")
///     .subject("Hi")
///     .text("hello");
///
/// let bytes = message.render();
/// assert!(bytes.starts_with(b"From:  a@example.com\r\n"));
/// ```
#[derive(Debug, Clone)]
pub struct Message {
    from: Option<String>,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    subject: Option<String>,
    text: Option<String>,
    html: Option<String>,
    attachments: Vec<Attachment>,
    boundary: Boundary,
    headers: Headers,
}

/// Delivery-level view of a message: who sends it and who receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<'a> {
    /// Sender address, if set.
    pub sender: Option<&'a str>,
    /// All recipients: to, then cc, then bcc.
    pub recipients: Vec<&'a str>,
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

impl Message {
    /// Creates an empty message with a freshly generated boundary.
    #[must_use]
    pub fn new() -> Self {
        Self::with_boundary(Boundary::generate())
    }

    /// Creates an empty message using the given boundary.
    #[must_use]
    pub fn with_boundary(boundary: Boundary) -> Self {
        Self {
            from: None,
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: None,
            text: None,
            html: None,
            attachments: Vec::new(),
            boundary,
            headers: Headers::new(),
        }
    }

    /// Sets the sender address.
    pub fn from(&mut self, from: impl Into<String>) -> &mut Self {
        self.from = Some(from.into());
        self
    }

    /// Adds a recipient.
    pub fn to(&mut self, recipient: impl Into<String>) -> &mut Self {
        self.to.push(recipient.into());
        self
    }

    /// Adds a CC recipient.
    pub fn cc(&mut self, recipient: impl Into<String>) -> &mut Self {
        self.cc.push(recipient.into());
        self
    }

    /// Adds a hidden recipient.
    pub fn bcc(&mut self, recipient: impl Into<String>) -> &mut Self {
        self.bcc.push(recipient.into());
        self
    }

    /// Sets the subject line.
    pub fn subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the plain text alternative.
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the HTML alternative.
    pub fn html(&mut self, html: impl Into<String>) -> &mut Self {
        self.html = Some(html.into());
        self
    }

    /// Adds an attachment.
    pub fn attachment(&mut self, attachment: Attachment) -> &mut Self {
        self.attachments.push(attachment);
        self
    }

    /// Sets a custom header. An empty value hides the header when rendering.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.set(name, value);
        self
    }

    /// The outer multipart/mixed boundary.
    #[must_use]
    pub fn boundary(&self) -> &str {
        self.boundary.as_str()
    }

    /// The inner multipart/alternative boundary.
    #[must_use]
    pub fn alternative_boundary(&self) -> String {
        self.boundary.alternative()
    }

    /// Sender address, if set.
    #[must_use]
    pub fn sender(&self) -> Option<&str> {
        self.from.as_deref()
    }

    /// Primary recipients.
    #[must_use]
    pub fn to_recipients(&self) -> &[String] {
        &self.to
    }

    /// CC recipients.
    #[must_use]
    pub fn cc_recipients(&self) -> &[String] {
        &self.cc
    }

    /// BCC recipients.
    #[must_use]
    pub fn bcc_recipients(&self) -> &[String] {
        &self.bcc
    }

    /// Subject line, if set.
    #[must_use]
    pub fn subject_text(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Plain text alternative, if set.
    #[must_use]
    pub fn text_body(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// HTML alternative, if set.
    #[must_use]
    pub fn html_body(&self) -> Option<&str> {
        self.html.as_deref()
    }

    /// Attachments in insertion order.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Custom headers, including suppressed ones.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Every recipient: to, then cc, then bcc. No deduplication.
    #[must_use]
    pub fn destinations(&self) -> Vec<&str> {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(String::as_str)
            .collect()
    }

    /// Sender and recipients for a transport.
    #[must_use]
    pub fn envelope(&self) -> Envelope<'_> {
        Envelope {
            sender: self.sender(),
            recipients: self.destinations(),
        }
    }

    /// Renders the message with the default configuration.
    #[must_use]
    pub fn render(&self) -> Vec<u8> {
        self.render_with(&RenderConfig::default())
    }

    /// Renders the message into a complete MIME byte buffer.
    ///
    /// Output always has a multipart/mixed body whose first part is a
    /// multipart/alternative holding the text and HTML bodies (possibly
    /// none), followed by one part per attachment.
    #[must_use]
    pub fn render_with(&self, config: &RenderConfig) -> Vec<u8> {
        let mut lines = self.header_lines(config);
        self.push_alternative(&mut lines);
        self.push_attachments(&mut lines);

        // close main boundary
        lines.push(format!("--{}--", self.boundary));

        let rendered = lines.join(CRLF).into_bytes();
        tracing::debug!(
            boundary = %self.boundary,
            recipients = self.to.len() + self.cc.len() + self.bcc.len(),
            attachments = self.attachments.len(),
            bytes = rendered.len(),
            "rendered message"
        );
        rendered
    }

    /// Renders the message and writes it to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.render())?;
        writer.flush()?;
        Ok(())
    }

    fn header_lines(&self, config: &RenderConfig) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(from) = non_empty(self.from.as_deref()) {
            lines.push(format!("From:  {from}"));
        }

        lines.push(format!("To: {}", self.to.join(", ")));

        if !self.cc.is_empty() {
            lines.push(format!("CC: {}", self.cc.join(", ")));
        }

        if !self.bcc.is_empty() && config.bcc_header == BccHeader::Emit {
            lines.push(format!("BCC: {}", self.bcc.join(", ")));
        }

        lines.push(format!(
            "Subject: {}",
            self.subject.as_deref().unwrap_or_default()
        ));

        lines.push("Content-Type: multipart/mixed;".to_string());
        lines.push(format!(" boundary=\"{}\"", self.boundary));

        lines.extend(self.headers.to_lines());

        lines.push("MIME-Version: 1.0".to_string());
        lines.push(String::new());
        lines
    }

    fn push_alternative(&self, lines: &mut Vec<String>) {
        let sub_boundary = self.boundary.alternative();

        lines.push(format!("--{}", self.boundary));
        lines.push("Content-Type: multipart/alternative;".to_string());
        lines.push(format!(" boundary=\"{sub_boundary}\""));
        lines.push(String::new());

        if let Some(text) = non_empty(self.text.as_deref()) {
            push_text_part(lines, &sub_boundary, "text/plain", text);
        }

        if let Some(html) = non_empty(self.html.as_deref()) {
            push_text_part(lines, &sub_boundary, "text/html", html);
        }

        lines.push(format!("--{sub_boundary}--"));
        lines.push(String::new());
    }

    fn push_attachments(&self, lines: &mut Vec<String>) {
        for attachment in &self.attachments {
            lines.push(format!("--{}", self.boundary));
            lines.push(format!(
                "Content-Type: {}; name=\"{}\"",
                attachment.mime, attachment.name
            ));
            lines.push(format!(
                "Content-Description: {}",
                attachment.description_or_name()
            ));
            lines.push(format!(
                "Content-Disposition: attachment;filename=\"{}\";",
                attachment.name
            ));
            lines.push(format!(
                "Content-Transfer-Encoding: {}",
                TransferEncoding::Base64
            ));
            lines.push(String::new());
            lines.push(encode_base64(&attachment.data));
            lines.push(String::new());
        }
    }
}

fn push_text_part(lines: &mut Vec<String>, boundary: &str, content_type: &str, body: &str) {
    lines.push(format!("--{boundary}"));
    lines.push(format!("Content-Type: {content_type}; charset=\"UTF-8\""));
    lines.push(format!(
        "Content-Transfer-Encoding: {}",
        TransferEncoding::EightBit
    ));
    lines.push(String::new());
    lines.push(body.to_string());
    lines.push(String::new());
}

/// Unset and empty values are treated the same way.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::needless_collect,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use crate::encoding::decode_base64;

    fn render_string(message: &Message) -> String {
        String::from_utf8(message.render()).unwrap()
    }

    fn fixed() -> Message {
        Message::with_boundary(Boundary::from_seed("fixed"))
    }

    #[test]
    fn test_empty_message_structure() {
        let message = fixed();
        let b = message.boundary().to_string();
        let expected = [
            "To: ".to_string(),
            "Subject: ".to_string(),
            "Content-Type: multipart/mixed;".to_string(),
            format!(" boundary=\"{b}\""),
            "MIME-Version: 1.0".to_string(),
            String::new(),
            format!("--{b}"),
            "Content-Type: multipart/alternative;".to_string(),
            format!(" boundary=\"sub_{b}\""),
            String::new(),
            format!("--sub_{b}--"),
            String::new(),
            format!("--{b}--"),
        ]
        .join("\r\n");

        assert_eq!(render_string(&message), expected);
    }

    #[test]
    fn test_text_only_scenario() {
        let mut message = fixed();
        message
            .from("a@x.com")
            .to("b@x.com")
            .subject("Hi")
            .text("hello");
        let b = message.boundary().to_string();
        let expected = [
            "From:  a@x.com".to_string(),
            "To: b@x.com".to_string(),
            "Subject: Hi".to_string(),
            "Content-Type: multipart/mixed;".to_string(),
            format!(" boundary=\"{b}\""),
            "MIME-Version: 1.0".to_string(),
            String::new(),
            format!("--{b}"),
            "Content-Type: multipart/alternative;".to_string(),
            format!(" boundary=\"sub_{b}\""),
            String::new(),
            format!("--sub_{b}"),
            "Content-Type: text/plain; charset=\"UTF-8\"".to_string(),
            "Content-Transfer-Encoding: 8bit".to_string(),
            String::new(),
            "hello".to_string(),
            String::new(),
            format!("--sub_{b}--"),
            String::new(),
            format!("--{b}--"),
        ]
        .join("\r\n");

        let rendered = render_string(&message);
        assert_eq!(rendered, expected);
        assert!(!rendered.contains("text/html"));
        assert!(!rendered.contains("base64"));
    }

    #[test]
    fn test_text_and_html_order() {
        let mut message = fixed();
        message.html("<p>hi</p>").text("hi");
        let rendered = render_string(&message);

        let text = rendered.find("text/plain").unwrap();
        let html = rendered.find("text/html").unwrap();
        assert!(text < html);
        assert!(rendered.contains("\r\n\r\n<p>hi</p>\r\n\r\n"));
    }

    #[test]
    fn test_empty_text_is_skipped() {
        let mut message = fixed();
        message.text("").html("");
        assert_eq!(render_string(&message), render_string(&fixed()));
    }

    #[test]
    fn test_cc_bcc_headers() {
        let mut message = fixed();
        message
            .to("a@x.com")
            .to("b@x.com")
            .cc("c@x.com")
            .bcc("d@x.com")
            .bcc("e@x.com");
        let rendered = render_string(&message);

        assert!(rendered.contains("\r\nTo: a@x.com, b@x.com\r\n"));
        assert!(rendered.contains("\r\nCC: c@x.com\r\n"));
        assert!(rendered.contains("\r\nBCC: d@x.com, e@x.com\r\n"));
    }

    #[test]
    fn test_cc_bcc_omitted_when_empty() {
        let mut message = fixed();
        message.to("a@x.com");
        let rendered = render_string(&message);
        assert!(!rendered.contains("CC:"));
        assert!(!rendered.contains("BCC:"));
    }

    #[test]
    fn test_bcc_omit_policy() {
        let mut message = fixed();
        message.to("a@x.com").bcc("hidden@x.com");

        let config = RenderConfig::new().with_bcc_header(BccHeader::Omit);
        let rendered = String::from_utf8(message.render_with(&config)).unwrap();
        assert!(!rendered.contains("BCC:"));
        assert!(!rendered.contains("hidden@x.com"));
        assert_eq!(message.destinations(), vec!["a@x.com", "hidden@x.com"]);
    }

    #[test]
    fn test_header_order() {
        let mut message = fixed();
        message
            .header("X-Mailer", "mimecraft")
            .subject("S")
            .cc("c@x.com")
            .to("t@x.com")
            .from("f@x.com");
        let rendered = render_string(&message);
        let head = rendered.split("\r\n\r\n").next().unwrap();
        let names: Vec<&str> = head
            .lines()
            .filter(|l| !l.starts_with(' '))
            .map(|l| l.split(':').next().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "From",
                "To",
                "CC",
                "Subject",
                "Content-Type",
                "X-Mailer",
                "MIME-Version"
            ]
        );
    }

    #[test]
    fn test_custom_header_suppression() {
        let mut message = fixed();
        message.header("X-Campaign", "spring").header("X-Empty", "");
        let rendered = render_string(&message);
        assert!(rendered.contains("\r\nX-Campaign: spring\r\nMIME-Version: 1.0\r\n"));
        assert!(!rendered.contains("X-Empty"));

        message.header("X-Campaign", "");
        assert!(!render_string(&message).contains("X-Campaign"));
    }

    #[test]
    fn test_header_last_set_wins() {
        let mut message = fixed();
        message.header("X-A", "1").header("X-A", "2");
        let rendered = render_string(&message);
        assert!(rendered.contains("X-A: 2"));
        assert!(!rendered.contains("X-A: 1"));
    }

    #[test]
    fn test_attachment_part() {
        let mut message = fixed();
        message.attachment(Attachment::new("a.bin", "application/octet-stream", vec![0_u8, 1, 2]));
        let b = message.boundary().to_string();
        let rendered = render_string(&message);

        let part = [
            format!("--sub_{b}--"),
            String::new(),
            format!("--{b}"),
            "Content-Type: application/octet-stream; name=\"a.bin\"".to_string(),
            "Content-Description: a.bin".to_string(),
            "Content-Disposition: attachment;filename=\"a.bin\";".to_string(),
            "Content-Transfer-Encoding: base64".to_string(),
            String::new(),
            "AAEC".to_string(),
            String::new(),
            format!("--{b}--"),
        ]
        .join("\r\n");
        assert!(rendered.ends_with(&part));
    }

    #[test]
    fn test_attachment_description() {
        let mut message = fixed();
        message.attachment(
            Attachment::new("r.pdf", "application/pdf", b"x".to_vec())
                .with_description("Monthly report"),
        );
        let rendered = render_string(&message);
        assert!(rendered.contains("Content-Description: Monthly report\r\n"));
        assert!(rendered.contains("name=\"r.pdf\""));
    }

    #[test]
    fn test_two_attachments_scenario() {
        let first: Vec<u8> = (0..=255).collect();
        let second = b"second payload".to_vec();
        let mut message = fixed();
        message
            .attachment(Attachment::new("one.bin", "application/octet-stream", first.clone()))
            .attachment(Attachment::new("two.txt", "text/plain", second.clone()));
        let b = message.boundary().to_string();
        let rendered = render_string(&message);

        // Empty alternative block precedes the attachments.
        let empty_alt = format!(" boundary=\"sub_{b}\"\r\n\r\n--sub_{b}--\r\n\r\n--{b}\r\n");
        assert!(rendered.contains(&empty_alt));

        let one = rendered.find("name=\"one.bin\"").unwrap();
        let two = rendered.find("name=\"two.txt\"").unwrap();
        assert!(one < two);

        let lines: Vec<&str> = rendered.split("\r\n").collect();
        let payloads: Vec<&str> = lines
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == "Content-Transfer-Encoding: base64")
            .map(|(i, _)| lines[i + 2])
            .collect();
        assert_eq!(payloads.len(), 2);
        assert_eq!(decode_base64(payloads[0]).unwrap(), first);
        assert_eq!(decode_base64(payloads[1]).unwrap(), second);
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut message = Message::new();
        message
            .to("a@x.com")
            .header("X-1", "a")
            .header("X-2", "b")
            .header("X-3", "c")
            .text("t")
            .attachment(Attachment::new("f", "text/plain", b"data".to_vec()));
        assert_eq!(message.render(), message.render());
    }

    #[test]
    fn test_render_reflects_mutation() {
        let mut message = fixed();
        let before = message.render();
        message.subject("Later");
        let after = message.render();
        assert_ne!(before, after);
        assert!(String::from_utf8(after).unwrap().contains("Subject: Later\r\n"));
    }

    #[test]
    fn test_destinations_order() {
        let mut message = fixed();
        message
            .bcc("z@x.com")
            .cc("y@x.com")
            .to("x@x.com")
            .to("x@x.com");
        assert_eq!(
            message.destinations(),
            vec!["x@x.com", "x@x.com", "y@x.com", "z@x.com"]
        );
    }

    #[test]
    fn test_envelope() {
        let mut message = fixed();
        message.from("f@x.com").to("t@x.com").bcc("b@x.com");
        let envelope = message.envelope();
        assert_eq!(envelope.sender, Some("f@x.com"));
        assert_eq!(envelope.recipients, vec!["t@x.com", "b@x.com"]);
    }

    #[test]
    fn test_setters_overwrite() {
        let mut message = fixed();
        message.from("a").from("b").subject("1").subject("2");
        assert_eq!(message.sender(), Some("b"));
        assert_eq!(message.subject_text(), Some("2"));
    }

    #[test]
    fn test_boundaries() {
        let message = Message::new();
        assert_eq!(message.alternative_boundary(), format!("sub_{}", message.boundary()));
        assert_ne!(Message::new().boundary(), message.boundary());
    }

    #[test]
    fn test_utf8_body_passthrough() {
        let mut message = fixed();
        message.subject("Grüße").text("héllo wörld");
        let rendered = render_string(&message);
        assert!(rendered.contains("Subject: Grüße\r\n"));
        assert!(rendered.contains("\r\nhéllo wörld\r\n"));
    }

    #[test]
    fn test_write_to() {
        let mut message = fixed();
        message.to("a@x.com").text("body");
        let mut out = Vec::new();
        message.write_to(&mut out).unwrap();
        assert_eq!(out, message.render());
    }
}
