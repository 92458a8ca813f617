//! Integration tests for message rendering.
//!
//! These check the rendered byte stream from the outside, the way a
//! downstream MIME reader would see it.

#![allow(clippy::unwrap_used)]

use mimecraft::encoding::decode_base64;
use mimecraft::{Attachment, Message};
use proptest::prelude::*;

fn lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8(bytes.to_vec())
        .unwrap()
        .split("\r\n")
        .map(str::to_string)
        .collect()
}

/// Base64 payload lines, in order, for every attachment part.
fn attachment_payloads(lines: &[String]) -> Vec<Vec<u8>> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.as_str() == "Content-Transfer-Encoding: base64")
        .map(|(i, _)| {
            assert_eq!(lines[i + 1], "", "blank line after part headers");
            decode_base64(&lines[i + 2]).unwrap()
        })
        .collect()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn count(lines: &[String], needle: &str) -> usize {
    lines.iter().filter(|l| l.as_str() == needle).count()
}

#[test]
fn header_block_is_terminated_by_blank_line() {
    init_tracing();
    let mut message = Message::new();
    message.from("a@x.com").to("b@x.com").subject("Hi").text("hello");
    let rendered = String::from_utf8(message.render()).unwrap();

    let (head, body) = rendered.split_once("\r\n\r\n").unwrap();
    assert!(head.starts_with("From:  a@x.com\r\nTo: b@x.com\r\nSubject: Hi\r\n"));
    assert!(head.ends_with("MIME-Version: 1.0"));
    assert!(body.starts_with(&format!("--{}\r\n", message.boundary())));
}

#[test]
fn generated_lines_end_with_crlf() {
    init_tracing();
    let mut message = Message::new();
    message
        .to("b@x.com")
        .text("line")
        .attachment(Attachment::new("n.bin", "application/octet-stream", b"\n\n\r".to_vec()));
    let rendered = message.render();

    for (i, byte) in rendered.iter().enumerate() {
        if *byte == b'\n' {
            assert!(i > 0 && rendered[i - 1] == b'\r', "bare LF at {i}");
        }
    }
}

#[test]
fn bodies_are_written_verbatim() {
    let mut message = Message::new();
    message.text("one\ntwo\r\nthree").html("<p>a</p>\n<p>b</p>");
    let rendered = String::from_utf8(message.render()).unwrap();

    // Line endings inside bodies are not normalized.
    assert!(rendered.contains("\r\n\r\none\ntwo\r\nthree\r\n\r\n"));
    assert!(rendered.contains("\r\n\r\n<p>a</p>\n<p>b</p>\r\n\r\n"));
}

#[test]
fn inner_boundary_is_prefixed_outer() {
    let message = Message::new();
    assert_eq!(
        message.alternative_boundary(),
        format!("sub_{}", message.boundary())
    );
    assert_ne!(message.alternative_boundary(), message.boundary());
}

#[test]
fn structure_without_content() {
    let message = Message::new();
    let b = message.boundary().to_string();
    let sub = message.alternative_boundary();
    let lines = lines(&message.render());

    assert_eq!(count(&lines, &format!(" boundary=\"{b}\"")), 1);
    assert_eq!(count(&lines, &format!(" boundary=\"{sub}\"")), 1);
    assert_eq!(count(&lines, &format!("--{b}")), 1);
    assert_eq!(count(&lines, &format!("--{b}--")), 1);
    assert_eq!(count(&lines, &format!("--{sub}")), 0);
    assert_eq!(count(&lines, &format!("--{sub}--")), 1);
    assert_eq!(lines.last().unwrap(), &format!("--{b}--"));
}

#[test]
fn message_can_be_cloned_and_diverge() {
    let mut original = Message::new();
    original.to("a@x.com").text("shared");

    let mut copy = original.clone();
    copy.subject("Only on the copy");

    assert_eq!(copy.boundary(), original.boundary());
    assert!(
        !String::from_utf8(original.render())
            .unwrap()
            .contains("Only on the copy")
    );
}

fn addresses() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}@[a-z]{1,8}\\.com", 0..5)
}

proptest! {
    #[test]
    fn destinations_concatenate_in_order(to in addresses(), cc in addresses(), bcc in addresses()) {
        let mut message = Message::new();
        for a in &to { message.to(a.as_str()); }
        for a in &cc { message.cc(a.as_str()); }
        for a in &bcc { message.bcc(a.as_str()); }

        let expected: Vec<&str> = to.iter().chain(&cc).chain(&bcc).map(String::as_str).collect();
        prop_assert_eq!(message.destinations(), expected);
    }

    #[test]
    fn attachments_round_trip(payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..512), 0..4)) {
        let mut message = Message::new();
        for (i, data) in payloads.iter().enumerate() {
            message.attachment(Attachment::new(format!("file{i}.bin"), "application/octet-stream", data.clone()));
        }

        let lines = lines(&message.render());
        prop_assert_eq!(attachment_payloads(&lines), payloads.clone());
        prop_assert_eq!(count(&lines, &format!("--{}", message.boundary())), 1 + payloads.len());
        prop_assert_eq!(count(&lines, &format!("--{}--", message.boundary())), 1);
    }

    #[test]
    fn render_is_idempotent(subject in ".{0,40}", text in ".{0,200}", html in ".{0,200}") {
        let mut message = Message::new();
        message.subject(subject).text(text).html(html);
        prop_assert_eq!(message.render(), message.render());
    }

    #[test]
    fn boundaries_are_unique(n in 2usize..20) {
        let mut seen: Vec<String> = (0..n).map(|_| Message::new().boundary().to_string()).collect();
        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), n);
    }
}
