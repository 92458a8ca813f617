//! Custom message headers.

use std::collections::HashMap;

/// Custom headers attached to a message.
///
/// Names are stored exactly as given and are unique: setting a name
/// again replaces its value. Empty values are kept but skipped when
/// rendering, so a header can be suppressed after the fact by setting
/// it to `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    headers: HashMap<String, String>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header value, replacing any existing value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Gets the stored value for a header, empty or not.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Number of stored headers, including empty ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns `true` if no headers are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns an iterator over all stored headers.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Headers that will be rendered, sorted by name.
    ///
    /// Sorting keeps output stable across renders and processes.
    #[must_use]
    pub fn renderable(&self) -> Vec<(&str, &str)> {
        let mut visible: Vec<_> = self.iter().filter(|(_, v)| !v.is_empty()).collect();
        visible.sort_by(|(a, _), (b, _)| a.cmp(b));
        visible
    }

    /// Formats the renderable headers as `Name: value` lines.
    ///
    /// No trailing `;` follows the value.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        self.renderable()
            .into_iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_new() {
        let headers = Headers::new();
        assert!(headers.is_empty());
        assert!(headers.to_lines().is_empty());
    }

    #[test]
    fn test_headers_set_overwrites() {
        let mut headers = Headers::new();
        headers.set("X-Mailer", "one");
        headers.set("X-Mailer", "two");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("X-Mailer"), Some("two"));
    }

    #[test]
    fn test_headers_names_are_exact() {
        let mut headers = Headers::new();
        headers.set("X-Tag", "a");
        assert_eq!(headers.get("x-tag"), None);
        assert_eq!(headers.to_lines(), vec!["X-Tag: a"]);
    }

    #[test]
    fn test_empty_value_suppressed() {
        let mut headers = Headers::new();
        headers.set("X-Priority", "1");
        headers.set("X-Empty", "");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.to_lines(), vec!["X-Priority: 1"]);

        // Late emptying suppresses a previously visible header.
        headers.set("X-Priority", "");
        assert!(headers.to_lines().is_empty());
    }

    #[test]
    fn test_renderable_sorted() {
        let mut headers = Headers::new();
        headers.set("X-B", "2");
        headers.set("X-A", "1");
        headers.set("Reply-To", "r@example.com");
        assert_eq!(
            headers.to_lines(),
            vec!["Reply-To: r@example.com", "X-A: 1", "X-B: 2"]
        );
    }

    #[test]
    fn test_line_format_has_no_trailing_semicolon() {
        let mut headers = Headers::new();
        headers.set("X-Campaign", "spring");
        headers.set("X-Params", "a=1; b=2");
        assert_eq!(
            headers.to_lines(),
            vec!["X-Campaign: spring", "X-Params: a=1; b=2"]
        );
    }
}
