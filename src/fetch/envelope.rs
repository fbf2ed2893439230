// src/fetch/envelope.rs

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// The callback wrapper the feed serves its JSON inside. `(?s)` lets the
/// greedy capture run across lines up to the final closing parenthesis, so
/// parentheses inside the payload (date markers) stay intact.
static WRAPPER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)google\.visualization\.Query\.setResponse\((.*)\)").unwrap()
});

/// Extract the JSON argument from the feed's callback envelope.
///
/// The wrapper may sit anywhere in the body — the feed prefixes a comment
/// line — and trailing characters after the call are tolerated. A body with
/// no wrapper is fatal: the caller gets an error, never an empty table.
pub fn extract_payload(body: &str) -> Result<&str> {
    WRAPPER
        .captures(body)
        .and_then(|caps| caps.get(1).map(|m| m.as_str().trim()))
        .ok_or_else(|| {
            warn!(body_len = body.len(), "no setResponse wrapper in feed body");
            anyhow!("feed envelope not recognized")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_bare_wrapper() {
        let body = r#"google.visualization.Query.setResponse({"status":"ok"});"#;
        assert_eq!(extract_payload(body).unwrap(), r#"{"status":"ok"}"#);
    }

    #[test]
    fn test_tolerates_prefix_and_trailing_characters() {
        let body = "/*O_o*/\ngoogle.visualization.Query.setResponse({\"table\":{\"rows\":[]}});\n\n";
        assert_eq!(extract_payload(body).unwrap(), "{\"table\":{\"rows\":[]}}");
    }

    #[test]
    fn test_payload_parentheses_survive() {
        let body = r#"google.visualization.Query.setResponse({"v":"Date(2024,0,15)"});"#;
        assert_eq!(extract_payload(body).unwrap(), r#"{"v":"Date(2024,0,15)"}"#);
    }

    #[test]
    fn test_unrecognized_envelope_fails() {
        let err = extract_payload("<html>not a feed</html>").unwrap_err();
        assert!(err.to_string().contains("envelope not recognized"));
        assert!(extract_payload("").is_err());
    }
}
