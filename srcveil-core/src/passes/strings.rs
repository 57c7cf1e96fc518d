//! String-literal marker pass
//!
//! Replaces double-quoted string literals with `"__ENC__<base64>__"`
//! markers carrying a reversible encoding of the literal's bytes. The scan
//! is purely textual: escape sequences are not parsed, so a literal
//! containing an escaped quote will mis-scan.

use base64::{engine::general_purpose, Engine as _};
use regex::Regex;

/// Marker prefix embedded into transformed literals
pub const MARKER_PREFIX: &str = "__ENC__";

/// Marker suffix closing the encoded payload
pub const MARKER_SUFFIX: &str = "__";

/// Replace every non-empty double-quoted literal with an encoded marker.
///
/// Empty literals (`""`) pass through unchanged and are not counted.
/// Returns the rewritten text and the number of literals transformed.
pub fn encrypt_strings(source: &str) -> (String, usize) {
    let re = Regex::new(r#""([^"]*)""#).unwrap();
    let mut count = 0;

    let out = re.replace_all(source, |caps: &regex::Captures| {
        let literal = &caps[1];
        if literal.is_empty() {
            return "\"\"".to_string();
        }
        count += 1;
        let payload = general_purpose::STANDARD.encode(literal);
        format!("\"{}{}{}\"", MARKER_PREFIX, payload, MARKER_SUFFIX)
    });

    (out.into_owned(), count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    #[test]
    fn test_literal_becomes_marker() {
        let (out, count) = encrypt_strings(r#"printf("hello");"#);
        assert_eq!(count, 1);
        assert!(out.contains("__ENC__aGVsbG8=__"));
        assert!(!out.contains(r#""hello""#));
    }

    #[test]
    fn test_marker_payload_round_trips() {
        let (out, _) = encrypt_strings(r#"puts("hello");"#);
        let start = out.find("__ENC__").unwrap() + "__ENC__".len();
        let end = out[start..].find("__").unwrap() + start;
        let decoded = general_purpose::STANDARD.decode(&out[start..end]).unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn test_empty_literal_untouched() {
        let (out, count) = encrypt_strings(r#"const char* s = "";"#);
        assert_eq!(count, 0);
        assert_eq!(out, r#"const char* s = "";"#);
    }

    #[test]
    fn test_multiple_literals_counted() {
        let (out, count) = encrypt_strings(r#"printf("a"); printf("b"); printf("");"#);
        assert_eq!(count, 2);
        assert_eq!(out.matches("__ENC__").count(), 2);
        assert!(out.contains(r#"printf("");"#));
    }

    #[test]
    fn test_no_literals_no_change() {
        let source = "int main() { return 0; }";
        let (out, count) = encrypt_strings(source);
        assert_eq!(count, 0);
        assert_eq!(out, source);
    }
}
