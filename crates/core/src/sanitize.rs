//! Plain-text sanitization for webhook-supplied strings.
//!
//! Tracking numbers, statuses, and currency codes arrive from an external
//! sender and end up rendered by downstream tracking pages, so they are
//! reduced to plain text on the way in: markup tags and control characters
//! are stripped and surrounding whitespace trimmed. This is a sanitizer,
//! not a validator; it never rejects input.

/// Strip markup tags and control characters and trim whitespace.
#[must_use]
pub fn sanitize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;

    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ if c.is_control() => {}
            _ => out.push(c),
        }
    }

    out.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(sanitize_text("TRK-100200"), "TRK-100200");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(sanitize_text("  shipped \n"), "shipped");
    }

    #[test]
    fn test_strips_tags() {
        assert_eq!(
            sanitize_text("<script>alert(1)</script>TRK1"),
            "alert(1)TRK1"
        );
        assert_eq!(sanitize_text("<b>bold</b> text"), "bold text");
    }

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(sanitize_text("TRK\u{0}1\u{7}"), "TRK1");
    }

    #[test]
    fn test_unclosed_tag_drops_remainder() {
        assert_eq!(sanitize_text("TRK1<img src=x"), "TRK1");
    }

    #[test]
    fn test_empty() {
        assert_eq!(sanitize_text(""), "");
    }
}
