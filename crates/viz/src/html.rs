//! Escaping helpers for HTML and inline script contexts.

/// Escape HTML special characters to prevent XSS.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Make serialized JSON safe to embed inside a `<script>` element.
#[must_use]
pub fn escape_script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"R&D"</b>'"#),
            "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt;&#39;"
        );
        assert_eq!(escape_html("Auditoría ética"), "Auditoría ética");
    }

    #[test]
    fn test_escape_script_json() {
        assert_eq!(
            escape_script_json(r#"{"t":"</script><script>"}"#),
            r#"{"t":"<\/script><script>"}"#
        );
    }
}
