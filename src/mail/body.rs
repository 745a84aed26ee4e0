use crate::mail::message::ParsedMessage;

pub const NO_BODY: &str = "(No Body Found)";

// Wide enough that html2text never wraps a paragraph; the view wraps.
const HTML_RENDER_WIDTH: usize = 1000;

/// Body to display: first plain part if non-empty, else the first HTML
/// part as text if any text is left, else a placeholder.
pub fn resolve_body(msg: &ParsedMessage) -> String {
    if let Some(plain) = msg.text_plain.first() {
        if !plain.is_empty() {
            return plain.clone();
        }
    }

    if let Some(html) = msg.text_html.first() {
        let text = strip_html(html);
        if !text.is_empty() {
            return text;
        }
    }

    NO_BODY.to_string()
}

/// Visible text of an HTML document, one trimmed line per text block.
pub fn strip_html(html: &str) -> String {
    let rendered = html2text::config::plain_no_decorate()
        .string_from_read(html.as_bytes(), HTML_RENDER_WIDTH)
        .unwrap_or_else(|e| {
            log::warn!("html render failed: {e}");
            String::new()
        });

    rendered
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(plain: &[&str], html: &[&str]) -> ParsedMessage {
        ParsedMessage {
            text_plain: plain.iter().map(|s| s.to_string()).collect(),
            text_html: html.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn plain_wins_over_html() {
        let m = msg(&["plain text\n  kept  \n"], &["<p>html text</p>"]);
        assert_eq!(resolve_body(&m), "plain text\n  kept  \n");
    }

    #[test]
    fn only_first_plain_part_is_used() {
        let m = msg(&["first", "second"], &[]);
        assert_eq!(resolve_body(&m), "first");
    }

    #[test]
    fn html_only_is_stripped() {
        let m = msg(&[], &["<p>Hi <b>there</b></p>"]);
        let body = resolve_body(&m);
        assert!(body.contains("Hi"));
        assert!(body.contains("there"));
        assert!(!body.contains('<'));
        assert!(!body.contains('>'));
    }

    #[test]
    fn empty_plain_falls_back_to_html() {
        let m = msg(&[""], &["<div>from html</div>"]);
        assert_eq!(resolve_body(&m), "from html");
    }

    #[test]
    fn empty_html_is_no_body() {
        assert_eq!(resolve_body(&msg(&[""], &["<div></div>"])), "(No Body Found)");
        assert_eq!(resolve_body(&msg(&[], &["<p>  </p>"])), "(No Body Found)");
    }

    #[test]
    fn blocks_become_lines() {
        let body = strip_html("<html><body><p>  one </p><p>two</p></body></html>");
        assert_eq!(body, "one\ntwo");
    }

    #[test]
    fn nothing_to_show() {
        assert_eq!(resolve_body(&msg(&[], &[])), "(No Body Found)");
    }
}
