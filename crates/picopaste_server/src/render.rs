//! HTML page rendering for the landing page and paste views.

const PAGE_TEMPLATE: &str = include_str!("../assets/index.html");

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Page flavor selecting the template's editable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Empty editor with a save button.
    Landing,
    /// Read-only view of a stored paste.
    Paste,
}

/// Render the page template.
///
/// `title` and `content` are escaped; non-UTF-8 content is shown with
/// replacement characters.
pub fn render_page(kind: PageKind, title: &str, content: &[u8]) -> String {
    let text = String::from_utf8_lossy(content);
    let (actions, readonly, hidden) = match kind {
        PageKind::Landing => (String::new(), "", ""),
        PageKind::Paste => (
            format!(
                "<a href=\"/raw/{}\">raw</a> <a href=\"/\">new</a>",
                escape_html(title)
            ),
            "readonly",
            "hidden",
        ),
    };

    // Content goes last so placeholder-like text inside a paste is never expanded.
    PAGE_TEMPLATE
        .replace("{{title}}", &escape_html(title))
        .replace("{{actions}}", &actions)
        .replace("{{readonly}}", readonly)
        .replace("{{hidden}}", hidden)
        .replace("{{content}}", &escape_html(&text))
}
