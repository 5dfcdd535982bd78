//! HTML rendering for chat messages and analysis cards.
//!
//! Chat messages use a deliberately small inline subset:
//!
//! | Source              | Output                     |
//! |---------------------|----------------------------|
//! | `**bold**`          | `<strong>bold</strong>`    |
//! | `*italic*`          | `<em>italic</em>`          |
//! | `* item` / `- item` | `<li>` inside one `<ul>`   |
//! | newline             | `<br>`                     |
//!
//! No nested emphasis, code spans, links or tables. Analysis card bodies go
//! through `pulldown-cmark` instead.

use once_cell::sync::Lazy;
use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

use crate::sections::AnalysisSection;

/// `**bold**` spans; shared with the terminal renderer.
pub(crate) static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("static regex"));
/// `*italic*` spans; apply after [`BOLD`].
pub(crate) static ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("static regex"));

/// Escape the characters that would otherwise be read as markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Strip a leading `* ` or `- ` list marker.
pub fn list_item_text(line: &str) -> Option<&str> {
    line.strip_prefix("* ").or_else(|| line.strip_prefix("- "))
}

fn render_emphasis(line: &str) -> String {
    let bolded = BOLD.replace_all(line, "<strong>$1</strong>");
    ITALIC.replace_all(&bolded, "<em>$1</em>").into_owned()
}

/// Render one chat message as an HTML fragment.
pub fn render_inline(content: &str) -> String {
    let escaped = escape_html(content);
    let mut out = String::with_capacity(escaped.len() + 16);
    let mut in_list = false;

    for (idx, line) in escaped.split('\n').enumerate() {
        match list_item_text(line) {
            Some(item) => {
                if !in_list {
                    if idx > 0 {
                        out.push_str("<br>");
                    }
                    out.push_str("<ul>");
                    in_list = true;
                }
                out.push_str("<li>");
                out.push_str(&render_emphasis(item));
                out.push_str("</li>");
            }
            None => {
                if in_list {
                    out.push_str("</ul>");
                    in_list = false;
                }
                if idx > 0 {
                    out.push_str("<br>");
                }
                out.push_str(&render_emphasis(line));
            }
        }
    }
    if in_list {
        out.push_str("</ul>");
    }
    out
}

/// Full CommonMark (plus tables and strikethrough) to HTML.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// One analysis section as a themed card.
pub fn render_card(section: &AnalysisSection) -> String {
    format!(
        "<section class=\"card card-{theme}\" data-icon=\"{icon}\">\n<h2>{title}</h2>\n<div class=\"card-body\">\n{body}</div>\n</section>\n",
        theme = escape_html(&section.theme),
        icon = escape_html(&section.icon),
        title = escape_html(&section.title),
        body = render_markdown(&section.body_markdown),
    )
}

/// All cards, in the order given.
pub fn render_cards(sections: &[AnalysisSection]) -> String {
    sections.iter().map(render_card).collect()
}

/// A standalone HTML page wrapping the cards.
pub fn render_report(filename: &str, sections: &[AnalysisSection]) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Analysis of {name}</title>\n</head>\n<body>\n<h1>Analysis of {name}</h1>\n{cards}</body>\n</html>\n",
        name = escape_html(filename),
        cards = render_cards(sections),
    )
}
