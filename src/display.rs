//! Terminal presentation of turns, status lines and analysis sections.

use colored::*;

use crate::api::{ConversationTurn, Role};
use crate::render::{list_item_text, BOLD, ITALIC};
use crate::sections::AnalysisSection;

pub fn role_label(role: Role) -> ColoredString {
    match role {
        Role::User => "you".bright_green().bold(),
        Role::Model => "assistant".bright_cyan().bold(),
    }
}

/// Apply terminal emphasis to a markdown message: bold, italic, bullets.
pub fn style_markdown(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            let (prefix, text) = match list_item_text(line.trim_start()) {
                Some(item) => ("  • ", item.trim_start()),
                None => ("", line),
            };
            let bolded = BOLD.replace_all(text, |caps: &regex::Captures| {
                caps[1].bold().to_string()
            });
            let styled = ITALIC.replace_all(&bolded, |caps: &regex::Captures| {
                caps[1].italic().to_string()
            });
            format!("{prefix}{styled}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_turn(turn: &ConversationTurn) -> String {
    format!("{}: {}", role_label(turn.role), style_markdown(&turn.content))
}

pub fn render_section(section: &AnalysisSection) -> String {
    format!(
        "{} {}\n{}\n{}",
        format!("[{}]", section.icon).bright_black(),
        section.title.bright_yellow().bold(),
        "-".repeat(section.title.len()).bright_blue(),
        style_markdown(&section.body_markdown)
    )
}

pub fn render_status(status: &str, is_error: bool) -> String {
    if is_error {
        status.bright_red().to_string()
    } else {
        status.bright_black().to_string()
    }
}

pub fn print_header(title: &str, base_url: &str) {
    println!("{}", "LEGAL LENS".bright_cyan().bold());
    println!("{}: {}", "Backend".bright_yellow(), base_url);
    println!("{}", title.bright_white());
    println!("{}", "=".repeat(50).bright_blue());
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn plain(s: &str) -> String {
        // Strip ANSI escape sequences so assertions don't depend on tty detection.
        let ansi = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        ansi.replace_all(s, "").into_owned()
    }

    #[test]
    fn bullets_become_dots() {
        let out = plain(&style_markdown("Parties:\n* Landlord\n- Tenant"));
        assert_eq!(out, "Parties:\n  • Landlord\n  • Tenant");
    }

    #[test]
    fn indented_prompt_style_bullets() {
        let out = plain(&style_markdown("    *   **Landlord:** ACME"));
        assert_eq!(out, "  • Landlord: ACME");
    }

    #[test]
    fn emphasis_markers_removed() {
        let out = plain(&style_markdown("**bold** and *italic*"));
        assert_eq!(out, "bold and italic");
    }

    #[test]
    fn turn_has_role_label() {
        let out = plain(&render_turn(&ConversationTurn::model("hi")));
        assert_eq!(out, "assistant: hi");
        let out = plain(&render_turn(&ConversationTurn::user("yo")));
        assert_eq!(out, "you: yo");
    }

    #[test]
    fn section_shows_icon_and_title() {
        let section = AnalysisSection {
            title: "Glossary of Jargon".into(),
            theme: "glossary".into(),
            icon: "book-open".into(),
            body_markdown: "* Lessee: tenant".into(),
        };
        let out = plain(&render_section(&section));
        assert!(out.starts_with("[book-open] Glossary of Jargon"));
        assert!(out.ends_with("  • Lessee: tenant"));
    }

    #[test]
    fn status_text_preserved() {
        assert_eq!(plain(&render_status("Error: bad file", true)), "Error: bad file");
        assert_eq!(plain(&render_status("Uploading x...", false)), "Uploading x...");
    }

    #[test]
    fn error_flag_colours_unprefixed_status() {
        colored::control::set_override(true);
        let refused = render_status("Please choose a PDF file.", true);
        let progress = render_status("Please choose a PDF file.", false);
        colored::control::unset_override();
        assert_ne!(refused, progress);
        assert_eq!(refused, "Please choose a PDF file.".bright_red().to_string());
    }
}
