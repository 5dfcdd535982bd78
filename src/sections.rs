//! Splitting a free-form analysis into catalog sections.
//!
//! The backend is prompted to produce markdown with a fixed set of bold
//! headers (`**Document Summary:**`, `**Key Parties Involved:**`, ...). The
//! split is best-effort: a header that is missing simply yields no section,
//! and malformed headers never cause an error.
//!
//! ## Scan
//! One pass over [`SECTION_CATALOG`] with a cursor into the text:
//! 1. look for this entry's header at or after the cursor (Unicode
//!    case-insensitive); skip the entry if absent
//! 2. the body ends at the *next catalog entry's* header found after this
//!    one, or at end of text
//! 3. the cursor advances to the end of the matched header
//!
//! Titles that are substrings of one another, or headers that deviate from
//! the `**Title:**` form, will not split cleanly.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// One known section header and how it is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub title: &'static str,
    pub theme: &'static str,
    pub icon: &'static str,
}

/// Recognised section titles, in display order.
pub const SECTION_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        title: "Document Summary",
        theme: "summary",
        icon: "file-text",
    },
    CatalogEntry {
        title: "Key Parties Involved",
        theme: "parties",
        icon: "users",
    },
    CatalogEntry {
        title: "Potential Risks & Red Flags",
        theme: "risks",
        icon: "alert-triangle",
    },
    CatalogEntry {
        title: "Major Obligations & Responsibilities",
        theme: "obligations",
        icon: "clipboard-check",
    },
    CatalogEntry {
        title: "Critical Dates & Deadlines",
        theme: "dates",
        icon: "calendar",
    },
    CatalogEntry {
        title: "Glossary of Jargon",
        theme: "glossary",
        icon: "book-open",
    },
];

/// `**<title>:**` matchers, index-aligned with [`SECTION_CATALOG`].
static HEADER_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| SECTION_CATALOG.iter().map(|e| header_pattern(e.title)).collect());

fn header_pattern(title: &str) -> Regex {
    RegexBuilder::new(&format!(r"\*\*{}:\*\*", regex::escape(title)))
        .case_insensitive(true)
        .build()
        .expect("escaped catalog title is a valid pattern")
}

/// Look up a catalog entry by exact title.
pub fn catalog_entry(title: &str) -> Option<&'static CatalogEntry> {
    SECTION_CATALOG.iter().find(|e| e.title == title)
}

/// One rendered-ready section of an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSection {
    pub title: String,
    pub theme: String,
    pub icon: String,
    /// Section body with the header removed and surrounding whitespace trimmed.
    pub body_markdown: String,
}

impl AnalysisSection {
    fn from_entry(entry: &CatalogEntry, body: &str) -> Self {
        Self {
            title: entry.title.to_string(),
            theme: entry.theme.to_string(),
            icon: entry.icon.to_string(),
            body_markdown: body.trim().to_string(),
        }
    }
}

/// Split `analysis` into sections, ordered by catalog position.
pub fn split_sections(analysis: &str) -> Vec<AnalysisSection> {
    let mut sections = Vec::new();
    let mut cursor = 0usize;

    for (idx, entry) in SECTION_CATALOG.iter().enumerate() {
        let Some(header) = HEADER_PATTERNS[idx].find_at(analysis, cursor) else {
            continue;
        };
        let body_start = header.end();
        let body_end = HEADER_PATTERNS
            .get(idx + 1)
            .and_then(|next| next.find_at(analysis, body_start))
            .map(|m| m.start())
            .unwrap_or(analysis.len());

        sections.push(AnalysisSection::from_entry(
            entry,
            &analysis[body_start..body_end],
        ));
        cursor = body_start;
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn titles(sections: &[AnalysisSection]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn two_adjacent_sections() {
        let sections = split_sections("**Document Summary:** A.\n**Key Parties Involved:** B.");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Document Summary");
        assert_eq!(sections[0].body_markdown, "A.");
        assert_eq!(sections[1].title, "Key Parties Involved");
        assert_eq!(sections[1].body_markdown, "B.");
        for s in &sections {
            assert!(!s.title.contains("**"));
            assert!(!s.body_markdown.contains("**"));
        }
    }

    #[test]
    fn theme_and_icon_come_from_catalog() {
        let sections = split_sections("**Potential Risks & Red Flags:** late fees");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].theme, "risks");
        assert_eq!(sections[0].icon, "alert-triangle");
    }

    #[test]
    fn absent_title_is_omitted_without_placeholder() {
        let text = "**Document Summary:** A lease.\n**Potential Risks & Red Flags:** None.";
        let sections = split_sections(text);
        assert_eq!(titles(&sections), vec!["Document Summary", "Potential Risks & Red Flags"]);
        assert!(sections.iter().all(|s| !s.body_markdown.is_empty()));
    }

    #[test]
    fn last_header_runs_to_end_of_string() {
        let text = "intro\n**Glossary of Jargon:**\n* Lessee: the tenant\n* Lessor: the landlord\n";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].body_markdown,
            "* Lessee: the tenant\n* Lessor: the landlord"
        );
    }

    #[test]
    fn body_extends_to_end_when_next_catalog_title_missing() {
        // Parties is absent, so Summary is not cut at the Risks header.
        let text = "**Document Summary:** A.\n**Potential Risks & Red Flags:** R.";
        let sections = split_sections(text);
        assert_eq!(
            sections[0].body_markdown,
            "A.\n**Potential Risks & Red Flags:** R."
        );
        assert_eq!(sections[1].body_markdown, "R.");
    }

    #[test]
    fn header_match_is_case_insensitive() {
        let sections = split_sections("**DOCUMENT SUMMARY:** shouting\n**key parties involved:** quiet");
        assert_eq!(titles(&sections), vec!["Document Summary", "Key Parties Involved"]);
        assert_eq!(sections[0].body_markdown, "shouting");
        assert_eq!(sections[1].body_markdown, "quiet");
    }

    #[test]
    fn header_match_uses_unicode_case_folding() {
        // U+212A KELVIN SIGN folds to `k`.
        let sections = split_sections("**\u{212A}ey Parties Involved:** folded");
        assert_eq!(titles(&sections), vec!["Key Parties Involved"]);
        assert_eq!(sections[0].body_markdown, "folded");
    }

    #[test]
    fn header_behind_cursor_is_skipped() {
        // Dates sits before Summary, so it is behind the cursor once Summary matches.
        let text = "**Critical Dates & Deadlines:** Jan 1.\n**Document Summary:** A.";
        let sections = split_sections(text);
        assert_eq!(titles(&sections), vec!["Document Summary"]);
        assert_eq!(sections[0].body_markdown, "A.");
    }

    #[test]
    fn out_of_order_header_found_when_earlier_titles_absent() {
        let text = "**Glossary of Jargon:** G.\n**Critical Dates & Deadlines:** D.";
        let sections = split_sections(text);
        assert_eq!(titles(&sections), vec!["Critical Dates & Deadlines"]);
        assert_eq!(sections[0].body_markdown, "D.");
    }

    #[test]
    fn header_without_colon_is_not_recognised() {
        assert!(split_sections("**Document Summary** no colon").is_empty());
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(split_sections("").is_empty());
    }

    #[test]
    fn full_analysis_yields_all_six() {
        let text = "\
1.  **Document Summary:** A residential lease.

2.  **Key Parties Involved:**
    *   Landlord: ACME
    *   Tenant: Jane

3.  **Potential Risks & Red Flags:**
    *   Automatic renewal.

4.  **Major Obligations & Responsibilities:**
    *   **For Tenant:** pay rent.

5.  **Critical Dates & Deadlines:**
    *   Start: 2024-01-01

6.  **Glossary of Jargon:**
    *   Indemnify: protect from loss.
";
        let sections = split_sections(text);
        assert_eq!(sections.len(), SECTION_CATALOG.len());
        for (section, entry) in sections.iter().zip(SECTION_CATALOG) {
            assert_eq!(section.title, entry.title);
        }
        assert_eq!(sections[0].body_markdown, "A residential lease.\n\n2.");
        assert!(sections[3].body_markdown.contains("**For Tenant:** pay rent."));
        assert!(sections[5].body_markdown.ends_with("protect from loss."));
    }

    #[test]
    fn catalog_lookup() {
        assert_eq!(catalog_entry("Glossary of Jargon").map(|e| e.theme), Some("glossary"));
        assert!(catalog_entry("Nope").is_none());
    }

    #[test]
    fn catalog_titles_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for entry in SECTION_CATALOG {
            assert!(seen.insert(entry.title), "duplicate title {}", entry.title);
        }
    }

    proptest! {
        #[test]
        fn never_panics_and_never_exceeds_catalog(text in "\\PC*") {
            let sections = split_sections(&text);
            prop_assert!(sections.len() <= SECTION_CATALOG.len());
        }

        #[test]
        fn plain_text_without_stars_yields_nothing(text in "[a-zA-Z0-9 .,:\n]*") {
            prop_assert!(split_sections(&text).is_empty());
        }
    }
}
