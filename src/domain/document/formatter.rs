//! Document layout for export and preview.
//!
//! Turns a draft into numbered sections with indented body paragraphs.

use once_cell::sync::Lazy;
use regex::Regex;

/// Section headings recognized by the formatter, matched case-insensitively
/// against a whole line.
pub const HEADING_VOCABULARY: [&str; 12] = [
    "agreement",
    "parties",
    "definitions",
    "terms",
    "termination",
    "confidentiality",
    "governing law",
    "dispute resolution",
    "miscellaneous",
    "signatures",
    "witnesseth",
    "now, therefore",
];

/// Indentation applied to body lines.
pub const BODY_INDENT: &str = "    ";

static BLANK_LINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n+").unwrap());

static UPPERCASE_HEADINGS: Lazy<Vec<String>> = Lazy::new(|| {
    HEADING_VOCABULARY
        .iter()
        .map(|heading| heading.to_uppercase())
        .collect()
});

/// Formats a draft into the export layout.
///
/// # Steps
/// 1. Strip and collapse blank-line runs to one blank line
/// 2. Upper-case lines that are exactly a vocabulary heading
/// 3. Number heading lines (vocabulary match or trailing colon) from 1,
///    indent every other line by four spaces
/// 4. Join lines with a blank line between each
/// 5. Strip and terminate with a single newline
pub fn format(raw: &str) -> String {
    let content = BLANK_LINE_RUN.replace_all(raw.trim(), "\n\n");
    let content = capitalize_headings(&content);

    let mut section_number = 1usize;
    let blocks: Vec<String> = content
        .split('\n')
        .map(|line| {
            let trimmed = line.trim();
            if is_section_heading(trimmed) {
                let block = format!("{}. {}", section_number, trimmed.to_uppercase());
                section_number += 1;
                block
            } else {
                format!("{}{}", BODY_INDENT, trimmed)
            }
        })
        .collect();

    let mut formatted = blocks.join("\n\n").trim().to_string();
    formatted.push('\n');
    formatted
}

/// Returns true if a trimmed line is treated as a numbered section heading.
pub fn is_section_heading(trimmed: &str) -> bool {
    let upper = trimmed.to_uppercase();
    UPPERCASE_HEADINGS.iter().any(|heading| *heading == upper) || trimmed.ends_with(':')
}

fn capitalize_headings(content: &str) -> String {
    content
        .split('\n')
        .map(|line| {
            if HEADING_VOCABULARY
                .iter()
                .any(|heading| line.trim().eq_ignore_ascii_case(heading))
            {
                line.to_uppercase()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
