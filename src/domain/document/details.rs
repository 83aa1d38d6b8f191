//! Structured detail extraction from drafted text.
//!
//! A fixed battery of case-insensitive patterns pulls the parties, dates,
//! term, and jurisdiction out of free text. Fields without a match carry the
//! [`NOT_FOUND`] sentinel instead of failing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel value for fields whose pattern did not match.
pub const NOT_FOUND: &str = "Not Found";

/// Separator placed between conversation turns when flattening them into a
/// single search text.
pub const TURN_SEPARATOR: &str = "\n";

/// A field recognized by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailField {
    PartyA,
    PartyB,
    EffectiveDate,
    Term,
    Jurisdiction,
}

impl DetailField {
    /// All fields, in extraction order.
    pub const ALL: [DetailField; 5] = [
        DetailField::PartyA,
        DetailField::PartyB,
        DetailField::EffectiveDate,
        DetailField::Term,
        DetailField::Jurisdiction,
    ];

    /// The field's key in serialized output.
    pub fn key(&self) -> &'static str {
        match self {
            Self::PartyA => "party_a",
            Self::PartyB => "party_b",
            Self::EffectiveDate => "effective_date",
            Self::Term => "term",
            Self::Jurisdiction => "jurisdiction",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Self::PartyA => &PARTY_A,
            Self::PartyB => &PARTY_B,
            Self::EffectiveDate => &EFFECTIVE_DATE,
            Self::Term => &TERM,
            Self::Jurisdiction => &JURISDICTION,
        }
    }
}

impl fmt::Display for DetailField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

static PARTY_A: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)This agreement is made between\s+(.*?)\s+and").unwrap());

// First "and" followed by whitespace, even at the end of a longer word.
static PARTY_B: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)and\s+(.*?)\s+on").unwrap());

static EFFECTIVE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)effective\s+on\s+([A-Za-z0-9,\s]+)[.\n]").unwrap());

static TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)shall remain in effect for\s+([A-Za-z0-9\s]+)[.\n]").unwrap());

static JURISDICTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)governed by the laws of\s+([A-Za-z\s]+)[.\n]").unwrap());

/// Fields extracted from a document or conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDetails {
    pub party_a: String,
    pub party_b: String,
    pub effective_date: String,
    pub term: String,
    pub jurisdiction: String,
}

impl ExtractedDetails {
    /// Returns the value for a field.
    pub fn get(&self, field: DetailField) -> &str {
        match field {
            DetailField::PartyA => &self.party_a,
            DetailField::PartyB => &self.party_b,
            DetailField::EffectiveDate => &self.effective_date,
            DetailField::Term => &self.term,
            DetailField::Jurisdiction => &self.jurisdiction,
        }
    }

    /// Returns true if the field's pattern matched.
    pub fn is_found(&self, field: DetailField) -> bool {
        self.get(field) != NOT_FOUND
    }

    /// Number of fields whose pattern matched.
    pub fn found_count(&self) -> usize {
        DetailField::ALL.iter().filter(|f| self.is_found(**f)).count()
    }
}

/// Extracts details from a single text.
pub fn extract(text: &str) -> ExtractedDetails {
    ExtractedDetails {
        party_a: find(DetailField::PartyA, text),
        party_b: find(DetailField::PartyB, text),
        effective_date: find(DetailField::EffectiveDate, text),
        term: find(DetailField::Term, text),
        jurisdiction: find(DetailField::Jurisdiction, text),
    }
}

/// Extracts details from conversation turns.
///
/// Turn contents are joined, in order, with [`TURN_SEPARATOR`] before the
/// patterns run, so the earliest occurrence in the conversation wins.
pub fn extract_from_turns<'a, I>(turns: I) -> ExtractedDetails
where
    I: IntoIterator<Item = &'a str>,
{
    extract(&search_text(turns))
}

/// Flattens conversation turns into the search text used by the extractor.
pub fn search_text<'a, I>(turns: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    turns.into_iter().collect::<Vec<_>>().join(TURN_SEPARATOR)
}

fn find(field: DetailField, text: &str) -> String {
    field
        .pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| NOT_FOUND.to_string())
}
