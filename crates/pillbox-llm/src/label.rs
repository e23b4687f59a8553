//! Reading a medicine name and expiry date from label text.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::extraction::{parse_embedded, ExtractionResult};

/// Words that open a line of packaging metadata rather than the product name.
const METADATA_WORDS: &[&str] = &[
    "exp", "expiry", "expires", "use", "best", "batch", "lot", "b.no", "mfg", "mfd", "mrp",
    "price", "keep", "store",
];

/// Markers that introduce an expiry date.
const EXPIRY_MARKERS: &[&str] = &["exp", "use by"];

const EXPIRY_SUFFIXES: &[&str] = &["iry", "ires", "ired", "iration"];

/// What could be read off a label. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelReading {
    pub name: Option<String>,
    /// Always `YYYY-MM-DD` when present
    pub expiry_date: Option<String>,
}

impl LabelReading {
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.expiry_date.is_some()
    }

    fn normalized(self) -> Self {
        let name = self
            .name
            .map(|n| collapse_whitespace(&n))
            .filter(|n| !n.is_empty());
        let expiry_date = self.expiry_date.and_then(|raw| {
            let parsed = parse_label_date(raw.trim());
            if parsed.is_none() {
                tracing::warn!(raw = %raw, "Dropping unreadable expiry date from label reply");
            }
            parsed.map(|d| d.format("%Y-%m-%d").to_string())
        });
        Self { name, expiry_date }
    }
}

/// Parse a label-reading reply. Unreadable dates are dropped, not errors.
pub fn parse_label_reading(reply: &str) -> ExtractionResult<LabelReading> {
    let reading: LabelReading = parse_embedded(reply)?;
    Ok(reading.normalized())
}

/// Deterministic reader for OCR text, used when no model is available.
pub struct HeuristicLabelReader;

impl HeuristicLabelReader {
    /// Read name and expiry from raw OCR text.
    pub fn read(ocr_text: &str) -> LabelReading {
        let lines: Vec<&str> = ocr_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let name = lines
            .iter()
            .find(|line| is_name_line(line))
            .map(|line| collapse_whitespace(line));

        let expiry_date = lines
            .iter()
            .find_map(|line| expiry_on_line(line))
            .map(|d| d.format("%Y-%m-%d").to_string());

        tracing::debug!(
            found_name = name.is_some(),
            found_expiry = expiry_date.is_some(),
            "Read label heuristically"
        );
        LabelReading { name, expiry_date }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_name_line(line: &str) -> bool {
    let letters = line.chars().filter(|c| c.is_alphabetic()).count();
    if letters < 3 {
        return false;
    }
    let first_word = line
        .split_whitespace()
        .next()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .unwrap_or_default();
    !METADATA_WORDS.contains(&first_word.as_str())
}

/// Expiry date following any marker on this line.
///
/// A marker only counts at the start of a word, so "Expectorant" is not one.
fn expiry_on_line(line: &str) -> Option<NaiveDate> {
    // ASCII lowercasing keeps byte offsets aligned with `line`
    let lower = line.to_ascii_lowercase();
    EXPIRY_MARKERS.iter().find_map(|marker| {
        lower.match_indices(marker).find_map(|(pos, _)| {
            if !starts_word(&lower, pos) {
                return None;
            }
            let rest = line.get(pos + marker.len()..)?;
            let continues_word = rest
                .chars()
                .next()
                .is_some_and(|c| c.is_alphabetic() && !is_marker_suffix(rest));
            if continues_word {
                return None;
            }
            rest.split_whitespace().find_map(|token| {
                let token = token.trim_matches(|c: char| !c.is_ascii_alphanumeric());
                parse_label_date(token).or_else(|| {
                    // "EXP03/2026" or "EXP:03/2026" with no space
                    let digits = token.trim_start_matches(|c: char| !c.is_ascii_digit());
                    parse_label_date(digits)
                })
            })
        })
    })
}

fn starts_word(text: &str, pos: usize) -> bool {
    text.get(..pos)
        .and_then(|before| before.chars().next_back())
        .map_or(true, |c| !c.is_alphanumeric())
}

/// Letters that extend "exp" into the word "expiry" or a relative of it.
fn is_marker_suffix(rest: &str) -> bool {
    let lower = rest.to_ascii_lowercase();
    EXPIRY_SUFFIXES.iter().any(|suffix| {
        lower.strip_prefix(suffix).is_some_and(|after| {
            !after.chars().next().is_some_and(char::is_alphabetic)
        })
    })
}

/// Parse the date forms printed on packaging.
///
/// Month-only dates mean the end of that month.
pub fn parse_label_date(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        return Some(date);
    }
    month_year(raw, '/').or_else(|| month_year(raw, '-'))
}

fn month_year(raw: &str, separator: char) -> Option<NaiveDate> {
    let (month, year) = raw.split_once(separator)?;
    if month.is_empty() || month.len() > 2 || year.len() != 4 {
        return None;
    }
    if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    last_day_of_month(year, month)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first
        .checked_add_months(Months::new(1))?
        .checked_sub_days(Days::new(1))
}
