use std::io::Read;
use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer};

use super::normalizer::{normalize_keyword, normalize_text};

static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("valid amount regex"));

static DAYS_TO_GO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+days?\s+(?:to\s+go|left|remaining)$").expect("valid countdown regex")
});

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y"];

const ROLLING_MARKERS: &[&str] = &["always", "rolling", "open", "ongoing", "no deadline"];

const CLOSED_MARKERS: &[&str] = &["closed", "expired", "deadline over"];

/// Closing date as written on a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeadlineText {
    Dated(NaiveDate),
    Rolling,
    Closed,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogRow {
    #[serde(default, alias = "Id", alias = "ID", deserialize_with = "empty_string_as_none")]
    pub(crate) id: Option<String>,
    #[serde(alias = "Name")]
    pub(crate) name: String,
    #[serde(default, alias = "Award", deserialize_with = "empty_string_as_none")]
    pub(crate) award: Option<String>,
    #[serde(default, alias = "Deadline", deserialize_with = "empty_string_as_none")]
    pub(crate) deadline: Option<String>,
    #[serde(default, alias = "Eligibility", deserialize_with = "empty_string_as_none")]
    pub(crate) eligibility: Option<String>,
    #[serde(default, alias = "Link", deserialize_with = "empty_string_as_none")]
    pub(crate) link: Option<String>,
}

impl CatalogRow {
    pub(crate) fn name(&self) -> String {
        normalize_text(&self.name)
    }

    pub(crate) fn eligibility(&self) -> String {
        self.eligibility
            .as_deref()
            .map(normalize_text)
            .unwrap_or_default()
    }
}

pub(crate) fn csv_rows<R: Read>(reader: R) -> csv::DeserializeRecordsIntoIter<R, CatalogRow> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
        .into_deserialize()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Largest number in an award string: `"₹50,000 per annum"` is `50000`.
/// Text without digits is worth `0`.
pub(crate) fn parse_award(value: Option<&str>) -> f64 {
    let Some(value) = value else {
        return 0.0;
    };
    AMOUNT
        .find_iter(value)
        .filter_map(|found| found.as_str().replace(',', "").parse::<f64>().ok())
        .filter(|amount| amount.is_finite())
        .fold(0.0, f64::max)
}

/// Interprets the deadline column. `None` means the text was not understood.
pub(crate) fn parse_deadline(value: Option<&str>, today: NaiveDate) -> Option<DeadlineText> {
    let Some(value) = value else {
        return Some(DeadlineText::Rolling);
    };
    let keyword = normalize_keyword(value);

    if keyword.is_empty() || ROLLING_MARKERS.contains(&keyword.as_str()) {
        return Some(DeadlineText::Rolling);
    }
    if CLOSED_MARKERS.contains(&keyword.as_str()) {
        return Some(DeadlineText::Closed);
    }
    if keyword == "last day to go" || keyword == "today" {
        return Some(DeadlineText::Dated(today));
    }
    if let Some(captures) = DAYS_TO_GO.captures(&keyword) {
        let days = captures[1].parse::<i64>().ok()?;
        return today
            .checked_add_signed(Duration::days(days))
            .map(DeadlineText::Dated);
    }

    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .map(DeadlineText::Dated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    #[test]
    fn award_takes_largest_number() {
        assert_eq!(parse_award(Some("₹50,000 per annum")), 50_000.0);
        assert_eq!(parse_award(Some("Up to ₹12,000 or ₹1,20,000 total")), 120_000.0);
        assert_eq!(parse_award(Some("Tuition waiver")), 0.0);
        assert_eq!(parse_award(None), 0.0);
    }

    #[test]
    fn deadline_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 12, 31).expect("valid date");
        for text in ["2026-12-31", "31-12-2026", "31/12/2026"] {
            assert_eq!(
                parse_deadline(Some(text), today()),
                Some(DeadlineText::Dated(expected)),
                "{text}"
            );
        }
    }

    #[test]
    fn deadline_markers() {
        assert_eq!(parse_deadline(None, today()), Some(DeadlineText::Rolling));
        assert_eq!(
            parse_deadline(Some("Always"), today()),
            Some(DeadlineText::Rolling)
        );
        assert_eq!(
            parse_deadline(Some("closed"), today()),
            Some(DeadlineText::Closed)
        );
        assert_eq!(
            parse_deadline(Some("Last day to go"), today()),
            Some(DeadlineText::Dated(today()))
        );
        assert_eq!(
            parse_deadline(Some("12 days to go"), today()),
            Some(DeadlineText::Dated(
                NaiveDate::from_ymd_opt(2026, 10, 31).expect("valid date")
            ))
        );
        assert_eq!(parse_deadline(Some("sometime soon"), today()), None);
        assert_eq!(parse_deadline(Some("31-02-2026"), today()), None);
    }
}
