use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::{ParseWarning, QualificationSet, ScoreScale, ScoreThreshold};
use crate::recommendations::domain::{Gender, QualificationTier};

static PERCENT_AFTER_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:minimum|min\.?|at\s+least|not\s+less\s+than|above|over|more\s+than)\s*(?:of\s+)?(\d{1,3}(?:\.\d+)?)\s*(?:%|percent(?:age)?\b)",
    )
    .expect("valid percent cue regex")
});

static PERCENT_BEFORE_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,3}(?:\.\d+)?)\s*(?:%|percent(?:age)?)\s*(?:marks\s+|aggregate\s+)?(?:and|or)\s+(?:above|more|higher)\b",
    )
    .expect("valid trailing percent regex")
});

static GPA_AFTER_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bc?gpa\b\s*(?:of\s+)?(?:(?:≥|>=|>|=|:|minimum|min\.?|at\s+least|above|over|of)\s*)*(\d{1,2}(?:\.\d{1,2})?)",
    )
    .expect("valid gpa regex")
});

static GPA_BEFORE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}(?:\.\d{1,2})?)\s*(?:/\s*10\s*)?c?gpa\b")
        .expect("valid trailing gpa regex")
});

static SCORE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bc?gpa\b|\bpercent(?:age)?\b|\bmarks\b|%").expect("valid keyword regex")
});

static QUALIFICATION_PATTERNS: LazyLock<Vec<(Regex, QualificationTier)>> = LazyLock::new(|| {
    [
        (
            r"(?i)\b(?:class\s*(?:10|x|12|xii)(?:th)?|10th|12th|higher\s+secondary|secondary|high\s+school|school\s+students?|matric(?:ulation)?|ssc|hsc)\b",
            QualificationTier::Secondary,
        ),
        (
            r"(?i)\b(?:under-?\s?graduates?|ug|bachelor(?:'?s)?|graduation|b\.?\s?tech|b\.\s?e\b|b\.?\s?sc|b\.?\s?com|b\.\s?a\b|bca|mbbs)\b",
            QualificationTier::Undergraduate,
        ),
        (
            r"(?i)\b(?:post-?\s?graduates?|post-?\s?graduation|pg|masters?|master's|m\.?\s?tech|m\.?\s?sc|mba|m\.\s?a\b|m\.?\s?com|mca)\b",
            QualificationTier::Postgraduate,
        ),
        (
            r"(?i)\b(?:ph\.?\s?d|doctoral|doctorate)\b",
            QualificationTier::Doctoral,
        ),
        (
            r"(?i)\b(?:diploma|iti|polytechnic|vocational)\b",
            QualificationTier::Other,
        ),
    ]
    .into_iter()
    .map(|(pattern, tier)| (Regex::new(pattern).expect("valid qualification regex"), tier))
    .collect()
});

static POST_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpost[\s-]+(grad)").expect("valid prefix regex"));

static FEMALE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:female|females|women|girls?)\b").expect("valid female regex")
});

static MALE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:male|males|men|boys?)\b").expect("valid male regex")
});

static QUOTED_PLACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["“]([^"“”]{2,40})["”]"#).expect("valid quoted regex")
});

// Residency wording restricts who may apply, so the place that follows binds.
static RESIDENCY_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?i:residents?\s+of|resident\s+in|domiciled?\s+(?:of|in)|domicile\s+of|natives?\s+of)\s+(?:(?i:the\s+(?:state|city|district|region)\s+of)\s+)?(\p{Lu}\p{L}+(?:\s+\p{Lu}\p{L}+)*)",
    )
    .expect("valid residency regex")
});

// "from"/"in" also introduce castes, income groups and disciplines. Group 1 is
// set when an administrative prefix names the place outright.
static LOOSE_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?i:from|in|belonging\s+to)\s+((?i:the\s+(?:state|city|district|region|union\s+territory)\s+of)\s+)?(\p{Lu}\p{L}+(?:\s+\p{Lu}\p{L}+)*)",
    )
    .expect("valid loose place regex")
});

static PLACE_CONTINUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:,|/|&|(?i:and|or))\s*(\p{Lu}\p{L}+(?:\s+\p{Lu}\p{L}+)*)")
        .expect("valid continuation regex")
});

/// Capitalized words that follow a cue but never name a place.
const NON_PLACE_WORDS: &[&str] = &[
    "any", "all", "government", "private", "public", "aided", "first", "second", "third",
    "final", "year", "class", "standard", "engineering", "science", "sciences", "commerce",
    "arts", "medicine", "medical", "management", "law", "technology", "humanities",
    "mathematics", "physics", "chemistry", "biology", "computer", "stem", "english", "hindi",
    "university", "college", "institute", "school", "board", "january", "february", "march",
    "april", "may", "june", "july", "august", "september", "october", "november", "december",
    "minority", "economically", "general", "other", "india's", "india", "indian", "national",
    "nationals", "scheduled", "backward", "tribal", "tribes", "castes", "caste", "rural",
    "urban", "low", "lower", "income", "families", "family", "weaker", "poor", "below",
    "differently", "disabled", "persons", "women", "girls",
];

/// Trailing words that mark a loosely cued name as an administrative area.
const PLACE_MARKERS: &[&str] = &["state", "district", "city"];

/// Administrative suffixes trimmed from the end of a place name.
const TRAILING_QUALIFIERS: &[&str] = &["state", "government", "district", "city", "region", "only"];

pub(super) fn score_threshold(
    text: &str,
    warnings: &mut Vec<ParseWarning>,
) -> Option<ScoreThreshold> {
    let mut candidates = Vec::new();

    for pattern in [&*PERCENT_AFTER_CUE, &*PERCENT_BEFORE_CUE] {
        candidates.extend(capture_numbers(pattern, text).map(|value| ScoreThreshold {
            value,
            scale: ScoreScale::Percentage,
        }));
    }
    for pattern in [&*GPA_AFTER_KEYWORD, &*GPA_BEFORE_KEYWORD] {
        candidates.extend(capture_numbers(pattern, text).map(|value| ScoreThreshold {
            value,
            scale: ScoreScale::TenPoint,
        }));
    }

    if candidates.is_empty() {
        if let Some(found) = SCORE_KEYWORD.find(text) {
            warnings.push(ParseWarning::UnstructuredScoreClause(clause_around(
                text,
                found.start(),
            )));
        }
        return None;
    }

    let mut strictest: Option<ScoreThreshold> = None;
    for candidate in candidates {
        if candidate.value <= 0.0 || candidate.value > candidate.scale.maximum() {
            let warning = ParseWarning::ThresholdOutOfRange {
                value: candidate.value,
                scale: candidate.scale,
            };
            if !warnings.contains(&warning) {
                warnings.push(warning);
            }
            continue;
        }

        let replace = strictest
            .map(|current| candidate.normalized() > current.normalized())
            .unwrap_or(true);
        if replace {
            strictest = Some(candidate);
        }
    }

    strictest
}

pub(super) fn qualifications(text: &str) -> QualificationSet {
    // "post graduation" must not also count as "graduation".
    let text = POST_PREFIX.replace_all(text, "post$1");
    let tiers: BTreeSet<QualificationTier> = QUALIFICATION_PATTERNS
        .iter()
        .filter(|(pattern, _)| pattern.is_match(&text))
        .map(|(_, tier)| *tier)
        .collect();

    if tiers.is_empty() {
        QualificationSet::Any
    } else {
        QualificationSet::Only(tiers)
    }
}

pub(super) fn gender(text: &str) -> Option<Gender> {
    match (FEMALE.is_match(text), MALE.is_match(text)) {
        (true, false) => Some(Gender::Female),
        (false, true) => Some(Gender::Male),
        _ => None,
    }
}

pub(super) fn region(text: &str, warnings: &mut Vec<ParseWarning>) -> Option<String> {
    let mut confirmed: Vec<String> = Vec::new();
    let mut unconfirmed: Vec<String> = Vec::new();

    for captures in QUOTED_PLACE.captures_iter(text) {
        let place = captures[1].trim();
        if !place.is_empty() {
            push_place(&mut confirmed, place.to_string());
        }
    }

    for captures in RESIDENCY_CUE.captures_iter(text) {
        if let Some(name) = captures.get(1) {
            for place in listed_places(text, name) {
                push_place(&mut confirmed, place);
            }
        }
    }

    for captures in LOOSE_CUE.captures_iter(text) {
        let Some(name) = captures.get(2) else {
            continue;
        };
        let marked = captures.get(1).is_some() || ends_with_place_marker(name.as_str());
        let target = if marked { &mut confirmed } else { &mut unconfirmed };
        for place in listed_places(text, name) {
            push_place(target, place);
        }
    }

    match (confirmed.len(), unconfirmed.len()) {
        (1, _) => confirmed.pop(),
        (0, 0) => None,
        (0, 1) => {
            warnings.extend(unconfirmed.pop().map(ParseWarning::UnconfirmedRegion));
            None
        }
        (0, _) => {
            warnings.push(ParseWarning::AmbiguousRegion(unconfirmed));
            None
        }
        _ => {
            warnings.push(ParseWarning::AmbiguousRegion(confirmed));
            None
        }
    }
}

fn push_place(places: &mut Vec<String>, place: String) {
    if !places
        .iter()
        .any(|existing| existing.eq_ignore_ascii_case(&place))
    {
        places.push(place);
    }
}

/// The cued name plus any siblings joined to it ("Kerala and Karnataka").
fn listed_places(text: &str, first: regex::Match<'_>) -> Vec<String> {
    let mut places: Vec<String> = clean_place(first.as_str()).into_iter().collect();
    let mut rest = &text[first.end()..];
    while let Some(next) = PLACE_CONTINUATION.captures(rest) {
        let (Some(whole), Some(name)) = (next.get(0), next.get(1)) else {
            break;
        };
        places.extend(clean_place(name.as_str()));
        rest = &rest[whole.end()..];
    }
    places
}

fn ends_with_place_marker(raw: &str) -> bool {
    let words: Vec<&str> = raw.split_whitespace().collect();
    words.len() > 1
        && words
            .last()
            .map(|word| PLACE_MARKERS.contains(&word.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
}

fn capture_numbers<'a>(pattern: &'a Regex, text: &'a str) -> impl Iterator<Item = f64> + 'a {
    pattern
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .filter_map(|value| value.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

fn clean_place(raw: &str) -> Option<String> {
    let mut words: Vec<&str> = raw.split_whitespace().collect();
    while words.len() > 1
        && words
            .last()
            .map(|word| TRAILING_QUALIFIERS.contains(&word.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    {
        words.pop();
    }

    let first = words.first()?;
    if NON_PLACE_WORDS.contains(&first.to_ascii_lowercase().as_str()) {
        return None;
    }
    // Abbreviations such as "SC" or "OBC" are categories far more often than places.
    if first.chars().all(|c| c.is_uppercase()) {
        return None;
    }

    let place = words.join(" ");
    if QUALIFICATION_PATTERNS
        .iter()
        .any(|(pattern, _)| pattern.is_match(&place))
    {
        return None;
    }

    Some(place)
}

fn clause_around(text: &str, offset: usize) -> String {
    let start = text[..offset]
        .rfind(['.', ';', '\n'])
        .map(|index| index + 1)
        .unwrap_or(0);
    let end = text[offset..]
        .find(['.', ';', '\n'])
        .map(|index| offset + index)
        .unwrap_or(text.len());
    text[start..end].trim().to_string()
}
