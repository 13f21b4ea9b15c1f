use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier used by the portal to look up a profile (the account e-mail).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScholarshipId(pub String);

impl fmt::Display for ScholarshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical qualification level used to compare education against requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum QualificationTier {
    Secondary,
    Undergraduate,
    Postgraduate,
    Doctoral,
    Other,
}

impl QualificationTier {
    pub fn label(&self) -> &'static str {
        match self {
            QualificationTier::Secondary => "secondary",
            QualificationTier::Undergraduate => "undergraduate",
            QualificationTier::Postgraduate => "postgraduate",
            QualificationTier::Doctoral => "doctoral",
            QualificationTier::Other => "other",
        }
    }

    /// Maps the loose labels stored by the portal ("B.Tech", "PhD", "Class 12")
    /// onto a tier. Anything unrecognised lands in `Other`.
    pub fn from_label(value: &str) -> Self {
        let compact = compact_label(value);
        if compact.is_empty() {
            return QualificationTier::Other;
        }
        // "B.E. Mechanical", "MA Economics": the degree is the leading word.
        let leading = value
            .split(|c: char| c.is_whitespace() || matches!(c, '(' | ',' | '/' | '-'))
            .map(compact_label)
            .find(|word| !word.is_empty())
            .unwrap_or_default();

        PROFILE_TIER_LABELS
            .iter()
            .find(|(prefixes, _)| {
                prefixes.iter().any(|prefix| {
                    // Two-letter abbreviations ("ma", "be") must stand alone.
                    if prefix.len() <= 2 {
                        compact == *prefix || leading == *prefix
                    } else {
                        compact.starts_with(prefix)
                    }
                })
            })
            .map(|(_, tier)| *tier)
            .unwrap_or(QualificationTier::Other)
    }
}

fn compact_label(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

// Checked top to bottom; the first tier with a matching prefix wins.
const PROFILE_TIER_LABELS: &[(&[&str], QualificationTier)] = &[
    (&["phd", "doctor"], QualificationTier::Doctoral),
    (
        &[
            "postgrad", "master", "mtech", "msc", "mba", "mcom", "mca", "ma", "me", "pg",
        ],
        QualificationTier::Postgraduate,
    ),
    (
        &[
            "undergrad", "bachelor", "btech", "bsc", "bcom", "bca", "ba", "be", "mbbs",
            "graduat", "ug",
        ],
        QualificationTier::Undergraduate,
    ),
    (
        &[
            "secondary", "highersecondary", "highschool", "school", "class", "10th", "12th",
            "ssc", "hsc", "matric",
        ],
        QualificationTier::Secondary,
    ),
];

impl From<String> for QualificationTier {
    fn from(value: String) -> Self {
        QualificationTier::from_label(&value)
    }
}

impl fmt::Display for QualificationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Native scale a profile score was recorded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum ScoreType {
    Percentage,
    #[serde(rename = "gpa-on-10")]
    GpaOn10,
}

impl TryFrom<String> for ScoreType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "percentage" | "percent" | "%" => Ok(ScoreType::Percentage),
            "gpa-on-10" | "gpa_on_10" | "gpa" | "cgpa" => Ok(ScoreType::GpaOn10),
            other => Err(format!("unsupported score type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Other => "other",
        }
    }
}

impl TryFrom<String> for Gender {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "female" => Ok(Gender::Female),
            "male" => Ok(Gender::Male),
            "other" => Ok(Gender::Other),
            other => Err(format!("unsupported gender '{other}'")),
        }
    }
}

/// Profile snapshot supplied by the user store. Never mutated by the engine.
///
/// Deserializes from the flat shape this type serializes to, and from the
/// portal's user document where education fields sit under `education`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ProfileDocument")]
pub struct Profile {
    pub qualification: QualificationTier,
    pub institution_name: Option<String>,
    pub score_type: ScoreType,
    /// Raw value as stored; interpreted on `score_type`'s native scale.
    pub score_value: String,
    pub gender: Gender,
    pub region: String,
    pub year_of_completion: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EducationDocument {
    #[serde(default)]
    qualification: Option<QualificationTier>,
    #[serde(default, alias = "institution")]
    institution_name: Option<String>,
    #[serde(default)]
    score_type: Option<ScoreType>,
    #[serde(default)]
    score_value: Option<String>,
    #[serde(default, alias = "yearOfPassing")]
    year_of_completion: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileDocument {
    #[serde(default)]
    education: Option<EducationDocument>,
    gender: Gender,
    #[serde(default, alias = "address")]
    region: String,
    #[serde(flatten)]
    top_level: EducationDocument,
}

impl TryFrom<ProfileDocument> for Profile {
    type Error = String;

    fn try_from(document: ProfileDocument) -> Result<Self, Self::Error> {
        let ProfileDocument {
            education,
            gender,
            region,
            top_level,
        } = document;
        let nested = education.unwrap_or_default();
        let missing = |field: &str| format!("missing field `{field}`");

        Ok(Profile {
            qualification: nested
                .qualification
                .or(top_level.qualification)
                .ok_or_else(|| missing("qualification"))?,
            institution_name: nested.institution_name.or(top_level.institution_name),
            score_type: nested
                .score_type
                .or(top_level.score_type)
                .ok_or_else(|| missing("scoreType"))?,
            score_value: nested
                .score_value
                .or(top_level.score_value)
                .ok_or_else(|| missing("scoreValue"))?,
            gender,
            region,
            year_of_completion: nested.year_of_completion.or(top_level.year_of_completion),
        })
    }
}

/// Catalog entry as provided by the scholarship store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipRecord {
    pub id: ScholarshipId,
    pub name: String,
    pub award_amount: f64,
    /// `None` marks a rolling listing with no closing date.
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub eligibility_text: String,
    #[serde(default)]
    pub apply_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_labels_follow_portal_spellings() {
        assert_eq!(QualificationTier::from_label("B.Tech"), QualificationTier::Undergraduate);
        assert_eq!(QualificationTier::from_label("Undergraduate"), QualificationTier::Undergraduate);
        assert_eq!(QualificationTier::from_label("M.Sc"), QualificationTier::Postgraduate);
        assert_eq!(QualificationTier::from_label("Post Graduate"), QualificationTier::Postgraduate);
        assert_eq!(QualificationTier::from_label("Ph.D"), QualificationTier::Doctoral);
        assert_eq!(QualificationTier::from_label("Class 12"), QualificationTier::Secondary);
        assert_eq!(QualificationTier::from_label("Matriculation"), QualificationTier::Secondary);
        assert_eq!(QualificationTier::from_label("MA"), QualificationTier::Postgraduate);
        assert_eq!(QualificationTier::from_label("B.E. Mechanical"), QualificationTier::Undergraduate);
        assert_eq!(QualificationTier::from_label("BA English"), QualificationTier::Undergraduate);
        assert_eq!(QualificationTier::from_label("B.A. (Hons)"), QualificationTier::Undergraduate);
        assert_eq!(QualificationTier::from_label("MA Economics"), QualificationTier::Postgraduate);
        assert_eq!(QualificationTier::from_label("M.E. Civil"), QualificationTier::Postgraduate);
        assert_eq!(QualificationTier::from_label("B.Tech CSE"), QualificationTier::Undergraduate);
        assert_eq!(QualificationTier::from_label("Medical"), QualificationTier::Other);
        assert_eq!(QualificationTier::from_label("Bakery course"), QualificationTier::Other);
        assert_eq!(QualificationTier::from_label("Diploma"), QualificationTier::Other);
        assert_eq!(QualificationTier::from_label(""), QualificationTier::Other);
    }

    #[test]
    fn profile_deserializes_flat_document() {
        let raw = r#"{
            "qualification": "Undergraduate",
            "institution": "IIT Madras",
            "scoreType": "CGPA",
            "scoreValue": "8.4",
            "gender": "Female",
            "address": "Chennai, Tamil Nadu",
            "yearOfPassing": 2026
        }"#;

        let profile: Profile = serde_json::from_str(raw).expect("profile parses");
        assert_eq!(profile.qualification, QualificationTier::Undergraduate);
        assert_eq!(profile.institution_name.as_deref(), Some("IIT Madras"));
        assert_eq!(profile.score_type, ScoreType::GpaOn10);
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.region, "Chennai, Tamil Nadu");
        assert_eq!(profile.year_of_completion, Some(2026));
    }

    #[test]
    fn profile_deserializes_nested_portal_user() {
        let raw = r#"{
            "fullname": "Asha K",
            "email": "asha@example.org",
            "gender": "Female",
            "address": "Coimbatore, Tamil Nadu",
            "education": {
                "qualification": "B.E. Mechanical",
                "institution": "PSG College of Technology",
                "yearOfPassing": 2027,
                "scoreType": "Percentage",
                "scoreValue": "81.5"
            },
            "createdAt": "2026-06-01T10:00:00Z"
        }"#;

        let profile: Profile = serde_json::from_str(raw).expect("portal user parses");
        assert_eq!(profile.qualification, QualificationTier::Undergraduate);
        assert_eq!(
            profile.institution_name.as_deref(),
            Some("PSG College of Technology")
        );
        assert_eq!(profile.score_type, ScoreType::Percentage);
        assert_eq!(profile.score_value, "81.5");
        assert_eq!(profile.region, "Coimbatore, Tamil Nadu");
        assert_eq!(profile.year_of_completion, Some(2027));
    }

    #[test]
    fn profile_without_education_is_rejected() {
        let raw = r#"{ "gender": "Male", "address": "Pune, Maharashtra" }"#;
        let error = serde_json::from_str::<Profile>(raw).expect_err("no education fields");
        assert!(error.to_string().contains("qualification"));
    }

    #[test]
    fn unknown_score_type_is_rejected() {
        let raw = r#"{
            "qualification": "undergraduate",
            "scoreType": "letter grade",
            "scoreValue": "A",
            "gender": "male"
        }"#;

        assert!(serde_json::from_str::<Profile>(raw).is_err());
    }
}
