use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(JobId);
id_newtype!(HistoryId);

/// Résumé-to-job fit on a 0..=100 scale.
///
/// The backend sends either an integer or a float; both are rounded and
/// clamped into range on the way in, so a `MatchScore` is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MatchScore(u8);

impl MatchScore {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self(0);
        }
        Self(value.round().clamp(0.0, f64::from(Self::MAX)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn tier(self) -> MatchTier {
        MatchTier::from_score(self)
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl<'de> Deserialize<'de> for MatchScore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Ok(Self::from_f64(raw))
    }
}

/// Three-band classification shared by the score card, history badges, and
/// the generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchTier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl MatchTier {
    pub const EXCELLENT_FLOOR: u8 = 80;
    pub const GOOD_FLOOR: u8 = 60;

    pub fn from_score(score: MatchScore) -> Self {
        match score.value() {
            v if v >= Self::EXCELLENT_FLOOR => Self::Excellent,
            v if v >= Self::GOOD_FLOOR => Self::Good,
            _ => Self::NeedsImprovement,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }

    /// Verdict line used on the score card and in reports.
    pub fn verdict(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent Match!",
            Self::Good => "Good Match",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub job_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub rank: MatchScore,
    #[serde(default)]
    pub total_experience: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub project_categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl AnalysisResult {
    pub fn tier(&self) -> MatchTier {
        self.rank.tier()
    }

    /// Suggestions worth rendering; `None` when absent or empty.
    pub fn visible_suggestions(&self) -> Option<&[String]> {
        self.suggestions
            .as_deref()
            .filter(|suggestions| !suggestions.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryId,
    pub analyzed_at: DateTime<Utc>,
    pub job_title: String,
    pub rank: MatchScore,
    #[serde(default)]
    pub total_experience: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub project_categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl HistoryEntry {
    pub fn tier(&self) -> MatchTier {
        self.rank.tier()
    }
}

/// Formats a year count without a trailing `.0`: `3.0` -> "3", `2.5` -> "2.5".
pub fn format_years(years: f64) -> String {
    if years.fract() == 0.0 {
        format!("{years:.0}")
    } else {
        let text = format!("{years:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_score_bands() {
        assert_eq!(MatchScore::new(100).tier(), MatchTier::Excellent);
        assert_eq!(MatchScore::new(80).tier(), MatchTier::Excellent);
        assert_eq!(MatchScore::new(79).tier(), MatchTier::Good);
        assert_eq!(MatchScore::new(60).tier(), MatchTier::Good);
        assert_eq!(MatchScore::new(59).tier(), MatchTier::NeedsImprovement);
        assert_eq!(MatchScore::new(0).tier(), MatchTier::NeedsImprovement);
    }

    #[test]
    fn tier_is_total_over_the_score_range() {
        for value in 0..=MatchScore::MAX {
            let expected = if value >= 80 {
                "Excellent"
            } else if value >= 60 {
                "Good"
            } else {
                "Needs Improvement"
            };
            assert_eq!(MatchScore::new(value).tier().name(), expected, "rank {value}");
        }
    }

    #[test]
    fn score_deserializes_from_float_and_clamps() {
        let score: MatchScore = serde_json::from_str("79.6").expect("float score");
        assert_eq!(score.value(), 80);
        let score: MatchScore = serde_json::from_str("140").expect("large score");
        assert_eq!(score.value(), 100);
        let score: MatchScore = serde_json::from_str("-3").expect("negative score");
        assert_eq!(score.value(), 0);
    }

    #[test]
    fn analysis_result_tolerates_missing_lists() {
        let result: AnalysisResult =
            serde_json::from_str(r#"{"rank": 42}"#).expect("minimal result");
        assert_eq!(result.rank.value(), 42);
        assert!(result.skills.is_empty());
        assert!(result.project_categories.is_empty());
        assert!(result.visible_suggestions().is_none());
    }

    #[test]
    fn empty_suggestions_are_not_visible() {
        let result: AnalysisResult =
            serde_json::from_str(r#"{"rank": 90, "suggestions": []}"#).expect("result");
        assert!(result.visible_suggestions().is_none());
    }

    #[test]
    fn history_entry_parses_backend_timestamp() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{
                "id": 4,
                "analyzed_at": "2026-03-01T10:15:00.123456Z",
                "job_title": "Data Engineer",
                "rank": 61,
                "total_experience": 2.5,
                "skills": ["SQL"],
                "project_categories": ["ETL", "BI"],
                "suggestions": []
            }"#,
        )
        .expect("history entry");
        assert_eq!(entry.id, HistoryId(4));
        assert_eq!(entry.tier(), MatchTier::Good);
        assert_eq!(entry.project_categories.len(), 2);
    }

    #[test]
    fn years_render_without_trailing_zeroes() {
        assert_eq!(format_years(3.0), "3");
        assert_eq!(format_years(2.5), "2.5");
        assert_eq!(format_years(0.0), "0");
        assert_eq!(format_years(1.25), "1.25");
    }
}
