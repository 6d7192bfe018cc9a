use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::user::Grade;

/// Confidence band attached to every recommendation. Ordered low < medium < high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Bands a 0..1 score: ≥0.75 high, ≥0.4 medium, otherwise low.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.75 {
            Confidence::High
        } else if score >= 0.4 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

/// A recommended unit or video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "whyThis")]
    pub why_this: String,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRecItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "whyThis")]
    pub why_this: String,
    pub confidence: Confidence,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub grade: Grade,
    #[serde(rename = "isColdStart")]
    pub is_cold_start: bool,
    pub knowledge: BTreeMap<String, i64>,
    pub inquiry_skills: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub units: Vec<RecItem>,
    pub videos: Vec<RecItem>,
    pub careers: Vec<CareerRecItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleMeta {
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<FixedOffset>,
}

/// Full output for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationBundle {
    pub user: UserSummary,
    pub recommendations: Recommendations,
    pub meta: BundleMeta,
}
