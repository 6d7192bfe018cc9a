use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// School year as recorded on the profile. Numeric years are parsed; anything
/// else (e.g. "Foundation") is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Grade {
    Year(i64),
    Raw(Value),
}

impl Default for Grade {
    fn default() -> Self {
        Grade::Year(0)
    }
}

/// A student's recorded progress. Immutable for the duration of a scoring call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub grade: Grade,
    /// skill code (QP, PC, PAD, EVAL, COMM, ...) → level
    #[serde(default)]
    pub inquiry_skills: BTreeMap<String, i64>,
    /// knowledge node id → level, 0 = unlearned
    #[serde(default)]
    pub knowledge: BTreeMap<String, i64>,
    /// Informational only; not used in scoring.
    #[serde(default)]
    pub career_interests: Vec<String>,
}

impl UserProfile {
    /// Current level on a knowledge node, 0 when never recorded.
    pub fn knowledge_level(&self, node: &str) -> i64 {
        self.knowledge.get(node).copied().unwrap_or(0)
    }

    pub fn skill_level(&self, skill: &str) -> i64 {
        self.inquiry_skills.get(skill).copied().unwrap_or(0)
    }

    /// No recorded knowledge and no recorded inquiry skill, counted by level sum.
    pub fn is_cold_start(&self) -> bool {
        self.knowledge.values().sum::<i64>() == 0 && self.inquiry_skills.values().sum::<i64>() == 0
    }
}
