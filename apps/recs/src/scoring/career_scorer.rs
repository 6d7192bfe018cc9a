//! Career Scorer: eligibility and fit for one career against one profile.
//!
//! Algorithm:
//! 1. Skill gate: every `min_skill_levels` entry must be met. Failures are
//!    collected, not fatal.
//! 2. Coverage: weighted share of `required_knowledge` the user meets.
//! 3. Threshold: covered weight must reach 40% of the nominal threshold.
//! 4. Blend:
//!    - gate + threshold pass → base
//!    - threshold only        → max(0.4, base × 0.6)
//!    - threshold fails       → base × 0.6
//!    - a score of exactly 0 is shown as 0.45
//!
//! Failing the gate never hides a career; it only moves it to the relaxed path.

use serde::{Deserialize, Serialize};

use crate::models::catalog::Career;
use crate::models::user::UserProfile;

/// Share of the nominal threshold a user must actually cover.
pub const THRESHOLD_RELAXATION: f64 = 0.4;
const RELAXED_MULTIPLIER: f64 = 0.6;
const GATE_FAIL_FLOOR: f64 = 0.4;
const ZERO_SCORE_FLOOR: f64 = 0.45;

/// A required knowledge node the user has not reached yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmetNode {
    pub node: String,
    pub need: i64,
    pub have: i64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerScore {
    /// 0.0 – 1.0
    pub score: f64,
    pub gate_pass: bool,
    pub threshold_pass: bool,
    /// (skill code, required level)
    pub unmet_skills: Vec<(String, i64)>,
    /// Heaviest gap first.
    pub unmet_nodes: Vec<UnmetNode>,
    pub covered: f64,
    pub total_w: f64,
}

pub fn score_career(career: &Career, user: &UserProfile) -> CareerScore {
    let unmet_skills: Vec<(String, i64)> = career
        .min_skill_levels
        .iter()
        .filter(|(skill, &need)| user.skill_level(skill) < need)
        .map(|(skill, &need)| (skill.clone(), need))
        .collect();
    let gate_pass = unmet_skills.is_empty();

    let mut covered = 0.0_f64;
    let mut total_w = 0.0_f64;
    let mut unmet_nodes = Vec::new();

    for rk in &career.required_knowledge {
        let Some(node) = rk.node.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        let weight = rk.weight.max(0.0);
        total_w += weight;

        let have = user.knowledge_level(node);
        if have >= rk.min_level {
            covered += weight;
        } else {
            unmet_nodes.push(UnmetNode {
                node: node.to_string(),
                need: rk.min_level,
                have,
                weight,
            });
        }
    }

    let threshold_pass = if career.threshold > 0.0 {
        covered >= career.threshold * THRESHOLD_RELAXATION
    } else {
        true
    };

    let base = if total_w > 0.0 { covered / total_w } else { 0.0 };
    let mut score = match (gate_pass, threshold_pass) {
        (true, true) => base,
        (false, true) => GATE_FAIL_FLOOR.max(base * RELAXED_MULTIPLIER),
        (_, false) => base * RELAXED_MULTIPLIER,
    };
    if score == 0.0 {
        score = ZERO_SCORE_FLOOR;
    }

    // stable: equal weights keep catalog order
    unmet_nodes.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    CareerScore {
        score,
        gate_pass,
        threshold_pass,
        unmet_skills,
        unmet_nodes,
        covered,
        total_w,
    }
}
