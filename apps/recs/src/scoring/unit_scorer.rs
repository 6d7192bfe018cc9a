//! Unit relevance from knowledge gaps.
//!
//! raw = Σ weight × gap, where gap is 1.0 for an unlearned node and 0.6 for a
//! node the user has started. Hardest units take a 5% penalty. Raw scores are
//! only comparable within one batch; the recommender max-normalizes them.

use crate::models::catalog::ActivityUnit;
use crate::models::user::UserProfile;
use crate::scoring::difficulty::HARDEST;

const UNLEARNED_GAP: f64 = 1.0;
const STARTED_GAP: f64 = 0.6;
const HARDEST_PENALTY: f64 = 0.95;

/// Floor for the per-batch normalization divisor.
pub const MIN_NORMALIZER: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct UnitScore<'a> {
    pub unit: &'a ActivityUnit,
    pub raw: f64,
    /// Node ids that produced the score, in unit order.
    pub signals: Vec<String>,
}

pub fn score_unit<'a>(unit: &'a ActivityUnit, user: &UserProfile) -> UnitScore<'a> {
    let mut raw: f64 = unit
        .knowledge_nodes
        .iter()
        .map(|kn| {
            let gap = if user.knowledge_level(&kn.id) == 0 {
                UNLEARNED_GAP
            } else {
                STARTED_GAP
            };
            // negative or NaN weights contribute nothing
            kn.weight.max(0.0) * gap
        })
        .sum();

    if unit.difficulty == HARDEST {
        raw *= HARDEST_PENALTY;
    }

    UnitScore {
        unit,
        raw,
        signals: unit.knowledge_nodes.iter().map(|kn| kn.id.clone()).collect(),
    }
}

/// Divisor for max-normalization over one batch of scores.
pub fn batch_normalizer(scores: &[UnitScore<'_>]) -> f64 {
    scores
        .iter()
        .map(|s| s.raw)
        .fold(MIN_NORMALIZER, f64::max)
}
