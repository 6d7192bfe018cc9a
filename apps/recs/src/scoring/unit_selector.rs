//! Unit Selector: narrows the activity catalog before scoring.
//!
//! 1. Drop units harder than the configured ceiling.
//! 2. Optionally keep only the "next rung" per knowledge node: the unit whose
//!    difficulty is exactly one above the user's level, else the easiest unit
//!    that is still above it.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::models::catalog::ActivityUnit;
use crate::models::user::UserProfile;

/// Drops units whose difficulty exceeds `max_difficulty`. A ceiling of 0
/// disables the filter.
pub fn filter_units(units: &[ActivityUnit], max_difficulty: u8) -> Vec<&ActivityUnit> {
    let kept: Vec<&ActivityUnit> = units
        .iter()
        .filter(|u| max_difficulty == 0 || u.difficulty <= max_difficulty)
        .collect();

    if kept.len() != units.len() {
        tracing::debug!(
            max_difficulty,
            dropped = units.len() - kept.len(),
            "Filtered units above difficulty ceiling"
        );
    }
    kept
}

/// Preference key for a candidate on a node where the user sits at `current`.
/// Exact `current + 1` beats everything; otherwise lower difficulty wins.
fn ladder_rank(difficulty: u8, current: i64) -> (bool, Reverse<u8>) {
    (i64::from(difficulty) == current + 1, Reverse(difficulty))
}

/// Keeps at most one unit per knowledge node, judged on each unit's first node.
///
/// Units at or below the user's current level on their node carry no
/// progression value and are skipped. Output follows the order in which each
/// node was first claimed.
pub fn pick_next_level_units<'a>(
    units: &[&'a ActivityUnit],
    user: &UserProfile,
) -> Vec<&'a ActivityUnit> {
    let mut best: Vec<&'a ActivityUnit> = Vec::new();
    let mut slot_by_node: HashMap<&'a str, usize> = HashMap::new();

    for &unit in units {
        let Some(node) = unit.primary_node() else {
            continue;
        };
        let current = user.knowledge_level(node);
        if i64::from(unit.difficulty) <= current {
            continue;
        }

        match slot_by_node.get(node) {
            Some(&slot) => {
                let held = best[slot];
                if ladder_rank(unit.difficulty, current) > ladder_rank(held.difficulty, current) {
                    best[slot] = unit;
                }
            }
            None => {
                slot_by_node.insert(node, best.len());
                best.push(unit);
            }
        }
    }

    best
}
