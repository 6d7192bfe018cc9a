//! Video Matcher: greedy first-fit over the video catalog.
//!
//! Pass 1 takes videos linked to a recommended career (high confidence).
//! Pass 2 takes videos whose discipline matches a subject the user has
//! touched (medium confidence). Both passes walk catalog order and stop at
//! `limit`; a video id is emitted at most once.

use std::collections::HashSet;

use crate::models::catalog::Video;
use crate::models::recommendation::{CareerRecItem, Confidence, RecItem};
use crate::models::user::UserProfile;
use crate::scoring::explain::{why_for_career_video, why_for_discipline_video};
use crate::scoring::subject::subject_label;

pub const DEFAULT_VIDEO_LIMIT: usize = 2;

pub fn select_videos(
    user: &UserProfile,
    videos: &[Video],
    picked_careers: &[CareerRecItem],
    limit: usize,
) -> Vec<RecItem> {
    let user_disciplines: HashSet<&str> = user.knowledge.keys().map(|n| subject_label(n)).collect();
    let career_ids: HashSet<&str> = picked_careers
        .iter()
        .map(|c| c.id.as_str())
        .filter(|id| !id.is_empty())
        .collect();

    let mut picked: Vec<RecItem> = Vec::new();
    let mut used: HashSet<&str> = HashSet::new();

    for v in videos {
        if picked.len() >= limit {
            break;
        }
        let linked = v
            .career_id
            .as_deref()
            .is_some_and(|cid| career_ids.contains(cid));
        if linked && used.insert(v.id.as_str()) {
            picked.push(RecItem {
                id: v.id.clone(),
                title: v.title.clone(),
                why_this: why_for_career_video(),
                confidence: Confidence::High,
            });
        }
    }

    for v in videos {
        if picked.len() >= limit {
            break;
        }
        let Some(discipline) = v.discipline.as_deref().filter(|d| !d.is_empty()) else {
            continue;
        };
        if user_disciplines.contains(discipline) && used.insert(v.id.as_str()) {
            picked.push(RecItem {
                id: v.id.clone(),
                title: v.title.clone(),
                why_this: why_for_discipline_video(discipline),
                confidence: Confidence::Medium,
            });
        }
    }

    tracing::debug!(user_id = %user.id, picked = picked.len(), limit, "Selected videos");
    picked
}
