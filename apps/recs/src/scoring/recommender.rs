//! Recommender: sequences selection, scoring, ranking and explanation for
//! one user and assembles the output bundle.
//!
//! Units:   filter → next-level pick (fallback: filtered set) → score →
//!          rank by raw → top-K → normalize → why + confidence
//! Careers: score each (unless hidden on cold start) → rank by confidence →
//!          top-K → why + evidence
//! Videos:  matched against the ranked careers and the user's subjects
//!
//! Every call is a pure function of (catalog, profile, timestamp).

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset, Local};

use crate::config::RecommenderConfig;
use crate::models::catalog::{ActivityUnit, Catalog};
use crate::models::recommendation::{
    BundleMeta, CareerRecItem, Confidence, RecItem, RecommendationBundle, Recommendations,
    UserSummary,
};
use crate::models::user::UserProfile;
use crate::scoring::career_scorer::score_career;
use crate::scoring::explain::{career_evidence, why_for_career, why_for_unit};
use crate::scoring::unit_scorer::{batch_normalizer, score_unit, UnitScore};
use crate::scoring::unit_selector::{filter_units, pick_next_level_units};
use crate::scoring::video_matcher::select_videos;

pub struct Recommender<'c> {
    catalog: &'c Catalog,
    config: RecommenderConfig,
}

impl<'c> Recommender<'c> {
    pub fn new(catalog: &'c Catalog, config: RecommenderConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Recommendations stamped with the current local time.
    pub fn recommend(&self, user: &UserProfile) -> RecommendationBundle {
        self.recommend_at(user, Local::now().fixed_offset())
    }

    /// Recommendations stamped with `generated_at`. Identical inputs give
    /// identical bundles.
    pub fn recommend_at(
        &self,
        user: &UserProfile,
        generated_at: DateTime<FixedOffset>,
    ) -> RecommendationBundle {
        let is_cold_start = user.is_cold_start();

        let units = self.recommend_units(user);
        let careers = if is_cold_start && self.config.hide_careers_on_cold_start {
            tracing::debug!(user_id = %user.id, "Cold start: careers hidden");
            Vec::new()
        } else {
            self.recommend_careers(user)
        };
        let videos = select_videos(user, &self.catalog.videos, &careers, self.config.video_limit);

        tracing::info!(
            user_id = %user.id,
            is_cold_start,
            units = units.len(),
            careers = careers.len(),
            videos = videos.len(),
            "Built recommendations"
        );

        RecommendationBundle {
            user: UserSummary {
                id: user.id.clone(),
                grade: user.grade.clone(),
                is_cold_start,
                knowledge: user.knowledge.clone(),
                inquiry_skills: user.inquiry_skills.clone(),
            },
            recommendations: Recommendations {
                units,
                videos,
                careers,
            },
            meta: BundleMeta { generated_at },
        }
    }

    /// Units to score: next-level picks when enabled, else (or when that
    /// yields nothing) the whole filtered catalog.
    fn unit_candidates(&self, user: &UserProfile) -> Vec<&'c ActivityUnit> {
        let filtered = filter_units(&self.catalog.units, self.config.max_difficulty);
        if !self.config.only_next_level_units {
            return filtered;
        }

        let next_level = pick_next_level_units(&filtered, user);
        if next_level.is_empty() {
            tracing::debug!(
                user_id = %user.id,
                candidates = filtered.len(),
                "No next-level units, falling back to filtered catalog"
            );
            filtered
        } else {
            next_level
        }
    }

    fn recommend_units(&self, user: &UserProfile) -> Vec<RecItem> {
        let mut scored: Vec<UnitScore<'c>> = self
            .unit_candidates(user)
            .into_iter()
            .map(|unit| score_unit(unit, user))
            .collect();
        let max_raw = batch_normalizer(&scored);

        // Stable descending sort; ties keep candidate order
        scored.sort_by(|a, b| b.raw.partial_cmp(&a.raw).unwrap_or(Ordering::Equal));

        scored
            .iter()
            .take(self.config.top_k)
            .map(|s| RecItem {
                id: s.unit.id.clone(),
                title: s.unit.title.clone(),
                why_this: why_for_unit(user, &s.signals),
                confidence: Confidence::from_score(s.raw / max_raw),
            })
            .collect()
    }

    fn recommend_careers(&self, user: &UserProfile) -> Vec<CareerRecItem> {
        let mut ranked: Vec<CareerRecItem> = self
            .catalog
            .careers
            .iter()
            .map(|career| {
                let scored = score_career(career, user);
                CareerRecItem {
                    id: career.id.clone(),
                    title: career.title.clone(),
                    why_this: why_for_career(&scored),
                    confidence: Confidence::from_score(scored.score),
                    evidence: career_evidence(career, &scored),
                }
            })
            .collect();

        // high > medium > low; stable within a band
        ranked.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        ranked.truncate(self.config.top_k);
        ranked
    }
}
