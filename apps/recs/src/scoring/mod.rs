// Scoring engine: selection, scoring, explanation and the recommender that
// sequences them. No I/O here; callers hand in a loaded `Catalog`.

pub mod career_scorer;
pub mod difficulty;
pub mod explain;
pub mod recommender;
pub mod subject;
pub mod unit_scorer;
pub mod unit_selector;
pub mod video_matcher;
