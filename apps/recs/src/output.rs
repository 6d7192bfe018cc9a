//! Batch report writer: one `rec_<user>.json` per user.
//!
//! Existing reports are updated in place: only `recommendations` and
//! `meta.generatedAt` are replaced, so hand-added keys survive reruns.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::recommendation::RecommendationBundle;
use crate::models::user::UserProfile;
use crate::scoring::recommender::Recommender;

pub const USER_RECS_DIR: &str = "user_recs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Created,
    Updated,
    /// The previous file was not a JSON object and has been overwritten.
    Replaced,
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub created: usize,
    pub updated: usize,
    pub replaced: usize,
    pub skipped: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Created => self.created += 1,
            WriteOutcome::Updated => self.updated += 1,
            WriteOutcome::Replaced => self.replaced += 1,
            WriteOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn written(&self) -> usize {
        self.created + self.updated + self.replaced
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Process at most this many users, in file order.
    pub limit: Option<usize>,
    /// Leave users without an existing report alone.
    pub only_existing: bool,
}

/// `rec_<id>.json`, with every character outside `[A-Za-z0-9_-]` replaced by `_`.
pub fn report_file_name(user_id: &str) -> String {
    let safe: String = user_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("rec_{safe}.json")
}

/// Folds a fresh bundle into a previously written report.
fn merge_into(mut existing: Map<String, Value>, fresh: Value) -> Value {
    let Value::Object(mut fresh) = fresh else {
        return Value::Object(existing);
    };
    if let Some(recs) = fresh.remove("recommendations") {
        existing.insert("recommendations".to_string(), recs);
    }
    let generated_at = fresh
        .get("meta")
        .and_then(|m| m.get("generatedAt"))
        .cloned()
        .unwrap_or(Value::Null);

    let meta = existing
        .entry("meta")
        .or_insert_with(|| Value::Object(Map::new()));
    if !meta.is_object() {
        *meta = Value::Object(Map::new());
    }
    if let Some(meta) = meta.as_object_mut() {
        meta.insert("generatedAt".to_string(), generated_at);
    }
    Value::Object(existing)
}

pub fn write_user_report(
    dir: &Path,
    bundle: &RecommendationBundle,
    only_existing: bool,
) -> Result<WriteOutcome, AppError> {
    let path = dir.join(report_file_name(&bundle.user.id));
    let fresh = serde_json::to_value(bundle).map_err(|e| AppError::json(&path, e))?;

    if !path.exists() {
        if only_existing {
            tracing::warn!(path = %path.display(), "No existing report, skipping");
            return Ok(WriteOutcome::Skipped);
        }
        write_pretty(&path, &fresh)?;
        return Ok(WriteOutcome::Created);
    }

    let previous = std::fs::read_to_string(&path).map_err(|e| AppError::io(&path, e))?;
    match serde_json::from_str::<Value>(&previous) {
        Ok(Value::Object(existing)) => {
            write_pretty(&path, &merge_into(existing, fresh))?;
            Ok(WriteOutcome::Updated)
        }
        _ => {
            tracing::warn!(path = %path.display(), "Existing report unreadable, overwriting");
            write_pretty(&path, &fresh)?;
            Ok(WriteOutcome::Replaced)
        }
    }
}

/// Builds and writes reports for `users` under `<output_dir>/user_recs`.
pub fn generate_reports(
    recommender: &Recommender<'_>,
    users: &[UserProfile],
    output_dir: &Path,
    options: BatchOptions,
) -> Result<BatchSummary, AppError> {
    let dir: PathBuf = output_dir.join(USER_RECS_DIR);
    std::fs::create_dir_all(&dir).map_err(|e| AppError::io(&dir, e))?;

    let total = options.limit.map_or(users.len(), |n| n.min(users.len()));
    let mut summary = BatchSummary::default();
    tracing::info!(
        users = total,
        engine = ?recommender.config(),
        dir = %dir.display(),
        "Generating reports"
    );

    for (idx, user) in users.iter().take(total).enumerate() {
        let bundle = recommender.recommend(user);
        let outcome = write_user_report(&dir, &bundle, options.only_existing)?;
        tracing::info!(
            progress = format!("{}/{}", idx + 1, total),
            user_id = %user.id,
            outcome = ?outcome,
            "Processed user"
        );
        summary.record(outcome);
    }

    Ok(summary)
}

pub(crate) fn write_pretty(path: &Path, value: &Value) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
    }
    let body = serde_json::to_string_pretty(value).map_err(|e| AppError::json(path, e))?;
    std::fs::write(path, body).map_err(|e| AppError::io(path, e))
}
