//! Catalog adapter: turns the raw JSON files into canonical records.
//!
//! Source files come in two shapes (a bare array, or an object wrapping the
//! array under `users` / `games` / `careers` / `videos`) and use several
//! spellings for the same field. Everything is normalized here so the scoring
//! engine never sees raw JSON. A missing file or invalid JSON is fatal; a
//! missing field inside a record falls back to its default.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::catalog::{ActivityUnit, Career, Catalog, NodeWeight, RequiredKnowledge, Video};
use crate::models::user::{Grade, UserProfile};
use crate::scoring::difficulty::parse_difficulty;

// ────────────────────────────────────────────────────────────────────────────
// File access
// ────────────────────────────────────────────────────────────────────────────

pub fn load_json(path: &Path) -> Result<Value, AppError> {
    let text = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| AppError::json(path, e))
}

pub fn load_users(path: &Path) -> Result<Vec<UserProfile>, AppError> {
    let users = users_from_json(load_json(path)?);
    tracing::info!(count = users.len(), path = %path.display(), "Loaded users");
    Ok(users)
}

/// Loads the game, career and video catalogs.
pub fn load_catalog(config: &Config) -> Result<Catalog, AppError> {
    let units = units_from_json(load_json(&config.games_file)?);
    let careers = careers_from_json(load_json(&config.careers_file)?);
    let videos = videos_from_json(load_json(&config.videos_file)?);

    tracing::info!(
        units = units.len(),
        careers = careers.len(),
        videos = videos.len(),
        "Loaded catalog"
    );

    Ok(Catalog {
        units,
        careers,
        videos,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Shape helpers
// ────────────────────────────────────────────────────────────────────────────

/// Accepts `[...]` or `{ "<key>": [...] }`; anything else is an empty list.
pub fn unwrap_records(raw: Value, key: &str) -> Vec<Value> {
    match raw {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Empty strings, zero, false, null and empty containers count as "not set".
fn is_set(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// First of `keys` holding a set value.
fn first_set<'v>(record: &'v Value, keys: &[&str]) -> Option<&'v Value> {
    keys.iter().filter_map(|k| record.get(*k)).find(|v| is_set(v))
}

/// Ids and labels may arrive as strings or bare numbers.
pub(crate) fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_field(record: &Value, keys: &[&str]) -> Option<String> {
    first_set(record, keys).and_then(as_text)
}

/// Integer level from a number (truncated) or numeric string; otherwise 0.
pub fn as_level(v: &Value) -> i64 {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    }
}

fn as_float(v: Option<&Value>, default: f64) -> f64 {
    match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(default),
        _ => default,
    }
}

/// Object of levels, collected in the order the file lists them.
fn level_map<M>(v: Option<&Value>) -> M
where
    M: FromIterator<(String, i64)> + Default,
{
    match v {
        Some(Value::Object(obj)) => obj.iter().map(|(k, v)| (k.clone(), as_level(v))).collect(),
        _ => M::default(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Users
// ────────────────────────────────────────────────────────────────────────────

pub fn users_from_json(raw: Value) -> Vec<UserProfile> {
    unwrap_records(raw, "users")
        .iter()
        .enumerate()
        .map(|(i, u)| user_from_record(i, u))
        .collect()
}

fn user_from_record(index: usize, u: &Value) -> UserProfile {
    let id = text_field(u, &["user_id", "id"]).unwrap_or_else(|| format!("user-{:03}", index + 1));

    let grade_raw = u
        .get("year")
        .or_else(|| u.get("grade"))
        .cloned()
        .unwrap_or(Value::from(0));

    let knowledge: BTreeMap<String, i64> = match first_set(u, &["knowledge_progress", "knowledge"]) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let node = item.get("node").and_then(as_text)?;
                let level = item.get("level").map(as_level).unwrap_or(0);
                Some((node, level))
            })
            .collect(),
        other => level_map(other),
    };

    let career_interests = u
        .get("career_interests")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(as_text).collect())
        .unwrap_or_default();

    UserProfile {
        id,
        grade: parse_grade(grade_raw),
        inquiry_skills: level_map(first_set(u, &["skills_levels", "inquiry_skills"])),
        knowledge,
        career_interests,
    }
}

/// Whole numbers and all-digit strings become a year; anything else passes through.
fn parse_grade(raw: Value) -> Grade {
    let year = match &raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
            s.parse::<i64>().ok()
        }
        _ => None,
    };
    match year {
        Some(year) => Grade::Year(year),
        None => Grade::Raw(raw),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Games → units
// ────────────────────────────────────────────────────────────────────────────

/// Knowledge node a game trains: `progress_effects.knowledge.node`, else
/// `node_id`, else `code`.
pub fn game_node(g: &Value) -> Option<String> {
    g.pointer("/progress_effects/knowledge/node")
        .filter(|v| is_set(v))
        .or_else(|| first_set(g, &["node_id", "code"]))
        .and_then(as_text)
}

pub fn game_id(g: &Value) -> Option<String> {
    text_field(g, &["id", "game_id", "code"])
}

pub fn units_from_json(raw: Value) -> Vec<ActivityUnit> {
    unwrap_records(raw, "games")
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let id = game_id(g).unwrap_or_else(|| format!("game-{}", i + 1));
            let title = text_field(g, &["title"]).unwrap_or_else(|| id.clone());
            let difficulty = g.get("difficulty").map(parse_difficulty).unwrap_or(1);

            ActivityUnit {
                id,
                title,
                kind: "game".to_string(),
                difficulty,
                knowledge_nodes: game_node(g).map(NodeWeight::new).into_iter().collect(),
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Videos
// ────────────────────────────────────────────────────────────────────────────

pub fn videos_from_json(raw: Value) -> Vec<Video> {
    unwrap_records(raw, "videos")
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let n = i + 1;
            if !v.is_object() {
                let title = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                return Video {
                    id: format!("video-{n}"),
                    title,
                    discipline: None,
                    career_id: None,
                    video_url: None,
                };
            }
            Video {
                id: text_field(v, &["id"]).unwrap_or_else(|| format!("video-{n}")),
                title: text_field(v, &["title"]).unwrap_or_else(|| format!("Scientist video {n}")),
                discipline: v.get("discipline").and_then(as_text),
                career_id: v.get("career_id").and_then(as_text),
                video_url: v.get("video_url").and_then(as_text),
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Careers
// ────────────────────────────────────────────────────────────────────────────

pub fn careers_from_json(raw: Value) -> Vec<Career> {
    unwrap_records(raw, "careers")
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let id = text_field(c, &["id", "career_id"]).unwrap_or_else(|| format!("career-{}", i + 1));
            let title = text_field(c, &["title", "name"]).unwrap_or_else(|| id.clone());

            let required_knowledge = c
                .get("required_knowledge")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(required_from_record).collect())
                .unwrap_or_default();

            Career {
                id,
                title,
                min_skill_levels: level_map(c.get("min_skill_levels")),
                required_knowledge,
                threshold: as_float(c.get("threshold"), 0.0),
                threshold_text: c
                    .get("threshold")
                    .and_then(as_text)
                    .unwrap_or_else(|| "0".to_string()),
                discipline: discipline_label(c.get("discipline")),
            }
        })
        .collect()
}

fn required_from_record(rk: &Value) -> RequiredKnowledge {
    RequiredKnowledge {
        node: rk.get("node").and_then(as_text),
        min_level: rk
            .get("min_level")
            .filter(|v| !v.is_null())
            .map(as_level)
            .unwrap_or(1),
        weight: as_float(rk.get("weight"), 1.0),
    }
}

/// A single label, or the first label when the catalog lists several.
fn discipline_label(v: Option<&Value>) -> Option<String> {
    match v {
        Some(Value::Array(items)) => items.iter().find_map(as_text),
        Some(other) => as_text(other),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::career_scorer::score_career;
    use crate::scoring::explain::{career_evidence, why_for_career};
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_unwrap_records_both_shapes() {
        assert_eq!(unwrap_records(json!([1, 2]), "games").len(), 2);
        assert_eq!(unwrap_records(json!({ "games": [1, 2, 3] }), "games").len(), 3);
        assert!(unwrap_records(json!({ "other": [1] }), "games").is_empty());
        assert!(unwrap_records(json!("nope"), "games").is_empty());
    }

    #[test]
    fn test_users_with_legacy_field_names() {
        let users = users_from_json(json!({
            "users": [{
                "user_id": "Y3_U1",
                "year": 3,
                "skills_levels": { "QP": 1, "PC": "2", "PAD": 0 },
                "knowledge_progress": [
                    { "node": "BIO.Y3.AC9S3U01", "level": 1 },
                    { "level": 2 },
                    { "node": "EARTH.Y3.AC9S3U02" }
                ],
                "career_interests": ["biology", "doctor"]
            }]
        }));

        let u = &users[0];
        assert_eq!(u.id, "Y3_U1");
        assert_eq!(u.grade, Grade::Year(3));
        assert_eq!(u.skill_level("PC"), 2);
        assert_eq!(u.knowledge.len(), 2);
        assert_eq!(u.knowledge_level("BIO.Y3.AC9S3U01"), 1);
        assert_eq!(u.knowledge_level("EARTH.Y3.AC9S3U02"), 0);
        assert_eq!(u.career_interests, vec!["biology", "doctor"]);
    }

    #[test]
    fn test_users_with_canonical_field_names_and_defaults() {
        let users = users_from_json(json!([
            { "id": "a", "grade": "8", "inquiry_skills": { "QP": 2 }, "knowledge": { "CHEM.Y8.atoms": 1.7 } },
            { "grade": "Foundation" },
            {}
        ]));

        assert_eq!(users[0].grade, Grade::Year(8));
        assert_eq!(users[0].knowledge_level("CHEM.Y8.atoms"), 1);
        assert_eq!(users[1].id, "user-002");
        assert_eq!(users[1].grade, Grade::Raw(json!("Foundation")));
        assert_eq!(users[2].id, "user-003");
        assert_eq!(users[2].grade, Grade::Year(0));
        assert!(users[2].is_cold_start());
    }

    #[test]
    fn test_games_become_units() {
        let units = units_from_json(json!({
            "games": [
                {
                    "id": "g1",
                    "title": "Intro to Cells",
                    "difficulty": "easy",
                    "progress_effects": { "knowledge": { "node": "BIO.Y3.AC9S3U01" } }
                },
                { "id": "g2", "difficulty": 2.6, "node_id": "EARTH.Y3.AC9S3U02" },
                { "code": "PHYS.Y6.AC9S6U01", "difficulty": "challenging" },
                { "title": "Orphan" }
            ]
        }));

        assert_eq!(units.len(), 4);
        assert_eq!(units[0].difficulty, 1);
        assert_eq!(units[0].primary_node(), Some("BIO.Y3.AC9S3U01"));
        assert_eq!(units[1].title, "g2");
        assert_eq!(units[1].difficulty, 2);
        assert_eq!(units[1].primary_node(), Some("EARTH.Y3.AC9S3U02"));
        assert_eq!(units[2].id, "PHYS.Y6.AC9S6U01");
        assert_eq!(units[2].difficulty, 3);
        assert_eq!(units[3].id, "game-4");
        assert_eq!(units[3].difficulty, 1);
        assert!(units[3].knowledge_nodes.is_empty());
        assert!(units.iter().all(|u| u.kind == "game"));
    }

    #[test]
    fn test_videos_accept_bare_strings() {
        let videos = videos_from_json(json!([
            { "id": "v1", "title": "Marine biologist", "discipline": "Biological Sciences", "career_id": "c1" },
            "A day in the lab",
            { "discipline": null }
        ]));

        assert_eq!(videos[0].career_id.as_deref(), Some("c1"));
        assert_eq!(videos[1].id, "video-2");
        assert_eq!(videos[1].title, "A day in the lab");
        assert_eq!(videos[1].discipline, None);
        assert_eq!(videos[2].id, "video-3");
        assert_eq!(videos[2].title, "Scientist video 3");
    }

    #[test]
    fn test_careers_with_defaults() {
        let careers = careers_from_json(json!({
            "careers": [
                {
                    "id": "c1",
                    "title": "Biologist",
                    "discipline": "Biological Sciences",
                    "min_skill_levels": { "QP": 1 },
                    "required_knowledge": [
                        { "node": "BIO.Y3.AC9S3U01", "min_level": 1, "weight": 2 },
                        { "node": "BIO.Y4.AC9S4U01" },
                        { "weight": 5 }
                    ],
                    "threshold": 1.5
                },
                { "career_id": "c2", "name": "Geologist", "discipline": ["Earth & Space Sciences", "Chemical Sciences"] },
                {}
            ]
        }));

        let c1 = &careers[0];
        assert_eq!(c1.min_skill_levels.get("QP"), Some(&1));
        assert_eq!(c1.required_knowledge[0].weight, 2.0);
        assert_eq!(c1.required_knowledge[1].min_level, 1);
        assert_eq!(c1.required_knowledge[1].weight, 1.0);
        assert_eq!(c1.required_knowledge[2].node, None);
        assert_eq!(c1.threshold, 1.5);

        assert_eq!(careers[1].id, "c2");
        assert_eq!(careers[1].title, "Geologist");
        assert_eq!(careers[1].discipline.as_deref(), Some("Earth & Space Sciences"));
        assert_eq!(careers[1].threshold, 0.0);

        assert_eq!(careers[2].id, "career-3");
        assert_eq!(careers[2].title, "career-3");
    }

    #[test]
    fn test_skill_gate_keeps_catalog_order_into_explanation() {
        let raw: Value = serde_json::from_str(
            r#"[{ "id": "c1", "min_skill_levels": { "QP": 2, "PC": 2, "PAD": 2 } }]"#,
        )
        .unwrap();
        let careers = careers_from_json(raw);
        let skills: Vec<&str> = careers[0].min_skill_levels.keys().map(String::as_str).collect();
        assert_eq!(skills, vec!["QP", "PC", "PAD"]);

        let scored = score_career(&careers[0], &UserProfile::default());
        assert_eq!(
            scored.unmet_skills,
            vec![("QP".to_string(), 2), ("PC".to_string(), 2), ("PAD".to_string(), 2)]
        );
        assert!(why_for_career(&scored)
            .contains("You still need inquiry skills like questioning & predicting, planning & conducting."));
    }

    #[test]
    fn test_threshold_evidence_keeps_catalog_spelling() {
        let raw: Value = serde_json::from_str(
            r#"[{ "id": "c1", "threshold": 2.0 }, { "id": "c2", "threshold": 2 }, { "id": "c3" }]"#,
        )
        .unwrap();
        let careers = careers_from_json(raw);
        let user = UserProfile::default();

        let evidence: Vec<String> = careers
            .iter()
            .map(|c| career_evidence(c, &score_career(c, &user))[1].clone())
            .collect();
        assert_eq!(
            evidence,
            vec![
                "required_threshold=2.0 (relaxed to 40%)",
                "required_threshold=2 (relaxed to 40%)",
                "required_threshold=0 (relaxed to 40%)",
            ]
        );
        assert_eq!(careers[0].threshold, 2.0);
    }

    #[test]
    fn test_as_level_coercions() {
        assert_eq!(as_level(&json!(3)), 3);
        assert_eq!(as_level(&json!(2.9)), 2);
        assert_eq!(as_level(&json!(" 4 ")), 4);
        assert_eq!(as_level(&json!("high")), 0);
        assert_eq!(as_level(&json!(null)), 0);
    }

    #[test]
    fn test_load_json_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_json(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }

    #[test]
    fn test_load_json_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"{ \"games\": [ ").unwrap();

        let err = load_json(&path).unwrap_err();
        assert!(matches!(err, AppError::Json { .. }));
    }

    #[test]
    fn test_load_users_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, r#"{"users":[{"id":"u1","knowledge":{"BIO.Y7.cells":2}}]}"#).unwrap();

        let users = load_users(&path).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].knowledge_level("BIO.Y7.cells"), 2);
    }
}
