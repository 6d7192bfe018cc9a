//! Career index: fills `recommended_games` / `recommended_videos` on every
//! career of the curated career catalog.
//!
//! Games are matched by the knowledge nodes a career requires, then by
//! discipline. Videos are matched by career id, then by discipline. Results
//! are deduplicated in first-seen order and capped per career. The document
//! is edited in place so every other career field survives untouched.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use serde_json::{json, Value};

use crate::catalog::loader::{as_text, game_id, game_node, load_json, unwrap_records};
use crate::config::Config;
use crate::errors::AppError;
use crate::output::write_pretty;

pub const OUTPUT_FILE: &str = "careers_with_recs.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexLimits {
    pub max_games: usize,
    pub max_videos: usize,
}

impl Default for IndexLimits {
    fn default() -> Self {
        Self {
            max_games: 3,
            max_videos: 3,
        }
    }
}

/// Multi-key lookup from catalog keys to record ids, insertion ordered.
#[derive(Debug, Default)]
struct IdIndex(HashMap<String, Vec<String>>);

impl IdIndex {
    fn push(&mut self, key: String, id: &str) {
        self.0.entry(key).or_default().push(id.to_string());
    }

    fn get(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A career's disciplines: a list of labels, or a single label.
fn disciplines(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items.iter().filter_map(as_text).collect(),
        other => other.and_then(as_text).into_iter().collect(),
    }
}

/// Knowledge nodes from `required_skills_knowledge[*].knowledge_nodes`, first-seen order.
fn career_nodes(career: &Value) -> Vec<String> {
    let mut seen = HashSet::new();
    career
        .get("required_skills_knowledge")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|block| block.get("knowledge_nodes").and_then(Value::as_array))
        .flatten()
        .filter_map(as_text)
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

fn unique_capped(candidates: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.clone()))
        .take(cap)
        .collect()
}

/// Writes game and video links into the first progression-path entry of each career.
pub fn index_careers(careers: &mut [Value], games: &[Value], videos: &[Value], limits: IndexLimits) {
    let mut games_by_node = IdIndex::default();
    let mut games_by_discipline = IdIndex::default();
    for g in games {
        let Some(id) = game_id(g) else { continue };
        if let Some(node) = game_node(g) {
            games_by_node.push(node, &id);
        }
        if let Some(d) = g.get("discipline").and_then(as_text) {
            games_by_discipline.push(d, &id);
        }
    }

    let mut videos_by_career = IdIndex::default();
    let mut videos_by_discipline = IdIndex::default();
    for v in videos {
        let Some(id) = v.get("id").and_then(as_text) else { continue };
        if let Some(cid) = v.get("career_id").and_then(as_text) {
            videos_by_career.push(cid, &id);
        }
        if let Some(d) = v.get("discipline").and_then(as_text) {
            videos_by_discipline.push(d, &id);
        }
    }

    for career in careers.iter_mut() {
        let career_id = career.get("id").and_then(as_text);
        let career_disciplines = disciplines(career.get("discipline"));
        let nodes = career_nodes(career);
        let Some(obj) = career.as_object_mut() else { continue };

        let mut game_candidates: Vec<String> = Vec::new();
        for node in &nodes {
            game_candidates.extend_from_slice(games_by_node.get(node));
        }
        for d in &career_disciplines {
            game_candidates.extend_from_slice(games_by_discipline.get(d));
        }

        let mut video_candidates: Vec<String> = Vec::new();
        if let Some(cid) = &career_id {
            video_candidates.extend_from_slice(videos_by_career.get(cid));
        }
        for d in &career_disciplines {
            video_candidates.extend_from_slice(videos_by_discipline.get(d));
        }

        let recommended_games = unique_capped(game_candidates, limits.max_games);
        let recommended_videos = unique_capped(video_candidates, limits.max_videos);

        let path = obj
            .entry("progression_path")
            .or_insert_with(|| Value::Array(Vec::new()));
        if path.as_array().map_or(true, |p| p.is_empty()) {
            *path = json!([{
                "year_range": "Year 7–10",
                "recommended_games": [],
                "recommended_videos": [],
            }]);
        }
        if let Some(first) = path.get_mut(0).and_then(Value::as_object_mut) {
            first.insert("recommended_games".to_string(), json!(recommended_games));
            first.insert("recommended_videos".to_string(), json!(recommended_videos));
        }
    }
}

/// Reads the career, game and video files named by `config`, indexes the
/// careers and writes `{ "careers": [...] }` into the output directory.
pub fn build_career_index(config: &Config, limits: IndexLimits) -> Result<PathBuf, AppError> {
    let mut careers = match load_json(&config.career_index_file)? {
        Value::Object(mut obj) => match obj.remove("careers") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    let games = unwrap_records(load_json(&config.games_file)?, "games");
    let videos = unwrap_records(load_json(&config.videos_file)?, "videos");

    index_careers(&mut careers, &games, &videos, limits);

    let out_path = config.output_dir.join(OUTPUT_FILE);
    write_pretty(&out_path, &json!({ "careers": careers }))?;
    tracing::info!(
        careers = careers.len(),
        path = %out_path.display(),
        "Wrote career index"
    );
    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn games() -> Vec<Value> {
        vec![
            json!({ "id": "g1", "progress_effects": { "knowledge": { "node": "BIO.Y7.cells" } } }),
            json!({ "id": "g2", "node_id": "BIO.Y8.body", "discipline": "Biological Sciences" }),
            json!({ "id": "g3", "code": "CHEM.Y8.atoms", "discipline": "Biological Sciences" }),
            json!({ "id": "g4", "discipline": "Biological Sciences" }),
            json!({ "title": "no id" }),
        ]
    }

    fn videos() -> Vec<Value> {
        vec![
            json!({ "id": "v1", "career_id": "c1" }),
            json!({ "id": "v2", "discipline": "Biological Sciences" }),
            json!({ "id": "v3", "career_id": "c1", "discipline": "Biological Sciences" }),
            json!({ "title": "no id", "career_id": "c1" }),
        ]
    }

    #[test]
    fn test_nodes_first_then_discipline_capped() {
        let mut careers = vec![json!({
            "id": "c1",
            "discipline": ["Biological Sciences"],
            "required_skills_knowledge": [
                { "knowledge_nodes": ["BIO.Y8.body", "BIO.Y7.cells"] },
                { "knowledge_nodes": ["BIO.Y7.cells"] }
            ],
            "progression_path": [{ "year_range": "Year 7–8" }, { "year_range": "Year 9–10" }]
        })];

        index_careers(&mut careers, &games(), &videos(), IndexLimits::default());

        let first = &careers[0]["progression_path"][0];
        assert_eq!(first["year_range"], "Year 7–8");
        assert_eq!(first["recommended_games"], json!(["g2", "g1", "g3"]));
        assert_eq!(first["recommended_videos"], json!(["v1", "v3", "v2"]));
        assert!(careers[0]["progression_path"][1].get("recommended_games").is_none());
    }

    #[test]
    fn test_missing_progression_path_gets_default_entry() {
        let mut careers = vec![json!({ "id": "c9", "title": "Astronomer" })];
        index_careers(&mut careers, &games(), &videos(), IndexLimits::default());

        let path = careers[0]["progression_path"].as_array().unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0]["year_range"], "Year 7–10");
        assert_eq!(path[0]["recommended_games"], json!([]));
        assert_eq!(careers[0]["title"], "Astronomer");
    }

    #[test]
    fn test_custom_limits() {
        let mut careers = vec![json!({ "id": "c1", "discipline": "Biological Sciences" })];
        let limits = IndexLimits {
            max_games: 1,
            max_videos: 2,
        };
        index_careers(&mut careers, &games(), &videos(), limits);

        let first = &careers[0]["progression_path"][0];
        assert_eq!(first["recommended_games"], json!(["g2"]));
        assert_eq!(first["recommended_videos"], json!(["v1", "v3"]));
    }

    #[test]
    fn test_build_career_index_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path();
        std::fs::write(
            data.join("careers.json"),
            r#"{"careers":[{"id":"c1","discipline":["Biological Sciences"]}]}"#,
        )
        .unwrap();
        std::fs::write(data.join("games.json"), json!({ "games": games() }).to_string()).unwrap();
        std::fs::write(data.join("videos.json"), json!(videos()).to_string()).unwrap();

        let config = Config {
            data_dir: data.to_path_buf(),
            users_file: data.join("users.json"),
            games_file: data.join("games.json"),
            careers_file: data.join("careers.json"),
            videos_file: data.join("videos.json"),
            career_index_file: data.join("careers.json"),
            output_dir: data.join("output"),
            rust_log: "info".to_string(),
            engine: Default::default(),
        };

        let out = build_career_index(&config, IndexLimits::default()).unwrap();
        let written = load_json(&out).unwrap();
        assert_eq!(
            written["careers"][0]["progression_path"][0]["recommended_videos"],
            json!(["v1", "v3", "v2"])
        );
    }
}
