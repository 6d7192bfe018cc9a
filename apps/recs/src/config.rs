use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::scoring::video_matcher::DEFAULT_VIDEO_LIMIT;

/// Engine knobs. Fixed for the lifetime of a batch run and handed to the
/// `Recommender` at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommenderConfig {
    /// How many units and careers survive ranking.
    pub top_k: usize,
    /// Keep only the next-rung unit per knowledge node.
    pub only_next_level_units: bool,
    /// Skip career scoring entirely for cold-start users.
    pub hide_careers_on_cold_start: bool,
    /// Units with a normalized difficulty above this are dropped.
    pub max_difficulty: u8,
    pub video_limit: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            only_next_level_units: true,
            hide_careers_on_cold_start: false,
            max_difficulty: 3,
            video_limit: DEFAULT_VIDEO_LIMIT,
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable is optional; defaults mirror the bundled data layout.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub users_file: PathBuf,
    pub games_file: PathBuf,
    pub careers_file: PathBuf,
    pub videos_file: PathBuf,
    /// Career catalog that `index-careers` enriches with game/video links.
    pub career_index_file: PathBuf,
    pub output_dir: PathBuf,
    pub rust_log: String,
    pub engine: RecommenderConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let data_dir = PathBuf::from(env_or("RECS_DATA_DIR", "assets/data"));
        let in_data = |key: &str, default: &str| data_dir.join(env_or(key, default));

        let defaults = RecommenderConfig::default();
        let engine = RecommenderConfig {
            top_k: parse_env("RECS_TOP_K", defaults.top_k)?,
            only_next_level_units: parse_flag(
                "RECS_ONLY_NEXT_LEVEL_UNITS",
                defaults.only_next_level_units,
            )?,
            hide_careers_on_cold_start: parse_flag(
                "RECS_HIDE_CAREERS_ON_COLD_START",
                defaults.hide_careers_on_cold_start,
            )?,
            max_difficulty: parse_env("RECS_MAX_DIFFICULTY", defaults.max_difficulty)?,
            video_limit: parse_env("RECS_VIDEO_LIMIT", defaults.video_limit)?,
        };

        Ok(Config {
            users_file: in_data("RECS_USERS_FILE", "mock_users_progress.json"),
            games_file: in_data("RECS_GAMES_FILE", "curriculum_games.json"),
            careers_file: in_data("RECS_CAREERS_FILE", "STEM Careers.json"),
            videos_file: in_data("RECS_VIDEOS_FILE", "discipline_videos.json"),
            career_index_file: in_data(
                "RECS_CAREER_INDEX_FILE",
                "careers_with_skills_knowledge_263.json",
            ),
            output_dir: std::env::var("RECS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("output")),
            rust_log: env_or("RUST_LOG", "info"),
            data_dir,
            engine,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn parse_flag(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key) {
        Ok(raw) => parse_bool(&raw).with_context(|| format!("{key} must be a boolean, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised boolean '{other}'"),
    }
}
