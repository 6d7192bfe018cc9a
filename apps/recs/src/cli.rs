//! Command-line surface: `show`, `generate` and `index-careers`.

use clap::{Args, Parser, Subcommand};

use crate::catalog::index::{build_career_index, IndexLimits};
use crate::catalog::loader::{load_catalog, load_users};
use crate::config::{Config, RecommenderConfig};
use crate::errors::AppError;
use crate::output::{generate_reports, BatchOptions};
use crate::scoring::difficulty::HARDEST;
use crate::scoring::recommender::Recommender;

#[derive(Debug, Parser)]
#[command(name = "recs", version, about = "Offline learning recommendations for science students")]
pub struct Cli {
    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Per-run overrides for the engine knobs read from the environment.
#[derive(Debug, Default, Args)]
pub struct EngineArgs {
    /// Units and careers kept after ranking
    #[arg(long, global = true)]
    pub top_k: Option<usize>,

    /// Highest unit difficulty to consider (0 disables the filter)
    #[arg(long, global = true)]
    pub max_difficulty: Option<u8>,

    /// Videos per user
    #[arg(long, global = true)]
    pub video_limit: Option<usize>,
}

impl EngineArgs {
    fn apply(&self, mut engine: RecommenderConfig) -> Result<RecommenderConfig, AppError> {
        if let Some(top_k) = self.top_k {
            engine.top_k = top_k;
        }
        if let Some(max_difficulty) = self.max_difficulty {
            engine.max_difficulty = max_difficulty;
        }
        if let Some(video_limit) = self.video_limit {
            engine.video_limit = video_limit;
        }
        if engine.max_difficulty > HARDEST {
            return Err(AppError::Config(format!(
                "max difficulty must be between 0 and {HARDEST}, got {}",
                engine.max_difficulty
            )));
        }
        Ok(engine)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the recommendation bundle for one user as JSON
    Show {
        /// User id (defaults to the first user in the file)
        #[arg(long)]
        user: Option<String>,
    },
    /// Write a report for every user into the output directory
    Generate {
        #[arg(long)]
        limit: Option<usize>,

        /// Only refresh users that already have a report
        #[arg(long)]
        only_existing: bool,
    },
    /// Link games and videos into the career catalog
    IndexCareers {
        #[arg(long, default_value_t = 3)]
        max_games: usize,

        #[arg(long, default_value_t = 3)]
        max_videos: usize,
    },
}

pub fn run(cli: Cli, config: &Config) -> Result<(), AppError> {
    let engine = cli.engine.apply(config.engine.clone())?;

    match cli.command {
        Command::Show { user } => {
            let json = show(config, engine, user.as_deref())?;
            println!("{json}");
        }
        Command::Generate {
            limit,
            only_existing,
        } => {
            let users = load_users(&config.users_file)?;
            let catalog = load_catalog(config)?;
            let recommender = Recommender::new(&catalog, engine);
            let summary = generate_reports(
                &recommender,
                &users,
                &config.output_dir,
                BatchOptions {
                    limit,
                    only_existing,
                },
            )?;
            tracing::info!(
                written = summary.written(),
                skipped = summary.skipped,
                output = %config.output_dir.display(),
                "Batch complete"
            );
        }
        Command::IndexCareers {
            max_games,
            max_videos,
        } => {
            let path = build_career_index(
                config,
                IndexLimits {
                    max_games,
                    max_videos,
                },
            )?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

/// Pretty JSON for the requested user, or the first one on file.
fn show(config: &Config, engine: RecommenderConfig, user_id: Option<&str>) -> Result<String, AppError> {
    let users = load_users(&config.users_file)?;
    let user = match user_id {
        Some(id) => users.iter().find(|u| u.id == id),
        None => users.first(),
    }
    .ok_or_else(|| AppError::UserNotFound(user_id.unwrap_or("<first>").to_string()))?;

    let catalog = load_catalog(config)?;
    let bundle = Recommender::new(&catalog, engine).recommend(user);
    serde_json::to_string_pretty(&bundle).map_err(|e| AppError::Internal(e.into()))
}
