use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::utils::pick_ranker::TOP_PICKS;

const DEFAULT_SNAPSHOT_FILE: &str = "data/snapshot.json";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_EXPORT_DIR: &str = "cache";
const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Runtime settings, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub snapshot_file: PathBuf,
    pub bind_addr: String,
    pub top_picks: usize,
    pub leaderboard_size: usize,
    pub save_csv: bool,
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_file: PathBuf::from(DEFAULT_SNAPSHOT_FILE),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            top_picks: TOP_PICKS,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            save_csv: false,
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, value)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            snapshot_file: env::var("NBA_SNAPSHOT_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_file),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            top_picks: parse_var("TOP_PICKS", defaults.top_picks)?,
            leaderboard_size: parse_var("LEADERBOARD_SIZE", defaults.leaderboard_size)?,
            save_csv: env::var("SAVE_CSV").unwrap_or_default() == "1",
            export_dir: env::var("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
        })
    }
}
