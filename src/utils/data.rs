use crate::models::{Game, Lean, PickKind, PickRecord, PropPick, Snapshot};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::warn;

/// Save any serializable data to a pretty JSON file, creating parent dirs
pub fn save_to_cache<T: Serialize + ?Sized>(data: &T, cache_file: impl AsRef<Path>) -> Result<()> {
    let cache_file = cache_file.as_ref();
    if let Some(parent) = cache_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(data).context("Failed to serialize data")?;
    std::fs::write(cache_file, json)
        .with_context(|| format!("Failed to write cache file {}", cache_file.display()))?;
    Ok(())
}

/// Load JSON data written by `save_to_cache` (or by the feed)
pub fn load_from_cache<T: DeserializeOwned>(cache_file: impl AsRef<Path>) -> Result<T> {
    let cache_file = cache_file.as_ref();
    let json = std::fs::read_to_string(cache_file)
        .with_context(|| format!("Failed to read cache file {}", cache_file.display()))?;
    let data = serde_json::from_str(&json)
        .with_context(|| format!("Failed to deserialize {}", cache_file.display()))?;
    Ok(data)
}

/// Load a feed snapshot, warning about analyses for games it doesn't list
pub fn load_snapshot(snapshot_file: impl AsRef<Path>) -> Result<Snapshot> {
    let snapshot: Snapshot = load_from_cache(snapshot_file)?;
    for analysis in &snapshot.analyses {
        if snapshot.game(&analysis.game_id).is_none() {
            warn!(game_id = %analysis.game_id, "analysis references a game not in the snapshot");
        }
    }
    Ok(snapshot)
}

#[derive(Debug, Serialize)]
struct TopPickRow<'a> {
    #[serde(rename = "Rank")]
    rank: usize,
    #[serde(rename = "Game")]
    game: String,
    #[serde(rename = "Kind")]
    kind: &'static str,
    #[serde(rename = "Pick")]
    pick: &'a str,
    #[serde(rename = "Team")]
    team: Option<&'a str>,
    #[serde(rename = "Confidence")]
    confidence: Option<f64>,
}

/// Save ranked picks to CSV
pub fn save_top_picks_to_csv(
    picks: &[PickRecord],
    games: &[Game],
    filename: impl AsRef<Path>,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename.as_ref()).context("Failed to create CSV file")?;

    for (i, pick) in picks.iter().enumerate() {
        let game = games
            .iter()
            .find(|g| g.id == pick.game_id)
            .map(|g| format!("{} @ {}", g.away, g.home))
            .unwrap_or_else(|| pick.game_id.clone());
        let kind = match pick.kind {
            PickKind::BestBet => "Best Bet",
            PickKind::TotalLean => "Total",
            PickKind::PlayerProp => "Player Prop",
        };
        writer.serialize(TopPickRow {
            rank: i + 1,
            game,
            kind,
            pick: &pick.text,
            team: pick.team.as_deref(),
            confidence: pick.confidence,
        })?;
    }

    writer.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct PropRow<'a> {
    #[serde(rename = "Rank")]
    rank: usize,
    #[serde(rename = "Player")]
    player: &'a str,
    #[serde(rename = "Team")]
    team: Option<&'a str>,
    #[serde(rename = "Stat")]
    stat: &'a str,
    #[serde(rename = "Side")]
    side: &'static str,
    #[serde(rename = "Line")]
    line: f64,
    #[serde(rename = "Edge")]
    edge: Option<f64>,
}

/// Save the props leaderboard to CSV
pub fn save_prop_leaderboard_to_csv(props: &[PropPick], filename: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename.as_ref()).context("Failed to create CSV file")?;

    for (i, prop) in props.iter().enumerate() {
        writer.serialize(PropRow {
            rank: i + 1,
            player: &prop.player,
            team: prop.team.as_deref(),
            stat: &prop.stat,
            side: match prop.side {
                Lean::Over => "OVER",
                Lean::Under => "UNDER",
            },
            line: prop.line,
            edge: prop.edge,
        })?;
    }

    writer.flush()?;
    Ok(())
}
