use crate::models::{Game, GameStatus, Lean};
use crate::utils::line_results::parse_total_line;
use crate::utils::odds_math::round_to;
use serde::{Deserialize, Serialize};

const QUARTER_MINUTES: f64 = 12.0;
const GAME_MINUTES: f64 = 48.0;
const HALFTIME_ELAPSED: f64 = 24.0;
/// Below this much game time a projection is noise
const MIN_ELAPSED_MINUTES: f64 = 1.0;

/// A live game clock reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameClock {
    Running { minutes_remaining: f64 },
    Halftime,
}

/// Parse "MM:SS" (or "M:SS") into minutes remaining in the quarter.
/// "Half" and "Halftime" are the halftime break.
pub fn parse_clock(clock: &str) -> Option<GameClock> {
    let clock = clock.trim();
    if clock.eq_ignore_ascii_case("halftime") || clock.eq_ignore_ascii_case("half") {
        return Some(GameClock::Halftime);
    }

    let (minutes, seconds) = clock.split_once(':')?;
    let minutes = minutes.trim().parse::<u32>().ok()? as f64;
    let seconds = seconds.trim().parse::<f64>().ok()?;
    if !(0.0..60.0).contains(&seconds) {
        return None;
    }

    let minutes_remaining = minutes + seconds / 60.0;
    if minutes_remaining > QUARTER_MINUTES {
        return None;
    }
    Some(GameClock::Running { minutes_remaining })
}

/// Minutes of game time played so far. Halftime always counts as 24.
pub fn elapsed_minutes(quarter: Option<u8>, clock: &str) -> Option<f64> {
    match parse_clock(clock)? {
        GameClock::Halftime => Some(HALFTIME_ELAPSED),
        GameClock::Running { minutes_remaining } => {
            let quarter = quarter.filter(|q| *q >= 1)? as f64;
            Some((quarter - 1.0) * QUARTER_MINUTES + (QUARTER_MINUTES - minutes_remaining))
        }
    }
}

/// Linear projection of a live game's combined score against its total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacePrediction {
    pub game_id: String,
    pub elapsed_minutes: f64,
    pub combined_score: u32,
    /// Projected final combined score, one decimal
    pub projected_total: f64,
    pub line: f64,
    /// Points still needed to reach the line (negative once past it)
    pub remaining_to_line: f64,
    /// Projected total minus the line, one decimal
    pub projected_margin: f64,
}

impl PacePrediction {
    /// Format the projection as a readable string
    pub fn format(&self) -> String {
        format!(
            "{} pts through {:.1} min | Pace: {:.1} vs {:.1} ({:+.1}) | Need {:.1} more",
            self.combined_score,
            self.elapsed_minutes,
            self.projected_total,
            self.line,
            self.projected_margin,
            self.remaining_to_line
        )
    }

    /// Display signal only; this is not a probability.
    pub fn on_pace(&self, lean: Lean) -> bool {
        match lean {
            Lean::Over => self.projected_total > self.line,
            Lean::Under => self.projected_total < self.line,
        }
    }
}

/// Project a live game's final combined score assuming the current scoring
/// rate holds for 48 minutes. `None` for non-live games, games without a
/// numeric total, or less than one minute played.
pub fn project_pace(game: &Game) -> Option<PacePrediction> {
    if game.status != GameStatus::Live {
        return None;
    }

    let line = game.ou.as_deref().and_then(parse_total_line)?;
    let elapsed = elapsed_minutes(game.quarter, game.clock.as_deref()?)?;
    if elapsed < MIN_ELAPSED_MINUTES {
        return None;
    }

    let combined = game.combined_score();
    let projected_total = round_to(combined as f64 / elapsed * GAME_MINUTES, 1);

    Some(PacePrediction {
        game_id: game.id.clone(),
        elapsed_minutes: elapsed,
        combined_score: combined,
        projected_total,
        line,
        remaining_to_line: line - combined as f64,
        projected_margin: round_to(projected_total - line, 1),
    })
}
