use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a game sits in its lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Upcoming,
    Live,
    Final,
}

/// An NBA game as reported by the odds/score feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub status: GameStatus,
    pub home: String,
    pub away: String,
    pub home_name: String,
    pub away_name: String,
    #[serde(default)]
    pub home_score: u32,
    #[serde(default)]
    pub away_score: u32,
    /// Current quarter, live games only
    pub quarter: Option<u8>,
    /// "MM:SS", "Half" or "Halftime"
    pub clock: Option<String>,
    /// Tip-off time for upcoming games (e.g. "7:00 PM PT")
    pub time: Option<String>,
    pub home_win_prob: Option<f64>,
    pub away_win_prob: Option<f64>,
    pub home_odds: Option<String>, // American odds, e.g. "+148"
    pub away_odds: Option<String>,
    /// Favorite first, e.g. "BOS -5.5"
    pub spread: Option<String>,
    /// Over/under total, e.g. "224.5"
    pub ou: Option<String>,
}

impl Game {
    pub fn combined_score(&self) -> u32 {
        self.home_score.saturating_add(self.away_score)
    }

    pub fn is_final(&self) -> bool {
        self.status == GameStatus::Final
    }

    /// Score for a team code, if the code belongs to this game
    pub fn score_for(&self, team: &str) -> Option<u32> {
        if team.eq_ignore_ascii_case(&self.home) {
            Some(self.home_score)
        } else if team.eq_ignore_ascii_case(&self.away) {
            Some(self.away_score)
        } else {
            None
        }
    }

    /// The other side of the matchup
    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if team.eq_ignore_ascii_case(&self.home) {
            Some(&self.away)
        } else if team.eq_ignore_ascii_case(&self.away) {
            Some(&self.home)
        } else {
            None
        }
    }

    /// Recorded moneyline for a team code
    pub fn moneyline_for(&self, team: &str) -> Option<&str> {
        if team.eq_ignore_ascii_case(&self.home) {
            self.home_odds.as_deref()
        } else if team.eq_ignore_ascii_case(&self.away) {
            self.away_odds.as_deref()
        } else {
            None
        }
    }
}

/// Whether a best bet is laid against the spread or straight up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetType {
    Spread,
    Moneyline,
}

/// Over/under side of a total or player prop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Lean {
    Over,
    Under,
}

impl Lean {
    /// First OVER/UNDER word in free text, case-insensitive
    pub fn from_text(text: &str) -> Option<Lean> {
        text.split(|c: char| !c.is_ascii_alphanumeric())
            .find_map(|word| {
                if word.eq_ignore_ascii_case("over") {
                    Some(Lean::Over)
                } else if word.eq_ignore_ascii_case("under") {
                    Some(Lean::Under)
                } else {
                    None
                }
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickKind {
    BestBet,
    TotalLean,
    PlayerProp,
}

/// A normalized betting recommendation for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickRecord {
    pub game_id: String,
    pub kind: PickKind,
    pub text: String,
    /// Opaque confidence ("Dubl score"); only used for ordering
    pub confidence: Option<f64>,
    /// Team code being backed (best bets only)
    pub team: Option<String>,
    pub bet_type: Option<BetType>,
}

impl PickRecord {
    /// Format the pick as a readable string
    pub fn format(&self) -> String {
        let kind = match self.kind {
            PickKind::BestBet => "Best Bet",
            PickKind::TotalLean => "Total",
            PickKind::PlayerProp => "Prop",
        };
        match self.confidence {
            Some(confidence) => format!(
                "{} [{}] {} | Confidence: {:.0}",
                self.game_id, kind, self.text, confidence
            ),
            None => format!("{} [{}] {}", self.game_id, kind, self.text),
        }
    }
}

/// Commentary returned by the text-generation collaborator for one game.
/// When any structured field is present the free text is not parsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAnalysis {
    pub game_id: String,
    pub text: Option<String>,
    pub best_bet: Option<String>,
    pub bet_team: Option<String>,
    pub bet_type: Option<BetType>,
    pub ou: Option<String>,
    pub props: Option<String>,
    #[serde(alias = "dublScore")]
    pub confidence: Option<f64>,
    pub ou_confidence: Option<f64>,
}

impl GameAnalysis {
    pub fn has_structured_fields(&self) -> bool {
        self.best_bet.is_some() || self.ou.is_some() || self.props.is_some()
    }
}

/// A player prop recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropPick {
    pub player: String,
    pub team: Option<String>,
    pub game: Option<String>,
    /// Normalized stat name ("PTS", "REB", "3PM", ...)
    #[serde(rename = "prop")]
    pub stat: String,
    pub line: f64,
    #[serde(rename = "rec")]
    pub side: Lean,
    /// American odds quoted with the prop, if any
    pub odds: Option<i32>,
    /// Edge score used by the props leaderboard
    #[serde(rename = "conf")]
    pub edge: Option<f64>,
    #[serde(default, rename = "reason")]
    pub reason: String,
}

impl PropPick {
    /// Format the prop as a readable string
    pub fn format(&self) -> String {
        let side = match self.side {
            Lean::Over => "OVER",
            Lean::Under => "UNDER",
        };
        let mut out = format!("{} {} {} {}", self.player, side, self.line, self.stat);
        if let Some(odds) = self.odds {
            out.push_str(&format!(" ({:+})", odds));
        }
        if let Some(edge) = self.edge {
            out.push_str(&format!(" | Edge: {:.0}", edge));
        }
        if !self.reason.is_empty() {
            out.push_str(&format!(" | {}", self.reason));
        }
        out
    }
}

/// One row of a conference standings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub abbr: String,
    pub team: String,
    pub w: u32,
    pub l: u32,
    /// Win percentage as the feed prints it (".755")
    pub pct: String,
    pub streak: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Standings {
    #[serde(rename = "East", default)]
    pub east: Vec<StandingRow>,
    #[serde(rename = "West", default)]
    pub west: Vec<StandingRow>,
}

/// Read-only snapshot of the game/odds feed plus any generated analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub props: Vec<PropPick>,
    #[serde(default)]
    pub analyses: Vec<GameAnalysis>,
    #[serde(default)]
    pub standings: Standings,
}

impl Snapshot {
    pub fn game(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }
}
