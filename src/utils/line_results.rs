use crate::models::{BetType, Game, Lean, PickKind, PickRecord};
use crate::utils::odds_math::OddsValue;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

lazy_static! {
    // "<TEAM> <signed number>", favorite first: "DET -16.5"
    static ref SPREAD_RE: Regex =
        Regex::new(r"^\s*([A-Za-z]{2,4})\s+([+-]?\d+(?:\.\d+)?)\s*$").unwrap();
}

/// Straight-up result of a finished game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneylineResult {
    /// `None` only if the feed reports a tie
    pub winner: Option<String>,
    pub margin: u32,
    /// The winner's recorded pre-game moneyline, when parsable
    pub winner_odds: Option<OddsValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadOutcome {
    FavoriteCovered,
    UnderdogCovered,
    Push,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SpreadResult {
    Graded {
        favorite: String,
        underdog: String,
        line: f64,
        /// Margin the favorite had to beat, |line|
        required_margin: f64,
        /// Favorite's score minus underdog's score
        actual_margin: i64,
        outcome: SpreadOutcome,
        covering_team: Option<String>,
    },
    /// The spread string was missing or unreadable; the actual margin is
    /// still reported.
    LineUnavailable { winner: Option<String>, margin: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TotalOutcome {
    Over,
    Under,
    Push,
}

impl TotalOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            TotalOutcome::Over => "OVER",
            TotalOutcome::Under => "UNDER",
            TotalOutcome::Push => "PUSH",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TotalResult {
    Graded {
        combined: u32,
        line: f64,
        outcome: TotalOutcome,
    },
    LineUnavailable { combined: u32 },
}

/// Outcome of every market on one finished game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineResult {
    pub game_id: String,
    pub moneyline: MoneylineResult,
    pub spread: SpreadResult,
    pub total: TotalResult,
}

impl LineResult {
    /// Format the result as a readable string
    pub fn format(&self) -> String {
        let moneyline = match (&self.moneyline.winner, self.moneyline.winner_odds) {
            (Some(winner), Some(odds)) => format!("{} by {} ({})", winner, self.moneyline.margin, odds),
            (Some(winner), None) => format!("{} by {}", winner, self.moneyline.margin),
            (None, _) => "tie".to_string(),
        };
        let spread = match &self.spread {
            SpreadResult::Graded {
                favorite,
                line,
                actual_margin,
                outcome,
                covering_team,
                ..
            } => match (outcome, covering_team) {
                (SpreadOutcome::Push, _) | (_, None) => {
                    format!("{} {:+.1} PUSH (margin {})", favorite, line, actual_margin)
                }
                (_, Some(team)) => format!(
                    "{} {:+.1}, {} covers (margin {})",
                    favorite, line, team, actual_margin
                ),
            },
            SpreadResult::LineUnavailable { margin, .. } => format!("N/A (margin {})", margin),
        };
        let total = match &self.total {
            TotalResult::Graded {
                combined,
                line,
                outcome,
            } => format!("{} ({} vs {:.1})", outcome.label(), combined, line),
            TotalResult::LineUnavailable { combined } => format!("N/A ({})", combined),
        };
        format!("ML: {} | Spread: {} | Total: {}", moneyline, spread, total)
    }
}

/// A spread line read from the feed, normalized to the game's team codes
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadLine {
    pub favorite: String,
    pub underdog: String,
    pub line: f64,
}

/// Parse a favorite-first spread such as "BOS -5.5". The team must be one of
/// the game's two codes.
pub fn parse_spread(spread: &str, game: &Game) -> Option<SpreadLine> {
    let caps = SPREAD_RE.captures(spread)?;
    let team = caps.get(1)?.as_str();
    let line = caps.get(2)?.as_str().parse::<f64>().ok()?;

    // normalize the favorite to the game's own spelling of the code
    let underdog = game.opponent_of(team)?;
    let favorite = game.opponent_of(underdog)?;

    Some(SpreadLine {
        favorite: favorite.to_string(),
        underdog: underdog.to_string(),
        line,
    })
}

/// Parse an over/under line such as "220.5"
pub fn parse_total_line(ou: &str) -> Option<f64> {
    ou.trim()
        .parse::<f64>()
        .ok()
        .filter(|line| line.is_finite() && *line > 0.0)
}

fn resolve_moneyline(game: &Game) -> MoneylineResult {
    let margin = game.home_score.abs_diff(game.away_score);
    let winner = match game.home_score.cmp(&game.away_score) {
        std::cmp::Ordering::Greater => Some(game.home.clone()),
        std::cmp::Ordering::Less => Some(game.away.clone()),
        std::cmp::Ordering::Equal => None,
    };
    let winner_odds = winner
        .as_deref()
        .and_then(|team| game.moneyline_for(team))
        .and_then(|odds| odds.parse::<OddsValue>().ok());

    MoneylineResult {
        winner,
        margin,
        winner_odds,
    }
}

fn resolve_spread(game: &Game, moneyline: &MoneylineResult) -> SpreadResult {
    let spread_line = game
        .spread
        .as_deref()
        .and_then(|spread| parse_spread(spread, game));

    let Some(spread_line) = spread_line else {
        debug!(game_id = %game.id, spread = ?game.spread, "spread line not gradable");
        return SpreadResult::LineUnavailable {
            winner: moneyline.winner.clone(),
            margin: moneyline.margin,
        };
    };

    let favorite_score = game.score_for(&spread_line.favorite).unwrap_or_default() as i64;
    let underdog_score = game.score_for(&spread_line.underdog).unwrap_or_default() as i64;
    let actual_margin = favorite_score - underdog_score;
    let required_margin = spread_line.line.abs();

    let margin = actual_margin as f64;
    let (outcome, covering_team) = if margin > required_margin {
        (SpreadOutcome::FavoriteCovered, Some(spread_line.favorite.clone()))
    } else if margin < required_margin {
        (SpreadOutcome::UnderdogCovered, Some(spread_line.underdog.clone()))
    } else {
        (SpreadOutcome::Push, None)
    };

    SpreadResult::Graded {
        favorite: spread_line.favorite,
        underdog: spread_line.underdog,
        line: spread_line.line,
        required_margin,
        actual_margin,
        outcome,
        covering_team,
    }
}

fn resolve_total(game: &Game) -> TotalResult {
    let combined = game.combined_score();
    let Some(line) = game.ou.as_deref().and_then(parse_total_line) else {
        return TotalResult::LineUnavailable { combined };
    };

    let total = combined as f64;
    let outcome = if total > line {
        TotalOutcome::Over
    } else if total < line {
        TotalOutcome::Under
    } else {
        TotalOutcome::Push
    };

    TotalResult::Graded {
        combined,
        line,
        outcome,
    }
}

/// Resolve every market on a finished game. Returns `None` for games that
/// are not final. Not cached: the feed may correct a final score.
pub fn resolve_line_result(game: &Game) -> Option<LineResult> {
    if !game.is_final() {
        return None;
    }

    let moneyline = resolve_moneyline(game);
    let spread = resolve_spread(game, &moneyline);
    let total = resolve_total(game);

    Some(LineResult {
        game_id: game.id.clone(),
        moneyline,
        spread,
        total,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickGrade {
    Hit,
    Miss,
    Push,
}

/// Grade a best bet or total lean against a resolved game.
/// `None` when the pick can't be graded (no team/bet type, no lean, line
/// unavailable, or a player prop).
pub fn grade_pick(pick: &PickRecord, result: &LineResult) -> Option<PickGrade> {
    match pick.kind {
        PickKind::BestBet => {
            let team = pick.team.as_deref()?;
            match pick.bet_type? {
                BetType::Moneyline => {
                    let winner = result.moneyline.winner.as_deref()?;
                    Some(if winner.eq_ignore_ascii_case(team) {
                        PickGrade::Hit
                    } else {
                        PickGrade::Miss
                    })
                }
                BetType::Spread => match &result.spread {
                    SpreadResult::Graded {
                        favorite,
                        underdog,
                        outcome,
                        ..
                    } => {
                        let backed_favorite = if favorite.eq_ignore_ascii_case(team) {
                            true
                        } else if underdog.eq_ignore_ascii_case(team) {
                            false
                        } else {
                            return None;
                        };
                        Some(match (outcome, backed_favorite) {
                            (SpreadOutcome::Push, _) => PickGrade::Push,
                            (SpreadOutcome::FavoriteCovered, true)
                            | (SpreadOutcome::UnderdogCovered, false) => PickGrade::Hit,
                            _ => PickGrade::Miss,
                        })
                    }
                    SpreadResult::LineUnavailable { .. } => None,
                },
            }
        }
        PickKind::TotalLean => {
            let lean = Lean::from_text(&pick.text)?;
            match &result.total {
                TotalResult::Graded { outcome, .. } => Some(match (outcome, lean) {
                    (TotalOutcome::Push, _) => PickGrade::Push,
                    (TotalOutcome::Over, Lean::Over) | (TotalOutcome::Under, Lean::Under) => {
                        PickGrade::Hit
                    }
                    _ => PickGrade::Miss,
                }),
                TotalResult::LineUnavailable { .. } => None,
            }
        }
        PickKind::PlayerProp => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameStatus;

    fn final_game(home: &str, home_score: u32, away: &str, away_score: u32) -> Game {
        Game {
            id: format!("{}-{}", home.to_lowercase(), away.to_lowercase()),
            status: GameStatus::Final,
            home: home.to_string(),
            away: away.to_string(),
            home_name: home.to_string(),
            away_name: away.to_string(),
            home_score,
            away_score,
            quarter: None,
            clock: None,
            time: None,
            home_win_prob: None,
            away_win_prob: None,
            home_odds: None,
            away_odds: None,
            spread: None,
            ou: None,
        }
    }

    fn pick(kind: PickKind, text: &str, team: Option<&str>, bet_type: Option<BetType>) -> PickRecord {
        PickRecord {
            game_id: "det-nyk".to_string(),
            kind,
            text: text.to_string(),
            confidence: None,
            team: team.map(str::to_string),
            bet_type,
        }
    }

    #[test]
    fn test_favorite_covers() {
        let mut game = final_game("DET", 120, "NYK", 100);
        game.spread = Some("DET -16.5".to_string());
        let result = resolve_line_result(&game).unwrap();

        assert_eq!(result.moneyline.winner.as_deref(), Some("DET"));
        assert_eq!(result.moneyline.margin, 20);
        match result.spread {
            SpreadResult::Graded {
                actual_margin,
                required_margin,
                outcome,
                covering_team,
                ..
            } => {
                assert_eq!(actual_margin, 20);
                assert_eq!(required_margin, 16.5);
                assert_eq!(outcome, SpreadOutcome::FavoriteCovered);
                assert_eq!(covering_team.as_deref(), Some("DET"));
            }
            other => panic!("expected graded spread, got {:?}", other),
        }
    }

    #[test]
    fn test_underdog_covers_when_favorite_loses() {
        let mut game = final_game("CHA", 101, "HOU", 105);
        game.spread = Some("CHA -4".to_string());
        let result = resolve_line_result(&game).unwrap();
        match result.spread {
            SpreadResult::Graded {
                actual_margin,
                outcome,
                covering_team,
                ..
            } => {
                assert_eq!(actual_margin, -4);
                assert_eq!(outcome, SpreadOutcome::UnderdogCovered);
                assert_eq!(covering_team.as_deref(), Some("HOU"));
            }
            other => panic!("expected graded spread, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_margin_is_push() {
        for (line, home_score) in [("LAL -7", 111), ("lal -20", 124), ("LAL +3", 107)] {
            let mut game = final_game("LAL", home_score, "DAL", 104);
            game.spread = Some(line.to_string());
            let result = resolve_line_result(&game).unwrap();
            match result.spread {
                SpreadResult::Graded {
                    outcome,
                    covering_team,
                    ..
                } => {
                    assert_eq!(outcome, SpreadOutcome::Push, "{}", line);
                    assert_eq!(covering_team, None);
                }
                other => panic!("expected graded spread, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_unreadable_spread_keeps_margin() {
        for spread in [None, Some("PK"), Some("BOS -5.5"), Some("-5.5 DET")] {
            let mut game = final_game("DET", 98, "NYK", 110);
            game.spread = spread.map(str::to_string);
            let result = resolve_line_result(&game).unwrap();
            assert_eq!(
                result.spread,
                SpreadResult::LineUnavailable {
                    winner: Some("NYK".to_string()),
                    margin: 12
                }
            );
        }
    }

    #[test]
    fn test_parse_spread_normalizes_codes() {
        let game = final_game("GSW", 110, "BOS", 118);
        let line = parse_spread("bos -5.5", &game).unwrap();
        assert_eq!(line.favorite, "BOS");
        assert_eq!(line.underdog, "GSW");
        assert_eq!(line.line, -5.5);
        assert_eq!(parse_spread("LAL -5.5", &game), None);
    }

    #[test]
    fn test_huge_feed_scores_do_not_overflow() {
        let mut game = final_game("DET", u32::MAX, "NYK", 10);
        game.ou = Some("220.5".to_string());
        assert_eq!(game.combined_score(), u32::MAX);
        let result = resolve_line_result(&game).unwrap();
        assert!(matches!(
            result.total,
            TotalResult::Graded { outcome: TotalOutcome::Over, .. }
        ));
    }

    #[test]
    fn test_total_outcomes() {
        let mut game = final_game("LAL", 124, "DAL", 97);
        for (ou, expected) in [
            ("220.5", TotalOutcome::Over),
            ("221", TotalOutcome::Push),
            ("221.5", TotalOutcome::Under),
        ] {
            game.ou = Some(ou.to_string());
            let result = resolve_line_result(&game).unwrap();
            match result.total {
                TotalResult::Graded {
                    combined, outcome, ..
                } => {
                    assert_eq!(combined, 221);
                    assert_eq!(outcome, expected, "line {}", ou);
                }
                other => panic!("expected graded total, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_missing_total_is_unavailable() {
        let mut game = final_game("CLE", 112, "BKN", 84);
        assert_eq!(
            resolve_line_result(&game).unwrap().total,
            TotalResult::LineUnavailable { combined: 196 }
        );
        game.ou = Some("N/A".to_string());
        assert_eq!(
            resolve_line_result(&game).unwrap().total,
            TotalResult::LineUnavailable { combined: 196 }
        );
    }

    #[test]
    fn test_only_final_games_resolve() {
        let mut game = final_game("NYK", 88, "DET", 104);
        game.status = GameStatus::Live;
        assert!(resolve_line_result(&game).is_none());
    }

    #[test]
    fn test_winner_odds_from_moneyline() {
        let mut game = final_game("CLE", 112, "BKN", 84);
        game.home_odds = Some("-400".to_string());
        game.away_odds = Some("+310".to_string());
        let result = resolve_line_result(&game).unwrap();
        assert_eq!(result.moneyline.winner_odds.map(|o| o.value()), Some(-400.0));

        game.home_odds = Some("junk".to_string());
        let result = resolve_line_result(&game).unwrap();
        assert_eq!(result.moneyline.winner_odds, None);
    }

    #[test]
    fn test_grade_picks() {
        let mut game = final_game("DET", 120, "NYK", 100);
        game.spread = Some("DET -16.5".to_string());
        game.ou = Some("215.5".to_string());
        let result = resolve_line_result(&game).unwrap();

        let spread_fav = pick(PickKind::BestBet, "DET -16.5", Some("DET"), Some(BetType::Spread));
        let spread_dog = pick(PickKind::BestBet, "NYK +16.5", Some("NYK"), Some(BetType::Spread));
        let ml_dog = pick(PickKind::BestBet, "NYK ML", Some("NYK"), Some(BetType::Moneyline));
        let over = pick(PickKind::TotalLean, "OVER 215.5", None, None);
        let under = pick(PickKind::TotalLean, "Lean under", None, None);
        let vague = pick(PickKind::BestBet, "DET", Some("DET"), None);
        let prop = pick(PickKind::PlayerProp, "Cade OVER 25.5 PTS", None, None);

        assert_eq!(grade_pick(&spread_fav, &result), Some(PickGrade::Hit));
        assert_eq!(grade_pick(&spread_dog, &result), Some(PickGrade::Miss));
        assert_eq!(grade_pick(&ml_dog, &result), Some(PickGrade::Miss));
        assert_eq!(grade_pick(&over, &result), Some(PickGrade::Hit));
        assert_eq!(grade_pick(&under, &result), Some(PickGrade::Miss));
        assert_eq!(grade_pick(&vague, &result), None);
        assert_eq!(grade_pick(&prop, &result), None);
    }

    #[test]
    fn test_format() {
        let mut game = final_game("DET", 120, "NYK", 100);
        game.spread = Some("DET -16.5".to_string());
        game.ou = Some("220.5".to_string());
        game.home_odds = Some("-250".to_string());
        let result = resolve_line_result(&game).unwrap();
        assert_eq!(
            result.format(),
            "ML: DET by 20 (-250) | Spread: DET -16.5, DET covers (margin 20) | Total: UNDER (220 vs 220.5)"
        );
    }

    #[test]
    fn test_grade_push() {
        let mut game = final_game("LAL", 124, "DAL", 104);
        game.spread = Some("LAL -20".to_string());
        game.ou = Some("228".to_string());
        let result = resolve_line_result(&game).unwrap();

        let spread = pick(PickKind::BestBet, "LAL -20", Some("LAL"), Some(BetType::Spread));
        let total = pick(PickKind::TotalLean, "UNDER 228", None, None);
        assert_eq!(grade_pick(&spread, &result), Some(PickGrade::Push));
        assert_eq!(grade_pick(&total, &result), Some(PickGrade::Push));
    }
}
