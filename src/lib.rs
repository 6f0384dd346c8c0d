pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod utils;

pub use error::*;
pub use models::*;
pub use utils::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utils::line_results::{grade_pick, resolve_line_result, LineResult, PickGrade};
use utils::live_pace::{project_pace, PacePrediction};
use utils::pick_parser::picks_from_analysis;
use utils::pick_ranker::{prop_leaderboard, top_picks};

/// A pick plus its grade once the game is final
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedPick {
    #[serde(flatten)]
    pub pick: PickRecord,
    pub grade: Option<PickGrade>,
}

/// One game with everything derived from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameCard {
    pub game: Game,
    /// Final games only
    pub result: Option<LineResult>,
    /// Live games with a total and at least a minute played
    pub pace: Option<PacePrediction>,
    pub picks: Vec<GradedPick>,
}

/// All the data we want to display on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub generated_at: Option<DateTime<Utc>>,
    pub games: Vec<GameCard>,
    pub top_picks: Vec<PickRecord>,
    pub prop_leaderboard: Vec<PropPick>,
}

/// Every pick the snapshot's analyses produce, in analysis order.
/// Analyses for unknown games still yield picks, without team inference.
pub fn collect_picks(snapshot: &Snapshot) -> Vec<PickRecord> {
    snapshot
        .analyses
        .iter()
        .flat_map(|analysis| picks_from_analysis(analysis, snapshot.game(&analysis.game_id)))
        .collect()
}

/// Derive results, paces, graded picks and rankings from a snapshot.
/// Pure: call it again whenever the snapshot changes.
pub fn build_dashboard(snapshot: &Snapshot, top_n: usize, leaderboard_size: usize) -> Dashboard {
    let picks = collect_picks(snapshot);

    let games = snapshot
        .games
        .iter()
        .map(|game| {
            let result = resolve_line_result(game);
            let pace = project_pace(game);
            let picks = picks
                .iter()
                .filter(|pick| pick.game_id == game.id)
                .map(|pick| GradedPick {
                    pick: pick.clone(),
                    grade: result.as_ref().and_then(|r| grade_pick(pick, r)),
                })
                .collect();
            GameCard {
                game: game.clone(),
                result,
                pace,
                picks,
            }
        })
        .collect();

    Dashboard {
        generated_at: snapshot.generated_at,
        games,
        top_picks: top_picks(&snapshot.games, &picks, top_n),
        prop_leaderboard: prop_leaderboard(&snapshot.props, leaderboard_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        serde_json::from_str(
            r#"{
            "games": [
                {"id":"nyk-det","status":"live","quarter":4,"clock":"7:21","home":"NYK","away":"DET",
                 "homeName":"Knicks","awayName":"Pistons","homeScore":88,"awayScore":104,"ou":"218.5"},
                {"id":"lal-dal","status":"final","home":"LAL","away":"DAL","homeName":"Lakers",
                 "awayName":"Mavericks","homeScore":124,"awayScore":104,"spread":"LAL -6.5","ou":"229.5"},
                {"id":"gsw-bos","status":"upcoming","home":"GSW","away":"BOS","homeName":"Warriors",
                 "awayName":"Celtics","spread":"BOS -5.5","ou":"224.5"}
            ],
            "analyses": [
                {"gameId":"lal-dal","text":"(1) LAL -6.5 (2) UNDER 229.5","confidence":90,"ouConfidence":88},
                {"gameId":"gsw-bos","text":"Best Bet: Celtics -5.5\nO/U: OVER 224.5","confidence":71,"ouConfidence":64},
                {"gameId":"nyk-det","bestBet":"DET ML","betTeam":"DET","betType":"moneyline","confidence":80}
            ],
            "props": [
                {"player":"Jayson Tatum","prop":"Points","line":27.5,"rec":"OVER","conf":72},
                {"player":"Stephen Curry","prop":"3PM","line":4.5,"rec":"UNDER","conf":61}
            ]
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_build_dashboard() {
        let dashboard = build_dashboard(&snapshot(), 3, 10);
        assert_eq!(dashboard.games.len(), 3);

        let live = &dashboard.games[0];
        assert!(live.result.is_none());
        assert!(live.pace.is_some());

        let finished = &dashboard.games[1];
        assert!(finished.pace.is_none());
        let grades: Vec<Option<PickGrade>> = finished.picks.iter().map(|p| p.grade).collect();
        assert_eq!(grades, vec![Some(PickGrade::Hit), Some(PickGrade::Hit)]);

        let upcoming = &dashboard.games[2];
        assert_eq!(upcoming.picks[0].pick.team.as_deref(), Some("BOS"));
        assert_eq!(upcoming.picks[0].grade, None);

        // final game picks are excluded even with the highest confidence
        let top: Vec<&str> = dashboard.top_picks.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(top, vec!["DET ML", "Celtics -5.5", "OVER 224.5"]);

        assert_eq!(dashboard.prop_leaderboard[0].player, "Jayson Tatum");
    }

    #[test]
    fn test_orphan_analysis_keeps_its_picks() {
        let mut snapshot = snapshot();
        snapshot.analyses.push(GameAnalysis {
            game_id: "mia-phi".to_string(),
            text: Some("(1) MIA -2 (2) UNDER 210".to_string()),
            confidence: Some(99.0),
            ..Default::default()
        });
        let picks = collect_picks(&snapshot);
        let orphan: Vec<&PickRecord> = picks.iter().filter(|p| p.game_id == "mia-phi").collect();
        assert_eq!(orphan.len(), 2);
        assert_eq!(orphan[0].team, None);

        // no game, so never a top pick
        let dashboard = build_dashboard(&snapshot, 3, 10);
        assert!(dashboard.top_picks.iter().all(|p| p.game_id != "mia-phi"));
    }

    #[test]
    fn test_dashboard_is_repeatable() {
        let snapshot = snapshot();
        let first = serde_json::to_string(&build_dashboard(&snapshot, 3, 10)).unwrap();
        let second = serde_json::to_string(&build_dashboard(&snapshot, 3, 10)).unwrap();
        assert_eq!(first, second);
    }
}
