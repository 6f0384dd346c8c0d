use nba_edge::data::load_snapshot;
use nba_edge::line_results::{PickGrade, SpreadOutcome, SpreadResult, TotalOutcome, TotalResult};
use nba_edge::{build_dashboard, Dashboard, GameCard, PickKind};

fn dashboard() -> Dashboard {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/snapshot.json");
    let snapshot = load_snapshot(path).unwrap();
    build_dashboard(&snapshot, 3, 10)
}

fn card<'a>(dashboard: &'a Dashboard, id: &str) -> &'a GameCard {
    dashboard.games.iter().find(|c| c.game.id == id).unwrap()
}

fn grades(card: &GameCard) -> Vec<(PickKind, Option<PickGrade>)> {
    card.picks.iter().map(|p| (p.pick.kind, p.grade)).collect()
}

#[test]
fn test_every_game_is_carried() {
    let dashboard = dashboard();
    assert_eq!(dashboard.games.len(), 9);
    assert!(dashboard.generated_at.is_some());

    let live = dashboard.games.iter().filter(|c| c.pace.is_some()).count();
    let resolved = dashboard.games.iter().filter(|c| c.result.is_some()).count();
    assert_eq!(live, 3);
    assert_eq!(resolved, 3);
}

#[test]
fn test_live_pace() {
    let dashboard = dashboard();

    let pace = card(&dashboard, "nyk-det").pace.as_ref().unwrap();
    assert_eq!(pace.combined_score, 192);
    assert_eq!(pace.projected_total, 226.7);
    assert_eq!(pace.line, 218.5);

    let pace = card(&dashboard, "chi-tor").pace.as_ref().unwrap();
    assert_eq!(pace.projected_total, 214.7);

    let pace = card(&dashboard, "sas-phx").pace.as_ref().unwrap();
    assert_eq!(pace.elapsed_minutes, 24.0);
    assert_eq!(pace.projected_total, 220.0);
    assert_eq!(pace.projected_margin, -1.5);
}

#[test]
fn test_final_results_and_grades() {
    let dashboard = dashboard();

    let cle = card(&dashboard, "cle-bkn");
    let result = cle.result.as_ref().unwrap();
    assert_eq!(result.moneyline.winner.as_deref(), Some("CLE"));
    assert_eq!(result.moneyline.margin, 28);
    assert_eq!(
        grades(cle),
        vec![
            (PickKind::BestBet, Some(PickGrade::Hit)),
            (PickKind::TotalLean, Some(PickGrade::Hit)),
        ]
    );

    let hou = card(&dashboard, "cha-hou");
    match &hou.result.as_ref().unwrap().spread {
        SpreadResult::Graded { outcome, .. } => assert_eq!(*outcome, SpreadOutcome::Push),
        other => panic!("expected a graded spread, got {:?}", other),
    }
    assert_eq!(
        grades(hou),
        vec![
            (PickKind::BestBet, Some(PickGrade::Push)),
            (PickKind::TotalLean, Some(PickGrade::Miss)),
        ]
    );

    let lal = card(&dashboard, "lal-dal").result.as_ref().unwrap();
    match &lal.total {
        TotalResult::Graded { combined, outcome, .. } => {
            assert_eq!(*combined, 228);
            assert_eq!(*outcome, TotalOutcome::Under);
        }
        other => panic!("expected a graded total, got {:?}", other),
    }
}

#[test]
fn test_top_picks_skip_final_games() {
    let dashboard = dashboard();
    let top: Vec<(&str, &str)> = dashboard
        .top_picks
        .iter()
        .map(|p| (p.game_id.as_str(), p.text.as_str()))
        .collect();
    assert_eq!(
        top,
        vec![
            ("lac-den", "DEN ML"),
            ("gsw-bos", "Celtics -5.5"),
            ("sac-orl", "ORL -7"),
        ]
    );
    assert_eq!(dashboard.top_picks[1].team.as_deref(), Some("BOS"));
}

#[test]
fn test_prop_leaderboard() {
    let dashboard = dashboard();
    let players: Vec<&str> = dashboard
        .prop_leaderboard
        .iter()
        .map(|p| p.player.as_str())
        .collect();
    assert_eq!(
        players,
        vec![
            "Paolo Banchero",
            "Jayson Tatum",
            "Nikola Jokić",
            "Alperen Şengün",
            "Stephen Curry",
        ]
    );
}

#[test]
fn test_standings_load_with_snapshot() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/snapshot.json");
    let snapshot = load_snapshot(path).unwrap();
    assert_eq!(snapshot.standings.east.len(), 8);
    assert_eq!(snapshot.standings.west[0].abbr, "OKC");
    assert_eq!(snapshot.standings.west[0].pct, ".750");
}
