use crate::models::{Game, PickKind, PickRecord, PropPick};
use std::cmp::Ordering;

/// Size of the "top picks" view
pub const TOP_PICKS: usize = 3;

/// Anything that can be ordered by an externally supplied score
pub trait Ranked {
    fn rank_score(&self) -> Option<f64>;
}

impl Ranked for PickRecord {
    fn rank_score(&self) -> Option<f64> {
        self.confidence
    }
}

impl Ranked for PropPick {
    fn rank_score(&self) -> Option<f64> {
        self.edge
    }
}

/// Keep scored items, sort by score (descending) and take the top N.
/// Ties keep input order, so identical input always ranks identically.
pub fn rank_top<T: Ranked + Clone>(items: &[T], top_n: usize) -> Vec<T> {
    let mut scored: Vec<(f64, &T)> = items
        .iter()
        .filter_map(|item| {
            item.rank_score()
                .filter(|score| score.is_finite())
                .map(|score| (score, item))
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    scored
        .into_iter()
        .take(top_n)
        .map(|(_, item)| item.clone())
        .collect()
}

/// Best bets and total leans on games that haven't finished, ranked by
/// confidence. Input order is game order, then pick order within a game.
pub fn top_picks(games: &[Game], picks: &[PickRecord], top_n: usize) -> Vec<PickRecord> {
    let candidates: Vec<PickRecord> = games
        .iter()
        .filter(|game| !game.is_final())
        .flat_map(|game| {
            picks.iter().filter(move |pick| {
                pick.game_id == game.id
                    && matches!(pick.kind, PickKind::BestBet | PickKind::TotalLean)
            })
        })
        .cloned()
        .collect();

    rank_top(&candidates, top_n)
}

/// Player props ranked by edge score
pub fn prop_leaderboard(props: &[PropPick], top_n: usize) -> Vec<PropPick> {
    rank_top(props, top_n)
}
