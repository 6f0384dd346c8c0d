use crate::models::{BetType, Game, GameAnalysis, Lean, PickKind, PickRecord, PropPick};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::debug;

lazy_static! {
    // "(1) ... (2) ... (3) ..."
    static ref PAREN_MARKER_RE: Regex = Regex::new(r"\(([123])\)").unwrap();
    // "1. ..." / "2) ..." at the start of a line, optionally bolded
    static ref LIST_MARKER_RE: Regex =
        Regex::new(r"(?m)^[ \t*]*([123])[.)]\**(?:[ \t]+|$)").unwrap();
    // "Best Bet:", "O/U:", "Total:", "Player Prop:" in any case
    static ref HEADER_RE: Regex =
        Regex::new(r"(?i)(best[ \t]+bet|o/u|total|player[ \t]+props?)[ \t*]*:").unwrap();
    // "<Name> OVER|UNDER <line> <stat> (<odds>)? — <rationale>"
    static ref PROP_LINE_RE: Regex = Regex::new(
        r"(?i)^(?P<name>.+?)\s+(?P<side>over|under)\s+(?P<line>\d+(?:\.\d+)?)\s+(?P<stat>.+?)\s*(?:\((?P<odds>[+-]\d+)\))?\s+[—–-]+\s+(?P<reason>.+?)$"
    ).unwrap();
    // signed number not glued to a word ("top-10" is not a line)
    static ref SIGNED_NUMBER_RE: Regex = Regex::new(r"(?:^|[\s(])[+-](\d+(?:\.\d+)?)").unwrap();
}

const PAREN_LAYOUT: [(usize, &str); 3] = [(0, "(1)"), (1, "(2)"), (2, "(3)")];

// each field in turn placed last
const HEADER_LAYOUTS: [[(usize, &str); 3]; 3] = [
    [(0, "Best Bet:"), (1, "O/U:"), (2, "Player Prop:")],
    [(0, "Best Bet:"), (2, "Player Prop:"), (1, "O/U:")],
    [(1, "O/U:"), (2, "Player Prop:"), (0, "Best Bet:")],
];

/// Best-effort fields pulled out of generated commentary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPicks {
    pub best_bet: Option<String>,
    pub total_lean: Option<String>,
    pub player_prop: Option<String>,
}

impl ParsedPicks {
    pub fn is_empty(&self) -> bool {
        self.best_bet.is_none() && self.total_lean.is_none() && self.player_prop.is_none()
    }

    /// Serialize to text that parses back to the same picks.
    ///
    /// Numbered parentheticals are preferred. A field that carries a stray
    /// `(n)` marker of its own would be split by that format, so labeled
    /// headers are used instead, with the marked field last.
    pub fn to_text(&self) -> String {
        let numbered = self.render(PAREN_LAYOUT);
        if parse_pick_text(&numbered) == *self {
            return numbered;
        }
        HEADER_LAYOUTS
            .iter()
            .map(|layout| self.render(*layout))
            .find(|text| parse_pick_text(text) == *self)
            .unwrap_or(numbered)
    }

    fn render(&self, layout: [(usize, &str); 3]) -> String {
        let fields = [&self.best_bet, &self.total_lean, &self.player_prop];
        layout
            .iter()
            .filter_map(|(i, label)| {
                fields[*i]
                    .as_ref()
                    .map(|text| format!("{} {}", label, text))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn set(&mut self, kind: PickKind, text: String) {
        let slot = match kind {
            PickKind::BestBet => &mut self.best_bet,
            PickKind::TotalLean => &mut self.total_lean,
            PickKind::PlayerProp => &mut self.player_prop,
        };
        // first occurrence of a marker wins
        if slot.is_none() {
            *slot = Some(text);
        }
    }
}

/// Strip markdown emphasis and surrounding whitespace
fn clean_segment(segment: &str) -> String {
    segment.replace('*', "").trim().to_string()
}

fn numbered_kind(caps: &Captures) -> Option<PickKind> {
    match caps.get(1)?.as_str() {
        "1" => Some(PickKind::BestBet),
        "2" => Some(PickKind::TotalLean),
        "3" => Some(PickKind::PlayerProp),
        _ => None,
    }
}

fn header_kind(caps: &Captures) -> Option<PickKind> {
    let header = caps.get(1)?.as_str().to_lowercase();
    let header = header.split_whitespace().collect::<Vec<_>>().join(" ");
    match header.as_str() {
        "best bet" => Some(PickKind::BestBet),
        "o/u" | "total" => Some(PickKind::TotalLean),
        "player prop" | "player props" => Some(PickKind::PlayerProp),
        _ => None,
    }
}

/// Split `text` at every marker matched by `re`; each segment runs to the
/// next marker or the end of the text.
fn extract_segments(
    text: &str,
    re: &Regex,
    kind_of: impl Fn(&Captures) -> Option<PickKind>,
) -> ParsedPicks {
    let markers: Vec<(Option<PickKind>, usize, usize)> = re
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((kind_of(&caps), whole.start(), whole.end()))
        })
        .collect();

    let mut picks = ParsedPicks::default();
    for (i, (kind, _, body_start)) in markers.iter().enumerate() {
        let body_end = markers.get(i + 1).map_or(text.len(), |(_, start, _)| *start);
        let Some(kind) = kind else { continue };
        let segment = clean_segment(&text[*body_start..body_end]);
        if !segment.is_empty() {
            picks.set(*kind, segment);
        }
    }
    picks
}

/// Pull best bet / total lean / player prop out of free-form analysis.
///
/// Grammars are tried in order and the first that yields any field wins:
/// numbered parentheticals `(1)`, a numbered list `1.` / `1)`, then labeled
/// headers (`Best Bet:`, `O/U:` or `Total:`, `Player Prop:`). If nothing
/// matches, the whole text becomes the best bet. Non-blank input never comes
/// back empty.
pub fn parse_pick_text(text: &str) -> ParsedPicks {
    if text.trim().is_empty() {
        return ParsedPicks::default();
    }

    let grammars: [(&str, &Regex, fn(&Captures) -> Option<PickKind>); 3] = [
        ("parenthetical", &*PAREN_MARKER_RE, numbered_kind),
        ("numbered list", &*LIST_MARKER_RE, numbered_kind),
        ("labeled headers", &*HEADER_RE, header_kind),
    ];
    for (name, re, kind_of) in grammars {
        let picks = extract_segments(text, re, kind_of);
        if !picks.is_empty() {
            debug!(grammar = name, "parsed analysis text");
            return picks;
        }
    }

    debug!("no pick grammar matched, using whole text as best bet");
    let cleaned = clean_segment(text);
    ParsedPicks {
        best_bet: Some(if cleaned.is_empty() {
            text.trim().to_string()
        } else {
            cleaned
        }),
        total_lean: None,
        player_prop: None,
    }
}

const STAT_SYNONYMS: &[(&str, &str)] = &[
    ("points", "PTS"),
    ("point", "PTS"),
    ("pts", "PTS"),
    ("rebounds", "REB"),
    ("rebound", "REB"),
    ("reb", "REB"),
    ("boards", "REB"),
    ("assists", "AST"),
    ("assist", "AST"),
    ("ast", "AST"),
    ("three-pointers made", "3PM"),
    ("three pointers made", "3PM"),
    ("three-pointers", "3PM"),
    ("threes made", "3PM"),
    ("threes", "3PM"),
    ("3-pointers made", "3PM"),
    ("3-pointers", "3PM"),
    ("3pt made", "3PM"),
    ("3pm", "3PM"),
    ("steals", "STL"),
    ("stl", "STL"),
    ("blocks", "BLK"),
    ("blk", "BLK"),
    ("turnovers", "TO"),
    ("points+rebounds+assists", "PRA"),
    ("pts+reb+ast", "PRA"),
    ("pra", "PRA"),
    ("points+rebounds", "PR"),
    ("pts+reb", "PR"),
    ("points+assists", "PA"),
    ("pts+ast", "PA"),
    ("rebounds+assists", "RA"),
    ("reb+ast", "RA"),
];

/// Map a stat phrase to its short name ("three-pointers made" -> "3PM").
/// Unknown phrases are upper-cased as-is.
pub fn normalize_stat(phrase: &str) -> String {
    let key = phrase
        .trim()
        .trim_end_matches('.')
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" + ", "+")
        .replace("+ ", "+")
        .replace(" +", "+");

    STAT_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == key)
        .map(|(_, short)| short.to_string())
        .unwrap_or_else(|| key.to_uppercase())
}

/// Parse one prop sentence such as
/// `Stephen Curry UNDER 4.5 three-pointers made (-115) — BOS limits 3PA`.
/// Returns `None` when the sentence doesn't have that shape.
pub fn parse_prop_line(sentence: &str) -> Option<PropPick> {
    let sentence = sentence.replace('*', "");
    let sentence = sentence.trim().trim_start_matches(['-', '•']).trim();
    let caps = PROP_LINE_RE.captures(sentence)?;

    let side = if caps["side"].eq_ignore_ascii_case("over") {
        Lean::Over
    } else {
        Lean::Under
    };
    let line = caps["line"].parse::<f64>().ok()?;
    let odds = caps
        .name("odds")
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .filter(|odds| odds.abs() >= 100);

    Some(PropPick {
        player: caps["name"].trim().to_string(),
        team: None,
        game: None,
        stat: normalize_stat(&caps["stat"]),
        line,
        side,
        odds,
        edge: None,
        reason: caps["reason"].trim().to_string(),
    })
}

/// Byte offset of `needle` in `haystack` as a whole word, case-insensitive
fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let haystack = haystack.to_lowercase();
    let needle = needle.to_lowercase();
    haystack.match_indices(&needle).map(|(i, _)| i).find(|&i| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// The team a best bet backs: whichever of the game's codes or names is
/// mentioned first.
pub fn infer_bet_team(text: &str, game: &Game) -> Option<String> {
    let home = [find_word(text, &game.home), find_word(text, &game.home_name)]
        .into_iter()
        .flatten()
        .min();
    let away = [find_word(text, &game.away), find_word(text, &game.away_name)]
        .into_iter()
        .flatten()
        .min();

    match (home, away) {
        (Some(h), Some(a)) if a < h => Some(game.away.clone()),
        (Some(_), _) => Some(game.home.clone()),
        (None, Some(_)) => Some(game.away.clone()),
        (None, None) => None,
    }
}

/// Moneyline if the text says ML/moneyline; spread if it says ATS/spread or
/// carries a signed point number (anything under 100 is not a price).
pub fn infer_bet_type(text: &str) -> Option<BetType> {
    if find_word(text, "ml").is_some() || find_word(text, "moneyline").is_some() {
        return Some(BetType::Moneyline);
    }
    if find_word(text, "ats").is_some() || find_word(text, "spread").is_some() {
        return Some(BetType::Spread);
    }
    let has_points = SIGNED_NUMBER_RE
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .any(|points| points < 100.0);
    has_points.then_some(BetType::Spread)
}

/// Turn one game's analysis into pick records. Structured fields from the
/// generator are used as-is; otherwise the free text is parsed.
pub fn picks_from_analysis(analysis: &GameAnalysis, game: Option<&Game>) -> Vec<PickRecord> {
    let parsed = if analysis.has_structured_fields() {
        ParsedPicks {
            best_bet: analysis.best_bet.clone(),
            total_lean: analysis.ou.clone(),
            player_prop: analysis.props.clone(),
        }
    } else {
        parse_pick_text(analysis.text.as_deref().unwrap_or_default())
    };

    let mut picks = Vec::new();
    if let Some(text) = parsed.best_bet {
        let team = analysis
            .bet_team
            .clone()
            .or_else(|| game.and_then(|g| infer_bet_team(&text, g)));
        let bet_type = analysis.bet_type.or_else(|| infer_bet_type(&text));
        picks.push(PickRecord {
            game_id: analysis.game_id.clone(),
            kind: PickKind::BestBet,
            text,
            confidence: analysis.confidence,
            team,
            bet_type,
        });
    }
    if let Some(text) = parsed.total_lean {
        picks.push(PickRecord {
            game_id: analysis.game_id.clone(),
            kind: PickKind::TotalLean,
            text,
            confidence: analysis.ou_confidence,
            team: None,
            bet_type: None,
        });
    }
    if let Some(text) = parsed.player_prop {
        picks.push(PickRecord {
            game_id: analysis.game_id.clone(),
            kind: PickKind::PlayerProp,
            text,
            confidence: None,
            team: None,
            bet_type: None,
        });
    }
    picks
}
