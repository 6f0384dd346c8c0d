use crate::error::OddsError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A signed American odds quotation such as -110 or +150.
/// The magnitude is always at least 100 and the text form always carries
/// its sign.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OddsValue(f64);

impl OddsValue {
    pub fn new(odds: f64) -> Result<Self, OddsError> {
        if !odds.is_finite() || odds.abs() < 100.0 {
            return Err(OddsError::InvalidOdds(odds.to_string()));
        }
        Ok(Self(odds))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn to_decimal(&self) -> f64 {
        american_to_decimal(*self)
    }
}

impl FromStr for OddsValue {
    type Err = OddsError;

    /// Accepts "+150" and "-110"; an unsigned "150" is rejected
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !trimmed.starts_with(['+', '-']) {
            return Err(OddsError::InvalidOdds(s.to_string()));
        }
        let odds = trimmed
            .parse::<f64>()
            .map_err(|_| OddsError::InvalidOdds(s.to_string()))?;
        OddsValue::new(odds).map_err(|_| OddsError::InvalidOdds(s.to_string()))
    }
}

impl TryFrom<String> for OddsValue {
    type Error = OddsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<OddsValue> for String {
    fn from(odds: OddsValue) -> Self {
        odds.to_string()
    }
}

impl fmt::Display for OddsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

/// Exact decimal for an `f64`, read from its shortest round-trip text
/// ("1.005", not 1.00499999999999989...). `None` when out of range.
fn exact(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    value.to_string().parse().ok()
}

fn round_decimal(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Round half-up to `places` decimals (half away from zero for negatives).
/// Values outside `Decimal` range come back unchanged.
pub(crate) fn round_to(value: f64, places: u32) -> f64 {
    exact(value)
        .and_then(|d| round_decimal(d, places).to_f64())
        .unwrap_or(value)
}

/// Currency rounding (cents)
pub fn round_money(value: f64) -> f64 {
    round_to(value, 2)
}

/// Percentage rounding (one decimal)
pub fn round_pct(value: f64) -> f64 {
    round_to(value, 1)
}

/// Convert American odds to decimal odds (always >= 1.0)
/// Positive odds (+150) pay 150 on a 100 stake: 2.50
/// Negative odds (-110) need 110 staked to win 100: 1.909
pub fn american_to_decimal(odds: OddsValue) -> f64 {
    let odds = odds.value();
    if odds >= 100.0 {
        odds / 100.0 + 1.0
    } else {
        100.0 / odds.abs() + 1.0
    }
}

/// Decimal odds computed in base 10, so payouts round on true cent values
fn exact_decimal_odds(odds: OddsValue) -> Option<Decimal> {
    let odds = exact(odds.value())?;
    if odds.is_sign_positive() {
        Some(odds / Decimal::ONE_HUNDRED + Decimal::ONE)
    } else {
        Some(Decimal::ONE_HUNDRED / odds.abs() + Decimal::ONE)
    }
}

/// Convert decimal odds back to American, rounded to cents.
/// Decimal odds must be greater than 1.0.
pub fn decimal_to_american(decimal: f64) -> f64 {
    if decimal >= 2.0 {
        round_money((decimal - 1.0) * 100.0)
    } else {
        -round_money(100.0 / (decimal - 1.0))
    }
}

/// Convert American odds to implied probability (0..1)
pub fn american_odds_to_probability(odds: OddsValue) -> f64 {
    let odds = odds.value();
    if odds > 0.0 {
        // For positive odds: 100 / (odds + 100)
        100.0 / (odds + 100.0)
    } else {
        // For negative odds: |odds| / (|odds| + 100)
        let abs_odds = odds.abs();
        abs_odds / (abs_odds + 100.0)
    }
}

/// Format American odds for display, e.g. "+377" or "-250"
pub fn format_american(odds: f64) -> String {
    format!("{:+.0}", odds)
}

/// Payout for a single stake, in dollars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub stake: f64,
    /// Total returned on a win, stake included
    pub payout: f64,
    pub profit: f64,
}

impl Payout {
    fn at_decimal(decimal: Decimal, stake: f64) -> Option<Self> {
        if !stake.is_finite() || stake <= 0.0 {
            return None;
        }
        let stake_exact = exact(stake)?;
        let total = decimal.checked_mul(stake_exact)?;
        Some(Self {
            stake,
            payout: round_decimal(total, 2).to_f64()?,
            profit: round_decimal(total - stake_exact, 2).to_f64()?,
        })
    }
}

/// Payout for `stake` at `odds`. `None` when the stake is zero, negative or
/// not a number, so callers can show a placeholder.
pub fn payout(odds: OddsValue, stake: f64) -> Option<Payout> {
    Payout::at_decimal(exact_decimal_odds(odds)?, stake)
}

/// Payout from raw user input. Bad odds are an error; a bad stake is just
/// "unavailable".
pub fn payout_from_input(odds: &str, stake: &str) -> Result<Option<Payout>, OddsError> {
    let odds: OddsValue = odds.parse()?;
    Ok(stake
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|stake| payout(odds, stake)))
}

/// Combined odds for a multi-leg parlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParlayQuote {
    pub legs: Vec<OddsValue>,
    /// Product of leg decimal odds, unrounded
    pub combined_decimal: f64,
    /// Combined American odds, rounded to cents
    pub combined_american: f64,
    /// Implied win probability in percent, one decimal
    pub implied_probability: f64,
    pub payout: Option<Payout>,
}

impl ParlayQuote {
    /// Attach the payout for `stake` (unavailable for a non-positive stake)
    pub fn with_stake(mut self, stake: f64) -> Self {
        let mut decimals: Option<Vec<Decimal>> =
            self.legs.iter().map(|leg| exact_decimal_odds(*leg)).collect();
        let combined = decimals.as_mut().and_then(|decimals| {
            decimals.sort();
            decimals
                .iter()
                .try_fold(Decimal::ONE, |acc, d| acc.checked_mul(*d))
        });
        self.payout = combined.and_then(|decimal| Payout::at_decimal(decimal, stake));
        self
    }

    pub fn american_display(&self) -> String {
        format_american(self.combined_american)
    }
}

/// Combine parlay legs by multiplying their decimal odds
pub fn combine_parlay(legs: &[OddsValue]) -> Result<ParlayQuote, OddsError> {
    if legs.len() < 2 {
        return Err(OddsError::InsufficientLegs(legs.len()));
    }

    // Multiply in sorted order so every permutation of the legs gives the
    // same bits.
    let mut decimals: Vec<f64> = legs.iter().map(|leg| leg.to_decimal()).collect();
    decimals.sort_by(|a, b| a.total_cmp(b));
    let combined_decimal = decimals.iter().product::<f64>();

    Ok(ParlayQuote {
        legs: legs.to_vec(),
        combined_decimal,
        combined_american: decimal_to_american(combined_decimal),
        implied_probability: round_pct(100.0 / combined_decimal),
        payout: None,
    })
}

/// Parse every leg, failing on the first invalid one
pub fn parse_legs<S: AsRef<str>>(legs: &[S]) -> Result<Vec<OddsValue>, OddsError> {
    legs.iter().map(|leg| leg.as_ref().parse()).collect()
}
