use thiserror::Error;

/// Contract violations raised by the odds math.
///
/// Missing lines, unparsable commentary and similar gaps in upstream data are
/// not errors; those come back as `None` or an `Unavailable` variant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OddsError {
    #[error("invalid American odds: {0:?}")]
    InvalidOdds(String),

    #[error("a parlay needs at least 2 legs, got {0}")]
    InsufficientLegs(usize),
}
