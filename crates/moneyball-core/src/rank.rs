// Ordinal rank of one value within a league population.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::RankError;

/// Ordinal position within a population: 1 is always the best.
pub type Rank = usize;

/// Category label used in `ValueNotFound` when the engine is called directly.
const UNNAMED_METRIC: &str = "metric";

/// Which end of the sorted population holds rank 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankDirection {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

impl RankDirection {
    /// Ordering that places the better of two values first.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            RankDirection::HigherIsBetter => b.total_cmp(&a),
            RankDirection::LowerIsBetter => a.total_cmp(&b),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RankDirection::HigherIsBetter => "higher is better",
            RankDirection::LowerIsBetter => "lower is better",
        }
    }
}

/// Rank `value` within `population`.
///
/// The population is sorted best-first for `direction` and the rank is one
/// plus the index of the first element equal to `value`. Tied values all
/// receive the best rank of the tie group: `[5, 3, 3, 1]` ranks both 3s at 2
/// when higher is better, and the 1 at 4.
///
/// `population` must contain `value` itself (the ranked team is a member of
/// its league). Equality is exact, so a derived value must be computed the
/// same way for the lookup and for the population or the call fails with
/// [`RankError::ValueNotFound`]. NaN must be filtered or normalized by the
/// caller.
pub fn rank(
    value: f64,
    population: &[f64],
    direction: RankDirection,
) -> Result<Rank, RankError> {
    let mut sorted = population.to_vec();
    sorted.sort_by(|a, b| direction.compare(*a, *b));

    sorted
        .iter()
        .position(|v| *v == value)
        .map(|index| index + 1)
        .ok_or_else(|| RankError::ValueNotFound {
            category: UNNAMED_METRIC.to_string(),
            value,
        })
}

/// Rank a derived value that may be undefined (`None`, e.g. a ratio whose
/// denominator was zero).
///
/// Undefined values sort after every defined value in either direction.
/// Defined values are ranked among the defined part of the population, and
/// every undefined value shares rank `1 + number of defined values`.
pub fn rank_derived(
    value: Option<f64>,
    population: &[Option<f64>],
    direction: RankDirection,
) -> Result<Rank, RankError> {
    let defined: Vec<f64> = population.iter().flatten().copied().collect();

    match value {
        Some(v) => rank(v, &defined, direction),
        None if defined.len() < population.len() => Ok(defined.len() + 1),
        None => Err(RankError::ValueNotFound {
            category: UNNAMED_METRIC.to_string(),
            value: f64::NAN,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
