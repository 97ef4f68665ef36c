// Chart input contracts: what a radar or bar renderer receives.
//
// Drawing is left to the caller; these types only guarantee a drawable shape.

use std::f64::consts::TAU;

use serde::Serialize;

use crate::aggregate::RankBreakdown;
use crate::domain::CategorySpec;
use crate::error::{RankError, MIN_CATEGORIES};
use crate::rank::{Rank, RankDirection};
use crate::table::StatTable;

// ---------------------------------------------------------------------------
// Radar
// ---------------------------------------------------------------------------

/// One spoke per category, ranks as radii.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSeries {
    pub title: String,
    pub labels: Vec<String>,
    pub ranks: Vec<Rank>,
    /// Outer ring of the radar: the number of teams ranked.
    pub max_rank: Rank,
}

impl RadarSeries {
    pub fn new(
        title: impl Into<String>,
        labels: Vec<String>,
        ranks: Vec<Rank>,
        max_rank: Rank,
    ) -> Result<Self, RankError> {
        if labels.len() < MIN_CATEGORIES || ranks.len() < MIN_CATEGORIES {
            return Err(RankError::InsufficientCategories {
                found: labels.len().min(ranks.len()),
                required: MIN_CATEGORIES,
            });
        }
        if labels.len() != ranks.len() {
            return Err(RankError::MismatchedSeries {
                names: labels.len(),
                ranks: ranks.len(),
            });
        }
        Ok(Self {
            title: title.into(),
            labels,
            ranks,
            max_rank,
        })
    }

    pub fn from_breakdown(breakdown: &RankBreakdown) -> Result<Self, RankError> {
        Self::new(
            breakdown.domain.radar_title(),
            breakdown.categories.iter().map(|c| c.name.clone()).collect(),
            breakdown.category_ranks(),
            breakdown.league_size,
        )
    }

    /// Spoke angles in radians, evenly spaced from zero.
    pub fn angles(&self) -> Vec<f64> {
        let n = self.labels.len() as f64;
        (0..self.labels.len()).map(|i| i as f64 / n * TAU).collect()
    }

    /// Ranks with the first repeated at the end so the polygon closes.
    pub fn closed_ranks(&self) -> Vec<Rank> {
        let mut closed = self.ranks.clone();
        if let Some(first) = self.ranks.first() {
            closed.push(*first);
        }
        closed
    }

    /// Polygon vertices in drawing order, closed on the first spoke.
    pub fn polygon(&self) -> Vec<RadarPoint> {
        let mut angles = self.angles();
        if let Some(first) = angles.first() {
            angles.push(*first);
        }
        angles
            .into_iter()
            .zip(self.closed_ranks())
            .map(|(angle, rank)| RadarPoint { angle, rank })
            .collect()
    }
}

/// One radar vertex: spoke angle in radians and the rank plotted on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarPoint {
    pub angle: f64,
    pub rank: Rank,
}

// ---------------------------------------------------------------------------
// Bar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub team: String,
    pub value: Option<f64>,
    pub highlighted: bool,
}

/// Every team's value in one category, best first, one team highlighted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub title: String,
    pub metric: String,
    pub direction: RankDirection,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    /// Build the bar series for `category` with `team` highlighted.
    ///
    /// Teams whose value is undefined sit at the end, matching how they are
    /// ranked.
    pub fn for_category(
        table: &StatTable,
        category: &CategorySpec,
        team: &str,
        rank: Rank,
    ) -> Result<Self, RankError> {
        table.team(team)?;

        let mut bars = table
            .rows()
            .iter()
            .map(|row| {
                let value = match category.formula.evaluate(row) {
                    Ok(v) => Some(v),
                    Err(RankError::UndefinedRatio { .. }) => None,
                    Err(e) => return Err(e),
                };
                Ok(Bar {
                    team: row.team.clone(),
                    value,
                    highlighted: row.team == team,
                })
            })
            .collect::<Result<Vec<_>, RankError>>()?;

        // Stable sort keeps table order among equal values.
        bars.sort_by(|a, b| match (a.value, b.value) {
            (Some(x), Some(y)) => category.direction.compare(x, y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        Ok(Self {
            title: format!("Overall Ranking: {rank}"),
            metric: category.formula.to_string(),
            direction: category.direction,
            bars,
        })
    }

    /// The bar series for a breakdown's overall category.
    pub fn overall(breakdown: &RankBreakdown, table: &StatTable) -> Result<Self, RankError> {
        Self::for_category(
            table,
            &breakdown.domain.spec().overall,
            &breakdown.team,
            breakdown.overall.rank,
        )
    }

    /// Largest defined magnitude, used to scale bars.
    pub fn max_abs_value(&self) -> f64 {
        self.bars
            .iter()
            .filter_map(|b| b.value)
            .map(f64::abs)
            .fold(0.0, f64::max)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
