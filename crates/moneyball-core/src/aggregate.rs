// Rank aggregation: derive each category for a team and for the whole
// league, rank it, and package the overall rank with the breakdown.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::{CategorySpec, Domain};
use crate::error::{RankError, MIN_CATEGORIES};
use crate::rank::{rank_derived, Rank, RankDirection};
use crate::table::{StatTable, TeamRow};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A team's standing in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRank {
    pub name: String,
    /// Human-readable derivation, e.g. `SB - CS`.
    pub formula: String,
    pub direction: RankDirection,
    /// The team's derived value; `None` when the derivation was undefined.
    pub value: Option<f64>,
    pub rank: Rank,
}

/// Overall rank plus the ordered category breakdown for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankBreakdown {
    pub domain: Domain,
    pub team: String,
    /// Number of teams ranked against (the worst possible rank).
    pub league_size: usize,
    pub overall: CategoryRank,
    pub categories: Vec<CategoryRank>,
}

impl RankBreakdown {
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn category_ranks(&self) -> Vec<Rank> {
        self.categories.iter().map(|c| c.rank).collect()
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Evaluate a category for one row, mapping an undefined ratio to `None`.
fn derive(spec: &CategorySpec, row: &TeamRow) -> Result<Option<f64>, RankError> {
    match spec.formula.evaluate(row) {
        Ok(value) => Ok(Some(value)),
        Err(RankError::UndefinedRatio { numerator }) => {
            debug!(
                "{}: undefined ratio over `{}` for {}, ranking last",
                spec.name, numerator, row.team
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Rank `team` in a single category against every row of `league`.
///
/// The population is built with the same derivation as the team value, so
/// the lookup is exact.
pub fn rank_category(
    spec: &CategorySpec,
    team: &TeamRow,
    league: &StatTable,
) -> Result<CategoryRank, RankError> {
    let value = derive(spec, team)?;
    let population = league
        .rows()
        .iter()
        .map(|row| derive(spec, row))
        .collect::<Result<Vec<_>, _>>()?;

    let rank = rank_derived(value, &population, spec.direction).map_err(|e| {
        let e = e.in_category(spec.name);
        error!("{} for team {}: {}", spec.name, team.team, e);
        e
    })?;

    Ok(CategoryRank {
        name: spec.name.to_string(),
        formula: spec.formula.to_string(),
        direction: spec.direction,
        value,
        rank,
    })
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Build the rank breakdown for `team_row` within `league` for `domain`.
///
/// `team_row` must be one of `league`'s rows; a team the league does not
/// contain fails with [`RankError::TeamNotFound`]. Breakdown categories keep
/// the domain's presentation order.
pub fn aggregate(
    domain: Domain,
    team_row: &TeamRow,
    league: &StatTable,
) -> Result<RankBreakdown, RankError> {
    if league.is_empty() {
        return Err(RankError::EmptyTable);
    }
    league.team(&team_row.team)?;

    let spec = domain.spec();
    if spec.breakdown.len() < MIN_CATEGORIES {
        return Err(RankError::InsufficientCategories {
            found: spec.breakdown.len(),
            required: MIN_CATEGORIES,
        });
    }

    let overall = rank_category(&spec.overall, team_row, league)?;
    let categories = spec
        .breakdown
        .iter()
        .map(|c| rank_category(c, team_row, league))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "{} {}: overall {} of {}",
        team_row.team,
        domain.slug(),
        overall.rank,
        league.len()
    );

    Ok(RankBreakdown {
        domain,
        team: team_row.team.clone(),
        league_size: league.len(),
        overall,
        categories,
    })
}

/// Convenience wrapper: look the team up by name, then [`aggregate`].
pub fn aggregate_team(
    domain: Domain,
    team: &str,
    league: &StatTable,
) -> Result<RankBreakdown, RankError> {
    let row = league.team(team)?;
    aggregate(domain, row, league)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
