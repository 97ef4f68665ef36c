// League snapshot: one row of named numeric statistics per team.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::RankError;

// ---------------------------------------------------------------------------
// TeamRow
// ---------------------------------------------------------------------------

/// A single team's statistics for one domain and season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRow {
    pub team: String,
    pub stats: HashMap<String, f64>,
}

impl TeamRow {
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            stats: HashMap::new(),
        }
    }

    /// Builder-style helper used heavily by tests and fixtures.
    pub fn with(mut self, column: &str, value: f64) -> Self {
        self.stats.insert(column.to_string(), value);
        self
    }

    /// Look up a column. A column the row does not carry is an error: the
    /// normalizer fills blanks with zero, so absence means the wrong table.
    pub fn get(&self, column: &str) -> Result<f64, RankError> {
        self.stats
            .get(column)
            .copied()
            .ok_or_else(|| RankError::MissingColumn(column.to_string()))
    }
}

// ---------------------------------------------------------------------------
// StatTable
// ---------------------------------------------------------------------------

/// Normalized league table. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatTable {
    columns: Vec<String>,
    rows: Vec<TeamRow>,
    league_average: Option<HashMap<String, f64>>,
}

impl StatTable {
    /// Build a table, enforcing that each team appears exactly once.
    ///
    /// `columns` keeps the presentation order of the stat columns (the team
    /// column is not included).
    pub fn new(columns: Vec<String>, rows: Vec<TeamRow>) -> Result<Self, RankError> {
        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !seen.insert(row.team.as_str()) {
                return Err(RankError::DuplicateTeam(row.team.clone()));
            }
        }
        Ok(Self {
            columns,
            rows,
            league_average: None,
        })
    }

    /// Attach the league-average row captured during normalization.
    pub fn with_league_average(mut self, average: HashMap<String, f64>) -> Self {
        self.league_average = Some(average);
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[TeamRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn team_names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.team.as_str())
    }

    pub fn team(&self, name: &str) -> Result<&TeamRow, RankError> {
        self.rows
            .iter()
            .find(|r| r.team == name)
            .ok_or_else(|| RankError::TeamNotFound(name.to_string()))
    }

    pub fn league_average(&self) -> Option<&HashMap<String, f64>> {
        self.league_average.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
