// Error taxonomy shared by the ranking engine and aggregator.

use thiserror::Error;

/// Minimum number of breakdown categories a radar summary can be drawn with.
pub const MIN_CATEGORIES: usize = 3;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankError {
    #[error("unsupported domain `{0}`; expected one of batting, starting-pitching, relief-pitching, fielding")]
    InvalidDomain(String),

    #[error("value {value} for `{category}` is not present in its population")]
    ValueNotFound { category: String, value: f64 },

    #[error("ratio over `{numerator}` has a zero denominator")]
    UndefinedRatio { numerator: String },

    #[error("at least {required} categories are required, found {found}")]
    InsufficientCategories { found: usize, required: usize },

    #[error("{names} category names but {ranks} ranks")]
    MismatchedSeries { names: usize, ranks: usize },

    #[error("team `{0}` is not in the league table")]
    TeamNotFound(String),

    #[error("column `{0}` is not in the league table")]
    MissingColumn(String),

    #[error("team `{0}` appears more than once in the league table")]
    DuplicateTeam(String),

    #[error("league table has no teams")]
    EmptyTable,
}

impl RankError {
    /// Attach a category name to a `ValueNotFound` raised by the bare engine,
    /// which only knows the value it was asked about.
    pub(crate) fn in_category(self, name: &str) -> Self {
        match self {
            RankError::ValueNotFound { value, .. } => RankError::ValueNotFound {
                category: name.to_string(),
                value,
            },
            other => other,
        }
    }
}
