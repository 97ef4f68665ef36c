// Data-layer error types.

use moneyball_core::RankError;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("season {season} is outside {min}..={max}")]
    InvalidSeason { season: i32, min: i32, max: i32 },

    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("snapshot has no `{0}` team column")]
    MissingTeamColumn(String),

    #[error("snapshot produced zero team rows")]
    NoTeams,

    #[error(transparent)]
    Table(#[from] RankError),

    #[error(transparent)]
    Cache(#[from] anyhow::Error),
}
