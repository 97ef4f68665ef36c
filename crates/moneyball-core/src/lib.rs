// Ranking core: ordinal ranks, derived metrics, per-domain breakdowns.
//
// Everything in this crate is pure. Loading, caching and rendering live in
// the data and app crates.

pub mod aggregate;
pub mod chart;
pub mod domain;
pub mod error;
pub mod formula;
pub mod rank;
pub mod table;

pub use aggregate::{aggregate, aggregate_team, CategoryRank, RankBreakdown};
pub use domain::{CategorySpec, Domain};
pub use error::RankError;
pub use rank::{rank, rank_derived, Rank, RankDirection};
pub use table::{StatTable, TeamRow};
