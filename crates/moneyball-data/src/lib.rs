// League snapshot loading: season bounds, CSV sources, normalization and
// the SQLite snapshot cache.

pub mod cache;
pub mod error;
pub mod normalize;
pub mod repository;
pub mod season;
pub mod source;

pub use cache::SnapshotCache;
pub use error::DataError;
pub use repository::StatRepository;
pub use source::{CsvDirectorySource, RawTable, StatSource};
