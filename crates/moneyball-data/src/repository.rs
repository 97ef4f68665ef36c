// Snapshot repository: season check, cache lookup, source fallback.

use chrono::NaiveDate;
use moneyball_core::{Domain, StatTable};
use tracing::{debug, info};

use crate::cache::SnapshotCache;
use crate::error::DataError;
use crate::normalize::normalize;
use crate::season::{self, validate_season};
use crate::source::StatSource;

/// Loads normalized league tables, caching them by `(domain, season)`.
pub struct StatRepository<S: StatSource> {
    source: S,
    cache: SnapshotCache,
    today: NaiveDate,
}

impl<S: StatSource> StatRepository<S> {
    pub fn new(source: S, cache: SnapshotCache) -> Self {
        Self {
            source,
            cache,
            today: season::today(),
        }
    }

    /// Pin the date used for season validation.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return the snapshot for `(domain, season)`, reading it from the
    /// source and caching it on a miss.
    pub fn load(&self, domain: Domain, season: i32) -> Result<StatTable, DataError> {
        validate_season(season, self.today)?;

        if let Some(table) = self.cache.get(domain, season)? {
            debug!("cache hit: {} {}", domain.slug(), season);
            return Ok(table);
        }

        self.refresh(domain, season)
    }

    /// Re-read the snapshot from the source and overwrite the cached copy.
    pub fn refresh(&self, domain: Domain, season: i32) -> Result<StatTable, DataError> {
        validate_season(season, self.today)?;

        let raw = self.source.fetch(domain, season)?;
        let table = normalize(&raw)?;
        info!(
            "loaded {} {} from {}: {} teams",
            domain.slug(),
            season,
            self.source.describe(),
            table.len()
        );
        self.cache.put(domain, season, &table)?;
        Ok(table)
    }
}
