// SQLite cache of normalized snapshots, keyed by (domain, season).

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use moneyball_core::{Domain, StatTable};
use rusqlite::{params, Connection, OptionalExtension};

/// One cached snapshot as listed by [`SnapshotCache::entries`].
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub domain: String,
    pub season: i32,
    pub teams: usize,
    pub stored_at: String,
}

/// SQLite-backed store of normalized league tables.
pub struct SnapshotCache {
    conn: Mutex<Connection>,
}

impl SnapshotCache {
    /// Open (or create) the cache at `path`. Pass `":memory:"` for an
    /// ephemeral cache.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open snapshot cache at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set cache pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS snapshots (
                domain    TEXT NOT NULL,
                season    INTEGER NOT NULL,
                teams     INTEGER NOT NULL,
                payload   TEXT NOT NULL,
                stored_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                PRIMARY KEY (domain, season)
            );
            ",
        )
        .context("failed to create snapshot cache schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Panics if the mutex is poisoned, which only happens after another
    /// thread panicked mid-query.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("snapshot cache mutex poisoned")
    }

    /// Store a snapshot, replacing any previous one for the same key.
    pub fn put(&self, domain: Domain, season: i32, table: &StatTable) -> Result<()> {
        let payload = serde_json::to_string(table).context("failed to serialize snapshot")?;
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO snapshots (domain, season, teams, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![domain.slug(), season, table.len() as i64, payload],
        )
        .context("failed to store snapshot")?;
        Ok(())
    }

    /// Load a cached snapshot, or `None` when the key was never stored.
    pub fn get(&self, domain: Domain, season: i32) -> Result<Option<StatTable>> {
        let conn = self.conn();
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM snapshots WHERE domain = ?1 AND season = ?2",
                params![domain.slug(), season],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query snapshot cache")?;

        payload
            .map(|json| serde_json::from_str(&json).context("failed to deserialize snapshot"))
            .transpose()
    }

    /// Drop one snapshot. Returns whether anything was removed.
    pub fn remove(&self, domain: Domain, season: i32) -> Result<bool> {
        let conn = self.conn();
        let n = conn
            .execute(
                "DELETE FROM snapshots WHERE domain = ?1 AND season = ?2",
                params![domain.slug(), season],
            )
            .context("failed to remove snapshot")?;
        Ok(n > 0)
    }

    /// Drop every snapshot. Returns the number removed.
    pub fn clear(&self) -> Result<usize> {
        let conn = self.conn();
        conn.execute("DELETE FROM snapshots", [])
            .context("failed to clear snapshot cache")
    }

    /// Cached keys, newest season first.
    pub fn entries(&self) -> Result<Vec<CacheEntry>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT domain, season, teams, stored_at FROM snapshots
                 ORDER BY season DESC, domain",
            )
            .context("failed to prepare cache listing")?;

        let entries = stmt
            .query_map([], |row| {
                let teams: i64 = row.get(2)?;
                Ok(CacheEntry {
                    domain: row.get(0)?,
                    season: row.get(1)?,
                    teams: teams as usize,
                    stored_at: row.get(3)?,
                })
            })
            .context("failed to list snapshots")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map snapshot rows")?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moneyball_core::TeamRow;

    fn test_cache() -> SnapshotCache {
        SnapshotCache::open(":memory:").expect("in-memory cache should open")
    }

    fn sample_table() -> StatTable {
        let avg = [("R/G".to_string(), 4.83)].into_iter().collect();
        StatTable::new(
            vec!["R/G".into(), "BA".into()],
            vec![
                TeamRow::new("NYY").with("R/G", 5.82).with("BA", 0.267),
                TeamRow::new("MIN").with("R/G", 5.80).with("BA", 0.270),
            ],
        )
        .unwrap()
        .with_league_average(avg)
    }

    #[test]
    fn get_missing_key_is_none() {
        let cache = test_cache();
        assert!(cache.get(Domain::Batting, 2019).unwrap().is_none());
    }

    #[test]
    fn put_then_get_returns_same_table() {
        let cache = test_cache();
        let table = sample_table();
        cache.put(Domain::Batting, 2019, &table).unwrap();
        assert_eq!(cache.get(Domain::Batting, 2019).unwrap(), Some(table));
    }

    #[test]
    fn keys_are_scoped_by_domain_and_season() {
        let cache = test_cache();
        cache.put(Domain::Batting, 2019, &sample_table()).unwrap();
        assert!(cache.get(Domain::Batting, 2018).unwrap().is_none());
        assert!(cache.get(Domain::Fielding, 2019).unwrap().is_none());
    }

    #[test]
    fn put_replaces_previous_snapshot() {
        let cache = test_cache();
        cache.put(Domain::Batting, 2019, &sample_table()).unwrap();
        let smaller =
            StatTable::new(vec!["R/G".into()], vec![TeamRow::new("SEA").with("R/G", 4.3)])
                .unwrap();
        cache.put(Domain::Batting, 2019, &smaller).unwrap();

        assert_eq!(cache.get(Domain::Batting, 2019).unwrap(), Some(smaller));
        assert_eq!(cache.entries().unwrap().len(), 1);
    }

    #[test]
    fn remove_and_clear() {
        let cache = test_cache();
        cache.put(Domain::Batting, 2019, &sample_table()).unwrap();
        cache.put(Domain::Fielding, 2019, &sample_table()).unwrap();
        cache.put(Domain::Batting, 2018, &sample_table()).unwrap();

        assert!(cache.remove(Domain::Fielding, 2019).unwrap());
        assert!(!cache.remove(Domain::Fielding, 2019).unwrap());
        assert_eq!(cache.clear().unwrap(), 2);
        assert!(cache.entries().unwrap().is_empty());
    }

    #[test]
    fn entries_list_newest_season_first() {
        let cache = test_cache();
        cache.put(Domain::Batting, 2018, &sample_table()).unwrap();
        cache.put(Domain::Batting, 2019, &sample_table()).unwrap();

        let entries = cache.entries().unwrap();
        assert_eq!(entries[0].season, 2019);
        assert_eq!(entries[0].domain, "batting");
        assert_eq!(entries[0].teams, 2);
        assert!(entries[1].stored_at.ends_with('Z'));
    }
}
