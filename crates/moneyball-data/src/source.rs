// Raw snapshot sources.
//
// A snapshot is the team table of one Baseball-Reference league page,
// exported as CSV. Sources hand back the cells untouched; `normalize` turns
// them into a `StatTable`.

use std::io::Read;
use std::path::{Path, PathBuf};

use moneyball_core::Domain;
use tracing::{debug, warn};

use crate::error::DataError;

const REFERENCE_BASE_URL: &str = "https://www.baseball-reference.com/leagues/MLB/";

/// Page each domain's snapshot is exported from.
pub fn reference_url(domain: Domain, season: i32) -> String {
    let page = match domain {
        Domain::Batting => "-standard-batting.shtml",
        Domain::StartingPitching => "-starter-pitching.shtml",
        Domain::ReliefPitching => "-reliever-pitching.shtml",
        Domain::Fielding => "-standard-fielding.shtml",
    };
    format!("{REFERENCE_BASE_URL}{season}{page}")
}

// ---------------------------------------------------------------------------
// RawTable
// ---------------------------------------------------------------------------

/// Header row plus string cells, exactly as exported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

/// Read a CSV snapshot. Ragged rows are accepted and padded later.
pub fn read_raw_table<R: Read>(rdr: R) -> Result<RawTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => records.push(record.iter().map(str::to_string).collect()),
            Err(e) => warn!("skipping malformed snapshot row: {}", e),
        }
    }
    Ok(RawTable { headers, records })
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Where raw snapshots come from.
pub trait StatSource {
    /// Short description for log lines.
    fn describe(&self) -> String;

    fn fetch(&self, domain: Domain, season: i32) -> Result<RawTable, DataError>;
}

/// Snapshots stored as `<root>/<season>/<domain-slug>.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    root: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, domain: Domain, season: i32) -> PathBuf {
        self.root
            .join(season.to_string())
            .join(format!("{}.csv", domain.slug()))
    }
}

impl StatSource for CsvDirectorySource {
    fn describe(&self) -> String {
        format!("csv:{}", self.root.display())
    }

    fn fetch(&self, domain: Domain, season: i32) -> Result<RawTable, DataError> {
        let path = self.path_for(domain, season);
        debug!("reading snapshot {}", path.display());
        let file = std::fs::File::open(&path).map_err(|e| DataError::Io {
            path: display(&path),
            source: e,
        })?;
        read_raw_table(file).map_err(|e| DataError::Csv {
            path: display(&path),
            source: e,
        })
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reference_urls_match_league_pages() {
        assert_eq!(
            reference_url(Domain::Batting, 2019),
            "https://www.baseball-reference.com/leagues/MLB/2019-standard-batting.shtml"
        );
        assert_eq!(
            reference_url(Domain::ReliefPitching, 2005),
            "https://www.baseball-reference.com/leagues/MLB/2005-reliever-pitching.shtml"
        );
    }

    #[test]
    fn read_keeps_cells_verbatim() {
        let csv_data = "\
Tm, R/G ,BA
NYY,5.82,.267
Tm,R/G,BA
League Average,4.83,.252";
        let raw = read_raw_table(csv_data.as_bytes()).unwrap();
        assert_eq!(raw.headers, vec!["Tm", "R/G", "BA"]);
        assert_eq!(raw.records.len(), 3);
        assert_eq!(raw.records[0], vec!["NYY", "5.82", ".267"]);
        assert_eq!(raw.records[2][0], "League Average");
    }

    #[test]
    fn read_accepts_ragged_rows() {
        let csv_data = "Tm,R,HR\nNYY,943\nMIN,939,307";
        let raw = read_raw_table(csv_data.as_bytes()).unwrap();
        assert_eq!(raw.records[0].len(), 2);
        assert_eq!(raw.records[1].len(), 3);
    }

    #[test]
    fn directory_source_reads_season_and_slug() {
        let tmp = std::env::temp_dir().join("moneyball_source_test");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("2019")).unwrap();
        fs::write(tmp.join("2019/fielding.csv"), "Tm,E\nNYY,89\n").unwrap();

        let source = CsvDirectorySource::new(&tmp);
        let raw = source.fetch(Domain::Fielding, 2019).unwrap();
        assert_eq!(raw.headers, vec!["Tm", "E"]);
        assert_eq!(raw.records, vec![vec!["NYY".to_string(), "89".to_string()]]);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn directory_source_missing_file_is_io_error() {
        let source = CsvDirectorySource::new("/nonexistent/moneyball");
        assert!(matches!(
            source.fetch(Domain::Batting, 2019),
            Err(DataError::Io { .. })
        ));
    }
}
