// Snapshot normalization: raw cells to a numeric StatTable.
//
// Exported league pages repeat the header every few rows, carry a
// "League Average" row and end with a totals row. Stat cells may be blank
// or percent-suffixed.

use std::collections::HashMap;

use moneyball_core::{StatTable, TeamRow};
use tracing::{debug, warn};

use crate::error::DataError;
use crate::source::RawTable;

pub const TEAM_COLUMN: &str = "Tm";

const LEAGUE_AVERAGE: &str = "League Average";

/// Team-cell values that mark a summary row rather than a team.
const TOTAL_ROWS: &[&str] = &["", "Total", "Totals", "League Totals", "MLB Totals"];

/// Columns written in innings notation, where the digit after the point
/// counts outs: `1453.1` is 1453 and one third innings.
const INNINGS_COLUMNS: &[&str] = &["Inn", "IP"];

/// Parse one stat cell. Blank cells become zero; `%` suffixes and thousands
/// separators are stripped. Returns `None` for text that is not a number.
pub fn parse_stat(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Some(0.0);
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an innings cell (`whole.outs`) into fractional innings.
///
/// A single trailing digit of 0, 1 or 2 is read as outs. Any other shape
/// (an averaged value such as `1444.37`) is taken as a plain decimal.
pub fn parse_innings(cell: &str) -> Option<f64> {
    let value = parse_stat(cell)?;
    let trimmed = cell.trim();
    let Some((whole, outs)) = trimmed.split_once('.') else {
        return Some(value);
    };
    match outs {
        "0" | "1" | "2" => {
            let whole = parse_stat(whole)?;
            let outs = f64::from(outs.as_bytes()[0] - b'0');
            Some(whole + outs / 3.0)
        }
        _ => Some(value),
    }
}

fn parse_row(
    headers: &[String],
    team_idx: usize,
    record: &[String],
    team: &str,
) -> HashMap<String, f64> {
    let mut stats = HashMap::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        if i == team_idx {
            continue;
        }
        let cell = record.get(i).map(String::as_str).unwrap_or("");
        let parsed = if INNINGS_COLUMNS.contains(&header.as_str()) {
            parse_innings(cell)
        } else {
            parse_stat(cell)
        };
        let value = parsed.unwrap_or_else(|| {
            warn!("{team}: non-numeric `{header}` value '{cell}', using 0");
            0.0
        });
        stats.insert(header.clone(), value);
    }
    stats
}

/// Turn a raw snapshot into a `StatTable`.
///
/// - repeated header rows (team cell `Tm`) are dropped;
/// - the `League Average` row is kept aside as the table's league average;
/// - totals rows (blank or `Total`-style team cell) are dropped;
/// - every other column is parsed as a number, blanks and junk become 0;
/// - innings columns (`Inn`, `IP`) are converted from outs notation.
pub fn normalize(raw: &RawTable) -> Result<StatTable, DataError> {
    let team_idx = raw
        .headers
        .iter()
        .position(|h| h == TEAM_COLUMN)
        .ok_or_else(|| DataError::MissingTeamColumn(TEAM_COLUMN.to_string()))?;

    let columns: Vec<String> = raw
        .headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != team_idx)
        .map(|(_, h)| h.clone())
        .collect();

    let mut rows = Vec::new();
    let mut league_average = None;

    for record in &raw.records {
        let team = record.get(team_idx).map(|s| s.trim()).unwrap_or("");

        if team == TEAM_COLUMN {
            continue;
        }
        if team == LEAGUE_AVERAGE {
            league_average = Some(parse_row(&raw.headers, team_idx, record, team));
            continue;
        }
        if TOTAL_ROWS.contains(&team) {
            debug!("dropping summary row '{}'", team);
            continue;
        }

        rows.push(TeamRow {
            team: team.to_string(),
            stats: parse_row(&raw.headers, team_idx, record, team),
        });
    }

    if rows.is_empty() {
        return Err(DataError::NoTeams);
    }

    let table = StatTable::new(columns, rows)?;
    Ok(match league_average {
        Some(avg) => table.with_league_average(avg),
        None => table,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::read_raw_table;
    use moneyball_core::RankError;

    fn raw(csv_data: &str) -> RawTable {
        read_raw_table(csv_data.as_bytes()).unwrap()
    }

    #[test]
    fn parse_stat_handles_common_cell_shapes() {
        assert_eq!(parse_stat("5.82"), Some(5.82));
        assert_eq!(parse_stat(".267"), Some(0.267));
        assert_eq!(parse_stat("54%"), Some(54.0));
        assert_eq!(parse_stat(" 1,432 "), Some(1432.0));
        assert_eq!(parse_stat(""), Some(0.0));
        assert_eq!(parse_stat("-12"), Some(-12.0));
        assert_eq!(parse_stat("n/a"), None);
        assert_eq!(parse_stat("inf"), None);
    }

    #[test]
    fn summary_rows_are_removed() {
        let table = normalize(&raw("\
Tm,R/G,BA,QS%
NYY,5.82,.267,41%
MIN,5.80,.270,
Tm,R/G,BA,QS%
League Average,4.83,.252,38%
,4.83,.252,38%")).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.team_names().collect::<Vec<_>>(), vec!["NYY", "MIN"]);
        assert_eq!(table.columns(), &["R/G", "BA", "QS%"]);
        assert_eq!(table.team("NYY").unwrap().get("QS%").unwrap(), 41.0);
        assert_eq!(table.team("MIN").unwrap().get("QS%").unwrap(), 0.0);

        let avg = table.league_average().unwrap();
        assert_eq!(avg["R/G"], 4.83);
        assert_eq!(avg["QS%"], 38.0);
    }

    #[test]
    fn parse_innings_reads_outs_after_the_point() {
        assert_eq!(parse_innings("1453.0"), Some(1453.0));
        assert_eq!(parse_innings("1453.1"), Some(1453.0 + 1.0 / 3.0));
        assert_eq!(parse_innings("1459.2"), Some(1459.0 + 2.0 / 3.0));
        assert_eq!(parse_innings("1456"), Some(1456.0));
        assert_eq!(parse_innings(""), Some(0.0));
        assert_eq!(parse_innings("1,453.1"), Some(1453.0 + 1.0 / 3.0));
        // Not outs notation: kept as written.
        assert_eq!(parse_innings("5.9"), Some(5.9));
        assert_eq!(parse_innings("1444.37"), Some(1444.37));
        assert_eq!(parse_innings("n/a"), None);
    }

    #[test]
    fn innings_columns_are_converted_and_others_are_not() {
        let table = normalize(&raw("\
Tm,Inn,IP,IP/GS,PO
AAA,1000.2,1000.2,5.2,10000
League Average,1444.1,1444.1,5.1,4332")).unwrap();

        let aaa = table.team("AAA").unwrap();
        assert_eq!(aaa.get("Inn").unwrap(), 1000.0 + 2.0 / 3.0);
        assert_eq!(aaa.get("IP").unwrap(), 1000.0 + 2.0 / 3.0);
        assert_eq!(aaa.get("IP/GS").unwrap(), 5.2);
        assert_eq!(aaa.get("PO").unwrap(), 10000.0);
        assert_eq!(table.league_average().unwrap()["Inn"], 1444.0 + 1.0 / 3.0);
    }

    #[test]
    fn range_factor_uses_true_innings() {
        use moneyball_core::{aggregate_team, Domain};

        // AAA played 1000 2/3 innings, BBB 1001. Read as plain decimals AAA
        // would look like the better range team.
        let table = normalize(&raw("\
Tm,RA/G,DefEff,Inn,PO,A,E,DP,Fld%,Rtot/yr
AAA,4.5,.690,1000.2,7000,3000,90,140,.983,0
BBB,4.5,.690,1001.0,7005,3000,90,140,.983,0
CCC,4.5,.690,1000.0,6000,3000,90,140,.983,0")).unwrap();

        let aaa = aggregate_team(Domain::Fielding, "AAA", &table).unwrap();
        let bbb = aggregate_team(Domain::Fielding, "BBB", &table).unwrap();
        let range = |b: &moneyball_core::RankBreakdown| {
            b.categories.iter().find(|c| c.name == "Range").unwrap().clone()
        };
        assert!((range(&aaa).value.unwrap() - 89.940).abs() < 1e-3);
        assert!((range(&bbb).value.unwrap() - 89.955).abs() < 1e-3);
        assert_eq!(range(&bbb).rank, 1);
        assert_eq!(range(&aaa).rank, 2);
    }

    #[test]
    fn junk_cells_become_zero() {
        let table = normalize(&raw("Tm,R,HR\nNYY,943,??\n")).unwrap();
        assert_eq!(table.team("NYY").unwrap().get("HR").unwrap(), 0.0);
    }

    #[test]
    fn short_rows_are_padded_with_zero() {
        let table = normalize(&raw("Tm,R,HR\nNYY,943\n")).unwrap();
        let nyy = table.team("NYY").unwrap();
        assert_eq!(nyy.get("R").unwrap(), 943.0);
        assert_eq!(nyy.get("HR").unwrap(), 0.0);
    }

    #[test]
    fn team_column_is_required() {
        assert!(matches!(
            normalize(&raw("Team,R\nNYY,943\n")),
            Err(DataError::MissingTeamColumn(_))
        ));
    }

    #[test]
    fn only_summary_rows_is_an_error() {
        assert!(matches!(
            normalize(&raw("Tm,R\nLeague Average,700\n,21000\n")),
            Err(DataError::NoTeams)
        ));
    }

    #[test]
    fn duplicate_team_is_surfaced() {
        assert!(matches!(
            normalize(&raw("Tm,R\nNYY,1\nNYY,2\n")),
            Err(DataError::Table(RankError::DuplicateTeam(_)))
        ));
    }
}
