// Text and JSON rendering of league tables and rank breakdowns.

use std::fmt::Write as _;

use moneyball_core::chart::{BarSeries, RadarPoint, RadarSeries};
use moneyball_core::{Domain, RankBreakdown, RankError, StatTable};
use serde::Serialize;

/// Everything shown for one team selection; serialized as-is for `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RankReport {
    pub season: i32,
    pub source_url: String,
    pub breakdown: RankBreakdown,
    /// League-average value of the overall category, when the snapshot had one.
    pub league_average: Option<f64>,
    pub radar: RadarSeries,
    /// Closed radar outline for plotting front ends.
    pub radar_polygon: Vec<RadarPoint>,
    pub bars: BarSeries,
}

impl RankReport {
    pub fn build(
        season: i32,
        breakdown: RankBreakdown,
        table: &StatTable,
    ) -> Result<Self, RankError> {
        let radar = RadarSeries::from_breakdown(&breakdown)?;
        let bars = BarSeries::overall(&breakdown, table)?;
        let league_average = overall_league_average(breakdown.domain, table);
        let radar_polygon = radar.polygon();
        Ok(Self {
            season,
            source_url: moneyball_data::source::reference_url(breakdown.domain, season),
            breakdown,
            league_average,
            radar,
            radar_polygon,
            bars,
        })
    }
}

/// The overall category evaluated on the league-average row. Derived
/// overall categories without every input column on that row yield `None`.
fn overall_league_average(domain: Domain, table: &StatTable) -> Option<f64> {
    let avg = table.league_average()?;
    let row = moneyball_core::TeamRow {
        team: "League Average".to_string(),
        stats: avg.clone(),
    };
    domain.spec().overall.formula.evaluate(&row).ok()
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn format_value(value: Option<f64>) -> String {
    match value {
        None => "n/a".to_string(),
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) if v.abs() < 1.0 => format!("{v:.3}"),
        Some(v) => format!("{v:.2}"),
    }
}

fn bar(len: usize) -> String {
    "#".repeat(len)
}

/// Bars below zero are drawn with `-` so a negative value never looks like
/// its positive mirror.
fn signed_bar(value: f64, len: usize) -> String {
    if value < 0.0 {
        "-".repeat(len)
    } else {
        bar(len)
    }
}

/// Columns a domain's categories read, in first-use order.
pub fn domain_columns(domain: Domain) -> Vec<&'static str> {
    let spec = domain.spec();
    let mut columns: Vec<&'static str> = Vec::new();
    for category in std::iter::once(&spec.overall).chain(spec.breakdown.iter()) {
        for column in category.formula.columns() {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
    }
    columns
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

/// League table restricted to the columns the domain's categories use.
pub fn render_table(domain: Domain, season: i32, table: &StatTable) -> String {
    let columns = domain_columns(domain);
    let mut out = String::new();
    let _ = writeln!(out, "MLB Team {} for {} Season", domain.label(), season);
    let _ = writeln!(out, "Source: {}", moneyball_data::source::reference_url(domain, season));
    let _ = writeln!(out);

    let _ = write!(out, "{:<6}", "Tm");
    for c in &columns {
        let _ = write!(out, "{c:>9}");
    }
    let _ = writeln!(out);

    for row in table.rows() {
        let _ = write!(out, "{:<6}", row.team);
        for c in &columns {
            let _ = write!(out, "{:>9}", format_value(row.stats.get(*c).copied()));
        }
        let _ = writeln!(out);
    }

    if let Some(avg) = table.league_average() {
        let _ = write!(out, "{:<6}", "Avg");
        for c in &columns {
            let _ = write!(out, "{:>9}", format_value(avg.get(*c).copied()));
        }
        let _ = writeln!(out);
    }
    out
}

/// Radar rendered as one bar per spoke; longer is better.
pub fn render_radar(radar: &RadarSeries, width: usize) -> String {
    let label_width = radar.labels.iter().map(|l| l.len()).max().unwrap_or(0);
    let max = radar.max_rank.max(1);
    let mut out = String::new();
    let _ = writeln!(out, "{}", radar.title);
    for (label, rank) in radar.labels.iter().zip(&radar.ranks) {
        let strength = max + 1 - (*rank).min(max);
        let len = strength * width / max;
        let _ = writeln!(out, "  {label:<label_width$}  {:<width$}  #{rank}", bar(len));
    }
    out
}

/// Overall-metric bar chart with the selected team marked.
pub fn render_bars(bars: &BarSeries, width: usize) -> String {
    let scale = bars.max_abs_value();
    let mut out = String::new();
    let _ = writeln!(out, "{} ({}, {})", bars.title, bars.metric, bars.direction.label());
    for b in &bars.bars {
        let drawn = match b.value {
            Some(v) if scale > 0.0 => {
                signed_bar(v, ((v.abs() / scale) * width as f64).round() as usize)
            }
            _ => String::new(),
        };
        let marker = if b.highlighted { "  <" } else { "" };
        let _ = writeln!(
            out,
            "  {:<6} {:<width$} {:>8}{marker}",
            b.team,
            drawn,
            format_value(b.value)
        );
    }
    out
}

/// Full text report for one team.
pub fn render_report(report: &RankReport, width: usize) -> String {
    let b = &report.breakdown;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} Analysis, {} Season",
        b.team,
        b.domain.label(),
        report.season
    );
    let _ = writeln!(out, "Source: {}", report.source_url);
    let _ = writeln!(out);

    let _ = write!(
        out,
        "Overall: {} ({}) {}",
        b.overall.name,
        b.overall.formula,
        format_value(b.overall.value)
    );
    if let Some(avg) = report.league_average {
        let _ = write!(out, ", league average {}", format_value(Some(avg)));
    }
    let _ = writeln!(out, ", rank {} of {}", b.overall.rank, b.league_size);
    let _ = writeln!(out);

    let name_width = b.categories.iter().map(|c| c.name.len()).max().unwrap_or(0);
    let formula_width = b.categories.iter().map(|c| c.formula.len()).max().unwrap_or(0);
    for c in &b.categories {
        let _ = writeln!(
            out,
            "  {:<name_width$}  {:<formula_width$}  {:>8}  rank {:>2}  ({})",
            c.name,
            c.formula,
            format_value(c.value),
            c.rank,
            c.direction.label()
        );
    }
    let _ = writeln!(out);
    out.push_str(&render_radar(&report.radar, width));
    let _ = writeln!(out);
    out.push_str(&render_bars(&report.bars, width));
    out
}

/// `domains` command output.
pub fn render_domains() -> String {
    let mut out = String::new();
    for domain in Domain::ALL {
        let spec = domain.spec();
        let _ = writeln!(out, "{} ({})", domain.label(), domain.slug());
        let _ = writeln!(
            out,
            "  overall: {} = {} ({})",
            spec.overall.name,
            spec.overall.formula,
            spec.overall.direction.label()
        );
        for c in spec.breakdown {
            let _ = writeln!(out, "  {} = {} ({})", c.name, c.formula, c.direction.label());
        }
    }
    out
}
