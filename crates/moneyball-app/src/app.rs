// Command dispatch: wires config, repository and core together and returns
// the text to print.

use anyhow::{Context, Result};
use moneyball_core::{aggregate_team, Domain, StatTable};
use moneyball_data::season::{self, available_seasons};
use moneyball_data::{CsvDirectorySource, SnapshotCache, StatRepository, StatSource};
use tracing::info;

use crate::cli::{CacheSubcommand, Commands, SnapshotArgs};
use crate::config::Config;
use crate::report::{self, RankReport};

pub struct App<S: StatSource> {
    config: Config,
    repository: StatRepository<S>,
}

impl App<CsvDirectorySource> {
    /// Build the app from config: CSV snapshots plus the SQLite cache.
    pub fn from_config(config: Config) -> Result<Self> {
        let cache_path = config
            .cache
            .resolve_path()
            .context("failed to resolve cache path")?;
        let cache = SnapshotCache::open(&cache_path)?;
        info!("snapshot cache at {}", cache_path);
        let source = CsvDirectorySource::new(&config.data.snapshot_dir);
        let repository = StatRepository::new(source, cache);
        info!("snapshot source {}", repository.source().describe());
        Ok(Self::new(config, repository))
    }
}

impl<S: StatSource> App<S> {
    pub fn new(config: Config, repository: StatRepository<S>) -> Self {
        Self { config, repository }
    }

    /// Season from the command line, else the configured default, else the
    /// latest available season.
    fn season(&self, requested: Option<i32>) -> i32 {
        requested
            .or(self.config.display.default_season)
            .unwrap_or_else(|| season::max_season(season::today()))
    }

    fn snapshot(&self, args: &SnapshotArgs) -> Result<(i32, StatTable)> {
        let season = self.season(args.season);
        let loaded = if args.refresh {
            self.repository.refresh(args.domain, season)
        } else {
            self.repository.load(args.domain, season)
        };
        let table = loaded.with_context(|| {
            format!("failed to load {} snapshot for {}", args.domain.slug(), season)
        })?;
        Ok((season, table))
    }

    /// Rank report for one team.
    pub fn rank(&self, args: &SnapshotArgs, team: &str) -> Result<RankReport> {
        let (season, table) = self.snapshot(args)?;
        let breakdown = aggregate_team(args.domain, team, &table)
            .with_context(|| {
                format!("failed to rank {team} in {} {}", args.domain.slug(), season)
            })?;
        info!(
            "{} {} {}: overall {} of {}",
            team,
            args.domain.slug(),
            season,
            breakdown.overall.rank,
            breakdown.league_size
        );
        Ok(RankReport::build(season, breakdown, &table)?)
    }

    pub fn run(&self, command: &Commands) -> Result<String> {
        let width = self.config.display.bar_width;
        match command {
            Commands::Rank(args) => {
                let report = self.rank(&args.snapshot, &args.team)?;
                if args.json {
                    Ok(serde_json::to_string_pretty(&report)?)
                } else {
                    Ok(report::render_report(&report, width))
                }
            }
            Commands::Table(args) => {
                let (season, table) = self.snapshot(&args.snapshot)?;
                if args.json {
                    Ok(serde_json::to_string_pretty(&table)?)
                } else {
                    Ok(report::render_table(args.snapshot.domain, season, &table))
                }
            }
            Commands::Domains => Ok(report::render_domains()),
            Commands::Seasons => Ok(available_seasons(season::today())
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            Commands::Cache { command } => self.run_cache(command),
        }
    }

    fn run_cache(&self, command: &CacheSubcommand) -> Result<String> {
        let cache = self.repository.cache();
        match command {
            CacheSubcommand::List => {
                let entries = cache.entries()?;
                if entries.is_empty() {
                    return Ok("cache is empty".to_string());
                }
                Ok(entries
                    .iter()
                    .map(|e| {
                        format!(
                            "{} {:<18} {:>3} teams  {}",
                            e.season, e.domain, e.teams, e.stored_at
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            CacheSubcommand::Remove { domain, season } => {
                if cache.remove(*domain, *season)? {
                    info!("removed cached {} {}", domain.slug(), season);
                    Ok(format!("removed {} snapshot for {}", domain.slug(), season))
                } else {
                    Ok(format!("no cached {} snapshot for {}", domain.slug(), season))
                }
            }
            CacheSubcommand::Clear => {
                let n = cache.clear()?;
                info!("cleared {} cached snapshots", n);
                Ok(format!("removed {n} cached snapshots"))
            }
        }
    }

    /// Teams available for a domain and season, in table order.
    pub fn teams(&self, domain: Domain, season: i32) -> Result<Vec<String>> {
        let table = self.repository.load(domain, season)?;
        Ok(table.team_names().map(str::to_string).collect())
    }
}
