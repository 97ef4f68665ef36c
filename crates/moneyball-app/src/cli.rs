// Command-line interface.

use clap::{Args, Parser, Subcommand};
use moneyball_core::Domain;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "moneyball",
    version,
    about = "Rank MLB teams across batting, pitching and fielding categories"
)]
pub struct Cli {
    /// Config file (defaults to config/moneyball.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Overall rank and category breakdown for one team.
    Rank(RankArgs),
    /// The normalized league table for a domain and season.
    Table(TableArgs),
    /// List supported domains and their categories.
    Domains,
    /// List selectable seasons.
    Seasons,
    /// Inspect or prune the snapshot cache.
    Cache {
        #[command(subcommand)]
        command: CacheSubcommand,
    },
}

#[derive(Debug, Args, Clone)]
pub struct SnapshotArgs {
    #[arg(long)]
    pub season: Option<i32>,
    #[arg(long, value_parser = parse_domain)]
    pub domain: Domain,
    /// Re-read the snapshot instead of using the cached copy.
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Debug, Args, Clone)]
pub struct RankArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
    /// Team abbreviation as it appears in the snapshot (e.g. NYY).
    #[arg(long)]
    pub team: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct TableArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum CacheSubcommand {
    /// Show cached snapshots.
    List,
    /// Drop one cached snapshot.
    Remove {
        #[arg(long, value_parser = parse_domain)]
        domain: Domain,
        #[arg(long)]
        season: i32,
    },
    /// Drop every cached snapshot.
    Clear,
}

fn parse_domain(s: &str) -> Result<Domain, String> {
    s.parse::<Domain>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_rank_command() {
        let cli = Cli::try_parse_from([
            "moneyball", "rank", "--season", "2019", "--domain", "sp", "--team", "HOU", "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Rank(args) => {
                assert_eq!(args.snapshot.season, Some(2019));
                assert_eq!(args.snapshot.domain, Domain::StartingPitching);
                assert_eq!(args.team, "HOU");
                assert!(args.json);
                assert!(!args.snapshot.refresh);
            }
            other => panic!("expected rank, got {other:?}"),
        }
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["moneyball", "domains", "--config", "my.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("my.toml")));
        assert!(matches!(cli.command, Commands::Domains));
    }

    #[test]
    fn unknown_domain_is_rejected() {
        let err = Cli::try_parse_from([
            "moneyball", "table", "--domain", "baserunning",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("unsupported domain"));
    }

    #[test]
    fn parses_cache_remove() {
        let cli = Cli::try_parse_from([
            "moneyball", "cache", "remove", "--domain", "fielding", "--season", "2019",
        ])
        .unwrap();
        match cli.command {
            Commands::Cache {
                command: CacheSubcommand::Remove { domain, season },
            } => {
                assert_eq!(domain, Domain::Fielding);
                assert_eq!(season, 2019);
            }
            other => panic!("expected cache remove, got {other:?}"),
        }
    }

    #[test]
    fn cache_command_has_help_text() {
        use clap::CommandFactory;
        let cmd = Cli::command();
        let cache = cmd.find_subcommand("cache").unwrap();
        assert!(cache.get_about().is_some());
    }

    #[test]
    fn parses_cache_clear() {
        let cli = Cli::try_parse_from(["moneyball", "cache", "clear"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cache {
                command: CacheSubcommand::Clear
            }
        ));
    }
}
