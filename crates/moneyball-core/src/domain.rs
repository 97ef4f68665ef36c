// Metric domains and their declarative category tables.
//
// Column names follow the Baseball-Reference team pages each domain's
// snapshot is exported from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RankError;
use crate::formula::{term, Formula};
use crate::rank::RankDirection;

use RankDirection::{HigherIsBetter, LowerIsBetter};

// ---------------------------------------------------------------------------
// Domain
// ---------------------------------------------------------------------------

/// A family of team statistics with its own ranked categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    Batting,
    StartingPitching,
    ReliefPitching,
    Fielding,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Batting,
        Domain::StartingPitching,
        Domain::ReliefPitching,
        Domain::Fielding,
    ];

    /// Stable identifier used for file names and cache keys.
    pub fn slug(self) -> &'static str {
        match self {
            Domain::Batting => "batting",
            Domain::StartingPitching => "starting-pitching",
            Domain::ReliefPitching => "relief-pitching",
            Domain::Fielding => "fielding",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Domain::Batting => "Batting",
            Domain::StartingPitching => "Starting Pitching",
            Domain::ReliefPitching => "Relief Pitching",
            Domain::Fielding => "Fielding",
        }
    }

    /// Title used above the category radar.
    pub fn radar_title(self) -> &'static str {
        match self {
            Domain::Batting => "Team Ranking per Offense Category",
            Domain::StartingPitching => "Team Ranking per Rotation Category",
            Domain::ReliefPitching => "Team Ranking per Bullpen Category",
            Domain::Fielding => "Team Ranking per Defense Category",
        }
    }

    pub fn spec(self) -> &'static DomainSpec {
        match self {
            Domain::Batting => &BATTING,
            Domain::StartingPitching => &STARTING_PITCHING,
            Domain::ReliefPitching => &RELIEF_PITCHING,
            Domain::Fielding => &FIELDING,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Domain {
    type Err = RankError;

    /// Accepts slugs, display labels and the usual short forms
    /// (`sp`, `rp`, `bat`, `fld`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '_' { '-' } else { c })
            .collect();
        match key.as_str() {
            "batting" | "bat" | "hitting" => Ok(Domain::Batting),
            "starting-pitching" | "starters" | "sp" => Ok(Domain::StartingPitching),
            "relief-pitching" | "relievers" | "bullpen" | "rp" => Ok(Domain::ReliefPitching),
            "fielding" | "fld" | "defense" => Ok(Domain::Fielding),
            _ => Err(RankError::InvalidDomain(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Category tables
// ---------------------------------------------------------------------------

/// One ranked category: a display name, how to derive it, which way is up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategorySpec {
    pub name: &'static str,
    pub formula: Formula,
    pub direction: RankDirection,
}

const fn category(name: &'static str, formula: Formula, direction: RankDirection) -> CategorySpec {
    CategorySpec {
        name,
        formula,
        direction,
    }
}

/// The primary category plus the breakdown categories, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainSpec {
    pub overall: CategorySpec,
    pub breakdown: &'static [CategorySpec],
}

static BATTING: DomainSpec = DomainSpec {
    overall: category("Runs per Game", Formula::Column("R/G"), HigherIsBetter),
    breakdown: &[
        category("Batting", Formula::Column("BA"), HigherIsBetter),
        category("On Base", Formula::Column("OBP"), HigherIsBetter),
        category("Base Stealing", Formula::Difference("SB", "CS"), HigherIsBetter),
        // Share of non-homer scoring chances converted into runs.
        category(
            "Efficiency",
            Formula::Ratio {
                numerator: &[term("R", 1.0), term("HR", -1.0)],
                denominator: &[term("R", 1.0), term("HR", -1.0), term("LOB", 1.0)],
            },
            HigherIsBetter,
        ),
        category("Power", Formula::Column("HR"), HigherIsBetter),
    ],
};

static STARTING_PITCHING: DomainSpec = DomainSpec {
    overall: category("Game Score", Formula::Column("GmScA"), HigherIsBetter),
    breakdown: &[
        category("Quality Starts", Formula::Column("QS%"), HigherIsBetter),
        category(
            "Win Rate",
            Formula::Ratio {
                numerator: &[term("Wgs", 1.0)],
                denominator: &[term("Wgs", 1.0), term("Lgs", 1.0)],
            },
            HigherIsBetter,
        ),
        category("Depth", Formula::Column("IP/GS"), HigherIsBetter),
        category("Pitch Economy", Formula::Column("Pit/GS"), LowerIsBetter),
        category(
            "Dominance",
            Formula::WeightedSum(&[term("CG", 1.0), term("SHO", 2.0)]),
            HigherIsBetter,
        ),
    ],
};

static RELIEF_PITCHING: DomainSpec = DomainSpec {
    overall: category("Inherited Runners Scored", Formula::Column("IS%"), LowerIsBetter),
    breakdown: &[
        category("Save Conversion", Formula::Column("SV%"), HigherIsBetter),
        category("Holds", Formula::Column("Hold"), HigherIsBetter),
        category("Blown Saves", Formula::Column("BSv"), LowerIsBetter),
        category(
            "Win Rate",
            Formula::Ratio {
                numerator: &[term("Wgr", 1.0)],
                denominator: &[term("Wgr", 1.0), term("Lgr", 1.0)],
            },
            HigherIsBetter,
        ),
        category("Long Relief", Formula::Column("IPmult"), HigherIsBetter),
    ],
};

static FIELDING: DomainSpec = DomainSpec {
    overall: category("Fielding Runs", Formula::Column("Rtot/yr"), HigherIsBetter),
    breakdown: &[
        category("Defensive Efficiency", Formula::Column("DefEff"), HigherIsBetter),
        category("Fielding Percentage", Formula::Column("Fld%"), HigherIsBetter),
        category("Errors", Formula::Column("E"), LowerIsBetter),
        category("Double Plays", Formula::Column("DP"), HigherIsBetter),
        // Range factor per nine innings.
        category(
            "Range",
            Formula::Ratio {
                numerator: &[term("PO", 9.0), term("A", 9.0)],
                denominator: &[term("Inn", 1.0)],
            },
            HigherIsBetter,
        ),
        category("Run Prevention", Formula::Column("RA/G"), LowerIsBetter),
    ],
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MIN_CATEGORIES;

    #[test]
    fn parse_accepts_slugs_labels_and_short_forms() {
        assert_eq!("batting".parse::<Domain>(), Ok(Domain::Batting));
        assert_eq!("Starting Pitching".parse::<Domain>(), Ok(Domain::StartingPitching));
        assert_eq!("relief_pitching".parse::<Domain>(), Ok(Domain::ReliefPitching));
        assert_eq!(" RP ".parse::<Domain>(), Ok(Domain::ReliefPitching));
        assert_eq!("fld".parse::<Domain>(), Ok(Domain::Fielding));
    }

    #[test]
    fn parse_rejects_unknown_domain() {
        assert_eq!(
            "baserunning".parse::<Domain>(),
            Err(RankError::InvalidDomain("baserunning".into()))
        );
    }

    #[test]
    fn slug_round_trips_through_parse() {
        for domain in Domain::ALL {
            assert_eq!(domain.slug().parse::<Domain>(), Ok(domain));
        }
    }

    #[test]
    fn every_domain_has_enough_breakdown_categories() {
        for domain in Domain::ALL {
            assert!(
                domain.spec().breakdown.len() >= MIN_CATEGORIES,
                "{domain} has too few categories"
            );
        }
    }

    #[test]
    fn category_names_are_unique_within_a_domain() {
        for domain in Domain::ALL {
            let spec = domain.spec();
            let mut names: Vec<&str> = spec.breakdown.iter().map(|c| c.name).collect();
            names.push(spec.overall.name);
            let before = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), before, "{domain} repeats a category name");
        }
    }

    #[test]
    fn batting_breakdown_keeps_presentation_order() {
        let names: Vec<&str> = Domain::Batting.spec().breakdown.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["Batting", "On Base", "Base Stealing", "Efficiency", "Power"]
        );
        assert_eq!(Domain::Batting.spec().overall.formula, Formula::Column("R/G"));
    }

    #[test]
    fn relief_overall_is_lower_is_better() {
        let overall = Domain::ReliefPitching.spec().overall;
        assert_eq!(overall.formula, Formula::Column("IS%"));
        assert_eq!(overall.direction, LowerIsBetter);
    }

    #[test]
    fn domain_serializes_as_slug() {
        assert_eq!(
            serde_json::to_string(&Domain::StartingPitching).unwrap(),
            "\"starting-pitching\""
        );
    }
}
