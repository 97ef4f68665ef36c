// Derived-metric formulas over raw table columns.

use std::fmt;

use crate::error::RankError;
use crate::table::TeamRow;

/// One weighted column in a sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub column: &'static str,
    pub weight: f64,
}

pub const fn term(column: &'static str, weight: f64) -> Term {
    Term { column, weight }
}

/// How a category value is derived from a team's row.
///
/// Formulas are static data so the per-domain category tables can be
/// declared as constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Formula {
    /// The raw column value.
    Column(&'static str),
    /// `minuend - subtrahend`.
    Difference(&'static str, &'static str),
    /// `sum(weight * column)`.
    WeightedSum(&'static [Term]),
    /// `sum(numerator) / sum(denominator)`; undefined when the denominator is zero.
    Ratio {
        numerator: &'static [Term],
        denominator: &'static [Term],
    },
}

impl Formula {
    /// Evaluate against a single row.
    ///
    /// Returns [`RankError::UndefinedRatio`] for a zero (or non-finite)
    /// ratio denominator so no NaN or infinity ever reaches the rank engine.
    pub fn evaluate(&self, row: &TeamRow) -> Result<f64, RankError> {
        match *self {
            Formula::Column(column) => row.get(column),
            Formula::Difference(minuend, subtrahend) => {
                Ok(row.get(minuend)? - row.get(subtrahend)?)
            }
            Formula::WeightedSum(terms) => sum(terms, row),
            Formula::Ratio {
                numerator,
                denominator,
            } => {
                let num = sum(numerator, row)?;
                let den = sum(denominator, row)?;
                let value = num / den;
                if den == 0.0 || !value.is_finite() {
                    return Err(RankError::UndefinedRatio {
                        numerator: Terms(numerator).to_string(),
                    });
                }
                Ok(value)
            }
        }
    }

    /// Every raw column the formula reads, in first-use order.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        let mut push = |c: &'static str| {
            if !out.contains(&c) {
                out.push(c);
            }
        };
        match *self {
            Formula::Column(c) => push(c),
            Formula::Difference(a, b) => {
                push(a);
                push(b);
            }
            Formula::WeightedSum(terms) => terms.iter().for_each(|t| push(t.column)),
            Formula::Ratio {
                numerator,
                denominator,
            } => numerator
                .iter()
                .chain(denominator.iter())
                .for_each(|t| push(t.column)),
        }
        out
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Formula::Column(c) => write!(f, "{c}"),
            Formula::Difference(a, b) => write!(f, "{a} - {b}"),
            Formula::WeightedSum(terms) => write!(f, "{}", Terms(terms)),
            Formula::Ratio {
                numerator,
                denominator,
            } => write!(f, "({}) / ({})", Terms(numerator), Terms(denominator)),
        }
    }
}

fn sum(terms: &[Term], row: &TeamRow) -> Result<f64, RankError> {
    terms
        .iter()
        .try_fold(0.0, |acc, t| Ok(acc + t.weight * row.get(t.column)?))
}

/// Display adapter for a slice of terms: `R - HR + LOB`, `CG + 2*SHO`.
struct Terms(&'static [Term]);

impl fmt::Display for Terms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t) in self.0.iter().enumerate() {
            let negative = t.weight < 0.0;
            let magnitude = t.weight.abs();
            match (i, negative) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }
            if magnitude == 1.0 {
                write!(f, "{}", t.column)?;
            } else {
                write!(f, "{magnitude}*{}", t.column)?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EFFICIENCY: Formula = Formula::Ratio {
        numerator: &[term("R", 1.0), term("HR", -1.0)],
        denominator: &[term("R", 1.0), term("HR", -1.0), term("LOB", 1.0)],
    };

    const DOMINANCE: Formula = Formula::WeightedSum(&[term("CG", 1.0), term("SHO", 2.0)]);

    fn row() -> TeamRow {
        TeamRow::new("HOU")
            .with("R", 920.0)
            .with("HR", 288.0)
            .with("LOB", 1068.0)
            .with("SB", 67.0)
            .with("CS", 27.0)
            .with("CG", 3.0)
            .with("SHO", 2.0)
    }

    #[test]
    fn column_reads_raw_value() {
        assert_eq!(Formula::Column("HR").evaluate(&row()), Ok(288.0));
    }

    #[test]
    fn difference_subtracts() {
        assert_eq!(Formula::Difference("SB", "CS").evaluate(&row()), Ok(40.0));
    }

    #[test]
    fn weighted_sum_applies_weights() {
        assert_eq!(DOMINANCE.evaluate(&row()), Ok(7.0));
    }

    #[test]
    fn ratio_divides_sums() {
        let expected = (920.0 - 288.0) / (920.0 - 288.0 + 1068.0);
        assert_eq!(EFFICIENCY.evaluate(&row()), Ok(expected));
    }

    #[test]
    fn zero_denominator_is_undefined() {
        let empty = TeamRow::new("XXX").with("R", 0.0).with("HR", 0.0).with("LOB", 0.0);
        assert_eq!(
            EFFICIENCY.evaluate(&empty),
            Err(RankError::UndefinedRatio {
                numerator: "R - HR".into()
            })
        );
    }

    #[test]
    fn missing_column_propagates() {
        assert_eq!(
            Formula::Column("OBP").evaluate(&row()),
            Err(RankError::MissingColumn("OBP".into()))
        );
    }

    #[test]
    fn evaluation_is_bit_identical_across_calls() {
        let a = EFFICIENCY.evaluate(&row()).unwrap();
        let b = EFFICIENCY.evaluate(&row().clone()).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn columns_are_deduplicated_in_first_use_order() {
        assert_eq!(EFFICIENCY.columns(), vec!["R", "HR", "LOB"]);
        assert_eq!(Formula::Difference("SB", "CS").columns(), vec!["SB", "CS"]);
    }

    #[test]
    fn display_reads_like_arithmetic() {
        assert_eq!(EFFICIENCY.to_string(), "(R - HR) / (R - HR + LOB)");
        assert_eq!(DOMINANCE.to_string(), "CG + 2*SHO");
        assert_eq!(Formula::Difference("SB", "CS").to_string(), "SB - CS");
        assert_eq!(Formula::Column("R/G").to_string(), "R/G");
    }
}
