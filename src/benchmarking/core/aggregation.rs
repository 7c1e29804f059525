//! Aggregation rules mapping a block of high-frequency values to one
//! low-frequency value.
use crate::benchmarking::errors::{BenchError, BenchResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How a low-frequency constraint relates to its high-frequency block.
///
/// Variants
/// --------
/// - `Sum`: constraint is the block total.
/// - `Average`: constraint is the block mean.
/// - `First` / `Last`: constraint is the first / last value of the block.
/// - `UserDefined(p)`: constraint is the value at position `p` of the block,
///   `0 ≤ p < ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AggregationType {
    #[default]
    Sum,
    Average,
    First,
    Last,
    UserDefined(usize),
}

impl AggregationType {
    /// `true` for Sum and Average.
    pub fn is_cumulative(&self) -> bool {
        matches!(self, AggregationType::Sum | AggregationType::Average)
    }

    /// Position of the observed value within a block of `ratio` periods;
    /// `None` for cumulative rules.
    pub fn position(&self, ratio: usize) -> Option<usize> {
        match self {
            AggregationType::Sum | AggregationType::Average => None,
            AggregationType::First => Some(0),
            AggregationType::Last => Some(ratio - 1),
            AggregationType::UserDefined(p) => Some(*p),
        }
    }

    /// Position within the block at which a cumulative or positional
    /// constraint is fully determined: the last period for cumulative rules,
    /// the selected period otherwise.
    pub fn observation_position(&self, ratio: usize) -> usize {
        self.position(ratio).unwrap_or(ratio - 1)
    }

    /// Value of the rule over one complete block.
    pub fn apply(&self, block: &[f64]) -> f64 {
        match self {
            AggregationType::Sum => block.iter().sum(),
            AggregationType::Average => block.iter().sum::<f64>() / block.len() as f64,
            _ => block[self.observation_position(block.len())],
        }
    }

    /// Factor bringing a constraint onto the internal "sum" scale.
    pub fn scale(&self, ratio: usize) -> f64 {
        match self {
            AggregationType::Average => ratio as f64,
            _ => 1.0,
        }
    }

    /// Check the rule against a block length.
    pub fn validate(&self, ratio: usize) -> BenchResult<()> {
        match self {
            AggregationType::UserDefined(p) if *p >= ratio => {
                Err(BenchError::InvalidPosition { position: *p, ratio })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationType::Sum => write!(f, "Sum"),
            AggregationType::Average => write!(f, "Average"),
            AggregationType::First => write!(f, "First"),
            AggregationType::Last => write!(f, "Last"),
            AggregationType::UserDefined(p) => write!(f, "UserDefined({p})"),
        }
    }
}

/// Case-insensitive parse of `Sum`, `Average`, `First`, `Last`,
/// `UserDefined` (position 0) or `UserDefined(p)`.
impl FromStr for AggregationType {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || BenchError::UnknownOption { what: "aggregation type", name: s.to_string() };
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "sum" => Ok(AggregationType::Sum),
            "average" => Ok(AggregationType::Average),
            "first" => Ok(AggregationType::First),
            "last" => Ok(AggregationType::Last),
            "userdefined" => Ok(AggregationType::UserDefined(0)),
            _ => {
                let position = name
                    .strip_prefix("userdefined(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .and_then(|p| p.trim().parse::<usize>().ok())
                    .ok_or_else(unknown)?;
                Ok(AggregationType::UserDefined(position))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Every rule must select the expected value from a block.
    //
    // Given
    // -----
    // - Block [1, 2, 3, 4].
    //
    // Expect
    // ------
    // - Sum 10, Average 2.5, First 1, Last 4, UserDefined(2) 3.
    fn apply_selects_expected_value() {
        let block = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(AggregationType::Sum.apply(&block), 10.0);
        assert_eq!(AggregationType::Average.apply(&block), 2.5);
        assert_eq!(AggregationType::First.apply(&block), 1.0);
        assert_eq!(AggregationType::Last.apply(&block), 4.0);
        assert_eq!(AggregationType::UserDefined(2).apply(&block), 3.0);
    }

    #[test]
    fn parse_is_case_insensitive_and_reads_positions() {
        assert_eq!("sum".parse::<AggregationType>().unwrap(), AggregationType::Sum);
        assert_eq!(" AVERAGE ".parse::<AggregationType>().unwrap(), AggregationType::Average);
        assert_eq!("Last".parse::<AggregationType>().unwrap(), AggregationType::Last);
        assert_eq!("UserDefined".parse::<AggregationType>().unwrap(), AggregationType::UserDefined(0));
        assert_eq!(
            "userdefined(2)".parse::<AggregationType>().unwrap(),
            AggregationType::UserDefined(2)
        );
        assert_eq!(
            AggregationType::UserDefined(3).to_string().parse::<AggregationType>().unwrap(),
            AggregationType::UserDefined(3)
        );
    }

    #[test]
    // Purpose
    // -------
    // Names outside the enumerated set are invalid operations.
    fn parse_rejects_unknown_names() {
        for name in ["Median", "userdefined(x)", "UserDefined(-1)", ""] {
            let err = name.parse::<AggregationType>().unwrap_err();
            assert!(matches!(err, BenchError::UnknownOption { .. }), "{name}: {err:?}");
        }
    }

    #[test]
    fn validate_bounds_user_position() {
        assert!(AggregationType::UserDefined(3).validate(4).is_ok());
        assert_eq!(
            AggregationType::UserDefined(4).validate(4).unwrap_err(),
            BenchError::InvalidPosition { position: 4, ratio: 4 }
        );
        assert_eq!(AggregationType::Last.observation_position(12), 11);
        assert_eq!(AggregationType::Sum.observation_position(4), 3);
        assert_eq!(AggregationType::Average.scale(3), 3.0);
    }
}
