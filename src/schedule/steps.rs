//! # Step patterns: which offsets inside a period are due.
//!
//! [`StepPattern`] is an immutable matcher used as a lookup key in the registry,
//! so it compares and hashes by value.
//!
//! - [`StepPattern::Range`] half-open arithmetic progression `start, start+step, … < stop`
//! - [`StepPattern::Set`] explicit offsets
//!
//! ## Example
//! ```rust
//! use tickcron::{StepPattern, PERIOD_MINUTE};
//!
//! // Every 15 seconds.
//! let quarter = StepPattern::range(0, PERIOD_MINUTE, 15);
//! assert!(quarter.matches(30));
//! assert!(!quarter.matches(31));
//!
//! // Twice a day, 06:30 and 22:30.
//! let daily = StepPattern::set([6 * 3600 + 30 * 60, 22 * 3600 + 30 * 60]);
//! assert!(daily.matches(23_400));
//! ```

use std::collections::BTreeSet;
use std::fmt;

use crate::error::RegistryError;

/// Rule selecting the due offsets inside a period.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepPattern {
    /// Offsets `start, start + step, …` strictly below `stop`.
    Range {
        /// First due offset.
        start: u64,
        /// Exclusive upper bound.
        stop: u64,
        /// Distance between due offsets (`>= 1`).
        step: u64,
    },
    /// Explicit set of due offsets, each in `[0, period)`.
    Set(BTreeSet<u64>),
}

impl StepPattern {
    /// Creates a range pattern (`range(start, stop, step)`).
    pub fn range(start: u64, stop: u64, step: u64) -> Self {
        StepPattern::Range { start, stop, step }
    }

    /// Creates a set pattern from any collection of offsets.
    pub fn set(offsets: impl IntoIterator<Item = u64>) -> Self {
        StepPattern::Set(offsets.into_iter().collect())
    }

    /// Single offset; shorthand for `set([offset])`.
    pub fn at(offset: u64) -> Self {
        Self::set([offset])
    }

    /// Returns `true` if `pointer` (already reduced into `[0, period)`) is due.
    #[inline]
    pub fn matches(&self, pointer: u64) -> bool {
        match self {
            StepPattern::Range { start, stop, step } => {
                pointer >= *start && pointer < *stop && (pointer - start) % step == 0
            }
            StepPattern::Set(offsets) => offsets.contains(&pointer),
        }
    }

    /// Checks the pattern against the period it will be registered with.
    ///
    /// Rejects zero steps, empty ranges, empty sets and set offsets outside
    /// the period; such patterns could never fire.
    pub(crate) fn validate(&self, period: u64) -> Result<(), RegistryError> {
        match self {
            StepPattern::Range { step: 0, .. } => Err(RegistryError::invalid(format!(
                "{self}: step must be at least 1"
            ))),
            StepPattern::Range { start, stop, .. } if start >= stop => Err(
                RegistryError::invalid(format!("{self}: empty range")),
            ),
            StepPattern::Range { start, .. } if *start >= period => Err(RegistryError::invalid(
                format!("{self}: start outside period {period}"),
            )),
            StepPattern::Range { .. } => Ok(()),
            StepPattern::Set(offsets) if offsets.is_empty() => {
                Err(RegistryError::invalid("empty offset set"))
            }
            StepPattern::Set(offsets) => match offsets.iter().find(|o| **o >= period) {
                Some(o) => Err(RegistryError::invalid(format!(
                    "offset {o} outside period {period}"
                ))),
                None => Ok(()),
            },
        }
    }
}

impl fmt::Display for StepPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepPattern::Range { start, stop, step } => {
                write!(f, "range({start}, {stop}, {step})")
            }
            StepPattern::Set(offsets) => {
                f.write_str("{")?;
                for (i, o) in offsets.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{o}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<std::ops::Range<u64>> for StepPattern {
    /// `a..b` is every offset in `[a, b)`.
    fn from(r: std::ops::Range<u64>) -> Self {
        StepPattern::range(r.start, r.end, 1)
    }
}

impl From<std::iter::StepBy<std::ops::Range<u64>>> for StepPattern {
    /// `(a..b).step_by(n)`; the iterator is consumed to recover its bounds.
    fn from(it: std::iter::StepBy<std::ops::Range<u64>>) -> Self {
        let offsets: Vec<u64> = it.collect();
        match offsets.as_slice() {
            [] => StepPattern::range(0, 0, 1),
            [only] => StepPattern::range(*only, only + 1, 1),
            [first, second, ..] => {
                let last = offsets[offsets.len() - 1];
                StepPattern::range(*first, last + 1, second - first)
            }
        }
    }
}

impl From<BTreeSet<u64>> for StepPattern {
    fn from(s: BTreeSet<u64>) -> Self {
        StepPattern::Set(s)
    }
}

impl<const N: usize> From<[u64; N]> for StepPattern {
    fn from(a: [u64; N]) -> Self {
        StepPattern::set(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_matches_progression_only() {
        let p = StepPattern::range(0, 60, 15);
        let due: Vec<u64> = (0..60).filter(|t| p.matches(*t)).collect();
        assert_eq!(due, vec![0, 15, 30, 45]);
    }

    #[test]
    fn test_range_with_offset_start() {
        let p = StepPattern::range(5, 30, 10);
        assert!(!p.matches(0));
        assert!(p.matches(5));
        assert!(p.matches(15));
        assert!(p.matches(25));
        assert!(!p.matches(35));
        assert!(!p.matches(4));
    }

    #[test]
    fn test_range_stop_is_exclusive() {
        let p = StepPattern::range(0, 30, 10);
        assert!(p.matches(20));
        assert!(!p.matches(30));
    }

    #[test]
    fn test_set_matches_members() {
        let p = StepPattern::set([1, 7, 59]);
        assert!(p.matches(7));
        assert!(p.matches(59));
        assert!(!p.matches(8));
    }

    #[test]
    fn test_patterns_compare_by_value() {
        assert_eq!(StepPattern::set([3, 1, 2]), StepPattern::set([1, 2, 3]));
        assert_eq!(
            StepPattern::range(0, 60, 15),
            StepPattern::Range {
                start: 0,
                stop: 60,
                step: 15
            }
        );
        assert_ne!(StepPattern::at(0), StepPattern::range(0, 1, 1));
    }

    #[test]
    fn test_validate_rejects_malformed() {
        assert!(StepPattern::range(0, 60, 0).validate(60).is_err());
        assert!(StepPattern::range(10, 10, 1).validate(60).is_err());
        assert!(StepPattern::range(60, 120, 1).validate(60).is_err());
        assert!(StepPattern::set([]).validate(60).is_err());
        assert!(StepPattern::set([0, 60]).validate(60).is_err());
    }

    #[test]
    fn test_validate_accepts_stop_beyond_period() {
        assert!(StepPattern::range(0, 3600, 60).validate(3600).is_ok());
        assert!(StepPattern::range(0, 100, 7).validate(60).is_ok());
        assert!(StepPattern::set([0, 59]).validate(60).is_ok());
    }

    #[test]
    fn test_from_std_ranges() {
        assert_eq!(StepPattern::from(0..60), StepPattern::range(0, 60, 1));
        assert_eq!(
            StepPattern::from((0..60).step_by(15)),
            StepPattern::range(0, 46, 15)
        );
        let p = StepPattern::from((0..60).step_by(15));
        assert!(p.matches(45));
        assert!(!p.matches(46));
    }

    #[test]
    fn test_display() {
        assert_eq!(StepPattern::range(0, 60, 15).to_string(), "range(0, 60, 15)");
        assert_eq!(StepPattern::set([5, 1]).to_string(), "{1, 5}");
    }
}
