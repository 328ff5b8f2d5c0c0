//! Match profiles: the per-pool count of guessed numbers that were drawn.
//!
//! A profile is the key of a lottery's reward table and of the per-tier
//! occurrence counters. Profiles travel as strings of counts joined by `+`
//! (`"3"` for a single-pool lottery, `"5+2"` for a main pool plus a bonus
//! pool) so they can be used as JSON object keys.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator between per-pool counts in the string form.
const SEPARATOR: char = '+';

/// Errors produced when parsing a profile from its string form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseProfileError {
    /// The string contained no counts at all.
    #[error("match profile is empty")]
    Empty,

    /// A segment between separators was not a non-negative integer.
    #[error("invalid match count {segment:?} in profile {profile:?}")]
    InvalidCount {
        /// The whole profile string being parsed.
        profile: String,
        /// The offending segment.
        segment: String,
    },
}

/// Per-pool match counts for one round, in pool order.
///
/// Ordering is lexicographic over the counts, which keeps tier tables
/// sorted from "fewest matches" to "most matches" for single-pool lotteries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MatchProfile(Vec<u32>);

impl MatchProfile {
    /// Create a profile from per-pool counts.
    pub const fn new(counts: Vec<u32>) -> Self {
        Self(counts)
    }

    /// Per-pool match counts, in pool order.
    pub fn counts(&self) -> &[u32] {
        &self.0
    }

    /// Number of pools this profile describes.
    pub fn arity(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<u32>> for MatchProfile {
    fn from(counts: Vec<u32>) -> Self {
        Self(counts)
    }
}

impl core::fmt::Display for MatchProfile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for count in &self.0 {
            if !first {
                write!(f, "{SEPARATOR}")?;
            }
            write!(f, "{count}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for MatchProfile {
    type Err = ParseProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseProfileError::Empty);
        }
        trimmed
            .split(SEPARATOR)
            .map(|segment| {
                segment
                    .trim()
                    .parse::<u32>()
                    .map_err(|_err| ParseProfileError::InvalidCount {
                        profile: s.to_owned(),
                        segment: segment.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl TryFrom<String> for MatchProfile {
    type Error = ParseProfileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MatchProfile> for String {
    fn from(profile: MatchProfile) -> Self {
        profile.to_string()
    }
}
