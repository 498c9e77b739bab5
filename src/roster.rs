//! Adversary roster loading
//!
//! Each bad guy's power comes from a "snack group": a list of calorie values
//! whose sum becomes its score. Groups arrive as a flat list (or as text with
//! one value per line and a blank line between groups) and are consumed
//! front-to-back as bad guys spawn. The roster-wide maximum sum is computed
//! once here; the single group matching it produces the boss.

use thiserror::Error;

/// Roster load/validation failures.
///
/// Everything inside the running sim is a silent policy outcome; the roster
/// boundary is the one place bad input is rejected explicitly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("roster contains no snack groups")]
    Empty,
    #[error("snack group {index} is empty")]
    EmptyGroup { index: usize },
    #[error("bad calorie value {value:?} on line {line}")]
    BadValue { line: usize, value: String },
    #[error("{count} snack groups tied at the maximum sum {max}")]
    AmbiguousBoss { count: usize, max: u64 },
}

/// Validated list of snack groups plus the precomputed maximum group sum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    groups: Vec<Vec<u64>>,
    max_calories: u64,
}

impl Roster {
    /// Build a roster from raw groups, rejecting empty input
    pub fn new(groups: Vec<Vec<u64>>) -> Result<Self, RosterError> {
        if groups.is_empty() {
            return Err(RosterError::Empty);
        }
        if let Some(index) = groups.iter().position(|g| g.is_empty()) {
            return Err(RosterError::EmptyGroup { index });
        }
        let max_calories = groups
            .iter()
            .map(|g| g.iter().sum::<u64>())
            .max()
            .unwrap_or_default();
        // Exactly one group may claim the maximum: it becomes the boss
        let count = groups
            .iter()
            .filter(|g| g.iter().sum::<u64>() == max_calories)
            .count();
        if count > 1 {
            return Err(RosterError::AmbiguousBoss {
                count,
                max: max_calories,
            });
        }
        Ok(Self {
            groups,
            max_calories,
        })
    }

    /// Parse the text form: one calorie value per line, groups separated by
    /// blank lines.
    pub fn parse(text: &str) -> Result<Self, RosterError> {
        let mut groups: Vec<Vec<u64>> = Vec::new();
        let mut current: Vec<u64> = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                if !current.is_empty() {
                    groups.push(std::mem::take(&mut current));
                }
                continue;
            }
            let value = line.parse::<u64>().map_err(|_| RosterError::BadValue {
                line: i + 1,
                value: line.to_string(),
            })?;
            current.push(value);
        }
        if !current.is_empty() {
            groups.push(current);
        }
        Self::new(groups)
    }

    /// Largest group sum across the entire roster, fixed at load time
    pub fn max_calories(&self) -> u64 {
        self.max_calories
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Consume the roster, yielding the raw groups
    pub fn into_groups(self) -> Vec<Vec<u64>> {
        self.groups
    }
}
