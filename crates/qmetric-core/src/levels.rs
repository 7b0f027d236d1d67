//! Ordinal level assignment from declared outcome weights.
//!
//! The category of the heaviest outcome gets level 1, the next new category
//! level 2, and so on up to the ceiling. Categories no outcome declares sit
//! at the ceiling.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lexicon::Category;
use crate::model::Outcome;

/// An ordinal cognitive level. Lower is higher priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(u8);

impl Level {
    /// Top-priority level, given to the heaviest outcome's category.
    pub const HIGHEST: Level = Level(1);
    /// Catch-all level for undeclared categories.
    pub const CEILING: Level = Level(4);
    /// Assigned to question text with no trigger word. Sits one above the
    /// ceiling so it scores no better than any classified question.
    pub const UNCLASSIFIED: Level = Level(5);

    /// Levels 1 through the ceiling, in order.
    pub const ASSIGNABLE: [Level; 4] = [Level(1), Level(2), Level(3), Level(4)];

    /// Construct a level, rejecting values outside `1..=5`.
    pub fn new(value: u8) -> Option<Level> {
        (1..=Self::UNCLASSIFIED.0).contains(&value).then_some(Level(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_classified(self) -> bool {
        self <= Self::CEILING
    }

    /// Signed distance `self - other`.
    pub fn distance(self, other: Level) -> i32 {
        i32::from(self.0) - i32::from(other.0)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_classified() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("unclassified")
        }
    }
}

/// Run-specific mapping from every category to its level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelMap(BTreeMap<Category, Level>);

impl LevelMap {
    /// Level for an outcome or question category; `None` maps to the ceiling.
    pub fn level_of(&self, category: Option<Category>) -> Level {
        category
            .and_then(|c| self.0.get(&c).copied())
            .unwrap_or(Level::CEILING)
    }

    /// Categories that share `level`, in ascending category order.
    pub fn categories_at(&self, level: Level) -> Vec<Category> {
        self.0
            .iter()
            .filter(|(_, &l)| l == level)
            .map(|(&c, _)| c)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Level)> + '_ {
        self.0.iter().map(|(&c, &l)| (c, l))
    }
}

impl Default for LevelMap {
    fn default() -> Self {
        Self(
            Category::ALL
                .into_iter()
                .map(|c| (c, Level::CEILING))
                .collect(),
        )
    }
}

/// Build the level map for one evaluation run.
///
/// Outcomes are ranked by weight, heaviest first; equal weights keep their
/// declaration order. Walking that ranking, each category seen for the first
/// time takes the next level, saturating at the ceiling.
pub fn build_level_map(outcomes: &[Outcome]) -> LevelMap {
    let mut ranked: Vec<&Outcome> = outcomes.iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    let mut assigned: BTreeMap<Category, Level> = BTreeMap::new();
    let mut next = Level::HIGHEST.get();

    for outcome in ranked {
        let Some(category) = outcome.category() else {
            tracing::debug!(outcome = %outcome.id, "no recognized category, skipping level assignment");
            continue;
        };
        if assigned.contains_key(&category) {
            continue;
        }
        assigned.insert(category, Level(next.min(Level::CEILING.get())));
        next = next.saturating_add(1);
    }

    for category in Category::ALL {
        assigned.entry(category).or_insert(Level::CEILING);
    }

    tracing::debug!(?assigned, "level map built");
    LevelMap(assigned)
}
