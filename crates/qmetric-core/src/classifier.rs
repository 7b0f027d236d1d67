//! Keyword-based cognitive classification of question text.

use serde::{Deserialize, Serialize};

use crate::levels::{Level, LevelMap};
use crate::lexicon::{Category, Lexicon};

/// A trigger word found in question text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerMatch {
    /// The token as written in the question.
    pub word: String,
    pub category: Category,
    pub level: Level,
}

/// Outcome of classifying one question's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Category of the highest-priority trigger word; `None` when unclassified.
    pub category: Option<Category>,
    /// Lowest level among matches, or [`Level::UNCLASSIFIED`].
    pub level: Level,
    /// Every trigger word, in text order.
    pub matches: Vec<TriggerMatch>,
    /// The token that first reached the lowest level.
    pub highest_word: Option<String>,
}

impl Classification {
    pub fn is_classified(&self) -> bool {
        self.category.is_some()
    }

    /// Matched words joined for display, e.g. "Explain, compare".
    pub fn matched_words(&self) -> String {
        self.matches
            .iter()
            .map(|m| m.word.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Split on runs of non-word characters. Only ASCII letters, digits and `_`
/// form words.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
}

/// Classify question text against a level map.
pub fn classify(text: &str, levels: &LevelMap, lexicon: &Lexicon) -> Classification {
    let mut matches = Vec::new();
    let mut best: Option<(Level, Category, &str)> = None;

    for token in tokenize(text) {
        let Some(category) = lexicon.category_of(&token.to_lowercase()) else {
            continue;
        };
        let level = levels.level_of(Some(category));
        matches.push(TriggerMatch {
            word: token.to_string(),
            category,
            level,
        });
        if best.map_or(true, |(l, _, _)| level < l) {
            best = Some((level, category, token));
        }
    }

    match best {
        Some((level, category, word)) => Classification {
            category: Some(category),
            level,
            matches,
            highest_word: Some(word.to_string()),
        },
        None => Classification {
            category: None,
            level: Level::UNCLASSIFIED,
            matches,
            highest_word: None,
        },
    }
}
