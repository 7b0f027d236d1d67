//! Alignment between a question's level and its outcome's expected level.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::levels::Level;

/// How a question's demand compares with what its outcome expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remark {
    Matches,
    Higher,
    Lower,
}

impl Remark {
    pub fn as_str(&self) -> &'static str {
        match self {
            Remark::Matches => "Matches Expected Level",
            Remark::Higher => "Higher than Expected Level",
            Remark::Lower => "Lower than Expected Level",
        }
    }
}

impl fmt::Display for Remark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed score plus remark for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub score: i32,
    pub remark: Remark,
}

/// Score a question level against the expected level.
///
/// With `D = question - expected`: one tier harder or an exact match scores 1,
/// more than one tier harder scores 2, and any easier tier scores -1.
pub fn score_alignment(question: Level, expected: Level) -> Alignment {
    match question.distance(expected) {
        0 | -1 => Alignment {
            score: 1,
            remark: Remark::Matches,
        },
        d if d < -1 => Alignment {
            score: 2,
            remark: Remark::Higher,
        },
        _ => Alignment {
            score: -1,
            remark: Remark::Lower,
        },
    }
}

/// Best score any question could earn against `expected`.
pub fn best_case(expected: Level) -> i32 {
    score_alignment(Level::HIGHEST, expected).score
}

/// Worst score a question at `question` could have earned against `expected`.
///
/// Classified questions are floored at the ceiling level; an unclassified
/// question is its own floor.
pub fn worst_case(question: Level, expected: Level) -> i32 {
    score_alignment(question.max(Level::CEILING), expected).score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(n: u8) -> Level {
        Level::new(n).unwrap()
    }

    #[test]
    fn alignment_table() {
        assert_eq!(
            score_alignment(level(3), level(3)),
            Alignment { score: 1, remark: Remark::Matches }
        );
        assert_eq!(
            score_alignment(level(1), level(4)),
            Alignment { score: 2, remark: Remark::Higher }
        );
        assert_eq!(
            score_alignment(level(4), level(1)),
            Alignment { score: -1, remark: Remark::Lower }
        );
    }

    #[test]
    fn one_tier_harder_still_matches() {
        let a = score_alignment(level(2), level(3));
        assert_eq!(a.score, 1);
        assert_eq!(a.remark, Remark::Matches);
    }

    #[test]
    fn easier_is_penalized_uniformly() {
        assert_eq!(score_alignment(level(2), level(1)).score, -1);
        assert_eq!(score_alignment(level(4), level(1)).score, -1);
        assert_eq!(score_alignment(Level::UNCLASSIFIED, level(4)).score, -1);
    }

    #[test]
    fn remark_strings() {
        assert_eq!(Remark::Matches.to_string(), "Matches Expected Level");
        assert_eq!(Remark::Higher.to_string(), "Higher than Expected Level");
        assert_eq!(Remark::Lower.to_string(), "Lower than Expected Level");
    }

    #[test]
    fn bounds_enclose_every_level() {
        for e in 1..=4 {
            let expected = level(e);
            for q in 1..=5 {
                let question = level(q);
                let s = score_alignment(question, expected).score;
                assert!(s <= best_case(expected));
                assert!(s >= worst_case(question, expected));
            }
        }
    }

    #[test]
    fn worst_case_for_classified_uses_ceiling() {
        assert_eq!(worst_case(level(1), level(4)), 1);
        assert_eq!(worst_case(level(2), level(2)), -1);
        assert_eq!(worst_case(Level::UNCLASSIFIED, level(4)), -1);
    }
}
