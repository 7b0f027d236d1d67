//! Remediation suggestions derived from the aggregator's rollups.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::alignment::Remark;
use crate::statistics::{ModuleRollup, OutcomeRollup, ScoredQuestion};

/// Direction a mark allocation should move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Increase,
    Decrease,
    Appropriate,
}

impl Verdict {
    /// Compare rounded expected and actual percentages.
    fn from_shares(expected: i64, actual: i64) -> Verdict {
        match actual.cmp(&expected) {
            Ordering::Less => Verdict::Increase,
            Ordering::Greater => Verdict::Decrease,
            Ordering::Equal => Verdict::Appropriate,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Increase => write!(f, "increase"),
            Verdict::Decrease => write!(f, "decrease"),
            Verdict::Appropriate => write!(f, "appropriate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecommendation {
    pub outcome: String,
    /// Expected share, rounded to a whole percent.
    pub expected: i64,
    /// Actual share, rounded to a whole percent.
    pub actual: i64,
    pub verdict: Verdict,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecommendation {
    pub module: String,
    pub expected: i64,
    pub actual: i64,
    pub verdict: Verdict,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecommendation {
    pub question: String,
    pub marks: f64,
    #[serde(default)]
    pub outcome: Option<String>,
    pub score: i32,
    /// Matched trigger words, comma separated.
    pub matched_words: String,
    #[serde(default)]
    pub highest_word: Option<String>,
    pub remark: Remark,
}

/// All suggestion lists for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub outcomes: Vec<OutcomeRecommendation>,
    pub modules: Vec<ModuleRecommendation>,
    pub questions: Vec<QuestionRecommendation>,
}

fn rounded(share: f64) -> i64 {
    share.round() as i64
}

pub fn outcome_recommendations(outcomes: &[OutcomeRollup]) -> Vec<OutcomeRecommendation> {
    outcomes
        .iter()
        .map(|o| {
            let expected = rounded(o.expected_share);
            let actual = rounded(o.actual_share);
            let verdict = Verdict::from_shares(expected, actual);
            let suggestion = match verdict {
                Verdict::Increase => "Increase marks",
                Verdict::Decrease => "Decrease marks",
                Verdict::Appropriate => "Marks are appropriate",
            };
            OutcomeRecommendation {
                outcome: o.id.clone(),
                expected,
                actual,
                verdict,
                suggestion: suggestion.into(),
            }
        })
        .collect()
}

/// Module suggestions; callers pass an empty slice when no hours were declared.
pub fn module_recommendations(modules: &[ModuleRollup]) -> Vec<ModuleRecommendation> {
    modules
        .iter()
        .map(|m| {
            let expected = rounded(m.expected_share);
            let actual = rounded(m.actual_share);
            let verdict = Verdict::from_shares(expected, actual);
            let suggestion = match verdict {
                Verdict::Increase => "Increase marks for this module",
                Verdict::Decrease => "Reduce marks for this module",
                Verdict::Appropriate => "Marks are appropriate",
            };
            ModuleRecommendation {
                module: m.id.clone(),
                expected,
                actual,
                verdict,
                suggestion: suggestion.into(),
            }
        })
        .collect()
}

pub fn question_recommendations(questions: &[ScoredQuestion]) -> Vec<QuestionRecommendation> {
    questions
        .iter()
        .map(|q| QuestionRecommendation {
            question: q.label.clone(),
            marks: q.marks,
            outcome: q.outcome_id.clone(),
            score: q.alignment.score,
            matched_words: q.classification.matched_words(),
            highest_word: q.classification.highest_word.clone(),
            remark: q.alignment.remark,
        })
        .collect()
}
