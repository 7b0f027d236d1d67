//! Central evaluation orchestrator.
//!
//! Builds the level map, classifies and scores every question, aggregates
//! coverage and derives recommendations. A run is synchronous and owns all
//! of its data; only the lexicon is shared.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::alignment::score_alignment;
use crate::classifier::classify;
use crate::levels::{build_level_map, LevelMap};
use crate::lexicon::Lexicon;
use crate::model::{Module, Outcome, Paper, RawQuestion};
use crate::recommend::{
    module_recommendations, outcome_recommendations, question_recommendations, Recommendations,
};
use crate::statistics::{
    aggregate, normalize_weights, LevelRollup, ModuleRollup, OutcomeRollup, ScoreBreakdown,
    ScoredQuestion,
};

/// A recovered input problem, reported alongside the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluationIssue {
    /// The question's outcome reference matches no declared outcome.
    UnresolvedOutcome { question: String, reference: String },
    /// The question's module reference matches no declared module.
    UnresolvedModule { question: String, reference: String },
    /// No trigger word was found in the question text.
    Unclassified { question: String },
}

impl fmt::Display for EvaluationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationIssue::UnresolvedOutcome { question, reference } => {
                write!(f, "{question}: outcome '{reference}' is not declared")
            }
            EvaluationIssue::UnresolvedModule { question, reference } => {
                write!(f, "{question}: module '{reference}' is not declared")
            }
            EvaluationIssue::Unclassified { question } => {
                write!(f, "{question}: no cognitive trigger word found")
            }
        }
    }
}

/// The complete result of evaluating one paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub level_map: LevelMap,
    pub questions: Vec<ScoredQuestion>,
    pub levels: Vec<LevelRollup>,
    pub outcomes: Vec<OutcomeRollup>,
    pub modules: Vec<ModuleRollup>,
    /// Question count per question-type label.
    pub question_types: BTreeMap<String, usize>,
    pub total_marks: f64,
    pub score: ScoreBreakdown,
    pub recommendations: Recommendations,
    #[serde(default)]
    pub issues: Vec<EvaluationIssue>,
}

impl Evaluation {
    pub fn final_score(&self) -> f64 {
        self.score.final_score
    }

    pub fn unclassified_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| !q.classification.is_classified())
            .count()
    }
}

/// Progress reporting trait.
pub trait EvaluationObserver {
    fn on_question_scored(&self, question: &ScoredQuestion);
    fn on_issue(&self, issue: &EvaluationIssue);
    fn on_complete(&self, evaluation: &Evaluation);
}

/// No-op observer.
pub struct NoopObserver;

impl EvaluationObserver for NoopObserver {
    fn on_question_scored(&self, _: &ScoredQuestion) {}
    fn on_issue(&self, _: &EvaluationIssue) {}
    fn on_complete(&self, _: &Evaluation) {}
}

/// First run of ASCII digits in `s`, parsed.
fn embedded_number(s: &str) -> Option<u64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Resolve a row reference against declared ids.
///
/// Exact (case-insensitive) match first, then by embedded number, so that
/// "3", "co3" and "CO 3" all resolve to "CO3".
pub fn resolve_reference<'a, I>(reference: &str, ids: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    if let Some(id) = ids
        .clone()
        .into_iter()
        .find(|id| id.eq_ignore_ascii_case(reference))
    {
        return Some(id);
    }
    let number = embedded_number(reference)?;
    ids.into_iter()
        .find(|id| embedded_number(id) == Some(number))
}

/// Module cells that mean "no module".
pub(crate) fn is_no_module(reference: &str) -> bool {
    let r = reference.trim();
    r.is_empty() || r.eq_ignore_ascii_case("n/a") || r.eq_ignore_ascii_case("na")
}

/// The evaluation engine.
pub struct Evaluator<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> Evaluator<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Evaluate a parsed paper.
    pub fn evaluate_paper(&self, paper: &Paper, observer: &dyn EvaluationObserver) -> Evaluation {
        self.evaluate(&paper.questions, &paper.outcomes, &paper.modules, observer)
    }

    /// Evaluate question rows against declared outcomes and modules.
    pub fn evaluate(
        &self,
        questions: &[RawQuestion],
        outcomes: &[Outcome],
        modules: &[Module],
        observer: &dyn EvaluationObserver,
    ) -> Evaluation {
        let level_map = build_level_map(outcomes);

        let mut weights: Vec<Option<f64>> = questions.iter().map(|q| q.weight).collect();
        normalize_weights(&mut weights);

        let outcome_ids = outcomes.iter().map(|o| o.id.as_str());
        let module_ids = modules.iter().map(|m| m.id.as_str());

        let mut issues = Vec::new();
        let mut report = |issue: EvaluationIssue| {
            tracing::warn!("{issue}");
            observer.on_issue(&issue);
            issues.push(issue);
        };

        let mut scored = Vec::with_capacity(questions.len());
        for (row, weight) in questions.iter().zip(weights) {
            let label = row.label().to_string();

            let outcome = resolve_reference(&row.outcome, outcome_ids.clone())
                .and_then(|id| outcomes.iter().find(|o| o.id == id));
            if outcome.is_none() {
                report(EvaluationIssue::UnresolvedOutcome {
                    question: label.clone(),
                    reference: row.outcome.clone(),
                });
            }

            let module_ref = row.module.as_deref().filter(|m| !is_no_module(m));
            let module_id = module_ref.and_then(|r| resolve_reference(r, module_ids.clone()));
            if let (Some(reference), None, false) = (module_ref, module_id, modules.is_empty()) {
                report(EvaluationIssue::UnresolvedModule {
                    question: label.clone(),
                    reference: reference.to_string(),
                });
            }

            let classification = classify(&row.text, &level_map, self.lexicon);
            if !classification.is_classified() {
                report(EvaluationIssue::Unclassified {
                    question: label.clone(),
                });
            }

            let expected_level = level_map.level_of(outcome.and_then(Outcome::category));
            let alignment = score_alignment(classification.level, expected_level);

            let question = ScoredQuestion {
                label,
                text: row.text.clone(),
                marks: row.marks,
                weight,
                question_type: row.question_type.clone(),
                outcome_ref: row.outcome.clone(),
                outcome_id: outcome.map(|o| o.id.clone()),
                module_ref: row.module.clone(),
                module_id: module_id.map(str::to_string),
                classification,
                expected_level,
                alignment,
            };
            tracing::debug!(
                question = %question.label,
                level = %question.classification.level,
                expected = %expected_level,
                score = alignment.score,
                "question scored"
            );
            observer.on_question_scored(&question);
            scored.push(question);
        }

        let agg = aggregate(&level_map, &scored, outcomes, modules);

        let recommendations = Recommendations {
            outcomes: outcome_recommendations(&agg.outcomes),
            modules: if agg.score.module_coverage_applied() {
                module_recommendations(&agg.modules)
            } else {
                Vec::new()
            },
            questions: question_recommendations(&scored),
        };

        let evaluation = Evaluation {
            level_map,
            questions: scored,
            levels: agg.levels,
            outcomes: agg.outcomes,
            modules: agg.modules,
            question_types: agg.question_types,
            total_marks: agg.total_marks,
            score: agg.score,
            recommendations,
            issues,
        };

        tracing::info!(
            questions = evaluation.questions.len(),
            final_score = evaluation.final_score(),
            "evaluation complete"
        );
        observer.on_complete(&evaluation);
        evaluation
    }
}

/// Evaluate with the built-in lexicon and no observer.
pub fn evaluate(questions: &[RawQuestion], outcomes: &[Outcome], modules: &[Module]) -> Evaluation {
    Evaluator::new(Lexicon::builtin()).evaluate(questions, outcomes, modules, &NoopObserver)
}
