//! Rollups, coverage penalties and the final score.
//!
//! The final score is an equal blend of two percentages:
//!
//! - the alignment score, `QP` normalized between the best and worst totals
//!   the same questions could have scored;
//! - coverage fidelity, `100 - PF%`, where `PF%` expresses the outcome (and,
//!   when teaching hours are known, module) under-coverage penalty on a scale
//!   where a penalty of 2.0 is full deduction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::alignment::{best_case, worst_case, Alignment};
use crate::classifier::Classification;
use crate::levels::{Level, LevelMap};
use crate::lexicon::Category;
use crate::model::{Module, Outcome};

/// A question after classification and alignment scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredQuestion {
    /// Question number, or the text when unnumbered.
    pub label: String,
    pub text: String,
    pub marks: f64,
    /// Relative weight after normalization, if the row carried one.
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub question_type: Option<String>,
    /// Outcome reference as written on the row.
    pub outcome_ref: String,
    /// Declared outcome the reference resolved to.
    #[serde(default)]
    pub outcome_id: Option<String>,
    #[serde(default)]
    pub module_ref: Option<String>,
    #[serde(default)]
    pub module_id: Option<String>,
    pub classification: Classification,
    /// Level the owning outcome expects.
    pub expected_level: Level,
    pub alignment: Alignment,
}

/// Questions and marks that landed on one level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelRollup {
    pub level: Level,
    /// Categories the level map places at this level.
    pub categories: Vec<Category>,
    /// Summed weight of outcomes whose category sits at this level.
    pub outcome_weight: f64,
    pub questions: usize,
    pub marks: f64,
}

/// Expected versus actual coverage of one outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRollup {
    pub id: String,
    pub weight: f64,
    #[serde(default)]
    pub category: Option<Category>,
    pub expected_level: Level,
    /// Declared weight as a percentage of total declared weight.
    pub expected_share: f64,
    pub marks: f64,
    /// Marks as a percentage of total paper marks.
    pub actual_share: f64,
    pub questions: usize,
}

/// Expected versus actual coverage of one module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleRollup {
    pub id: String,
    pub hours: f64,
    /// Hours as a percentage of total declared hours.
    pub expected_share: f64,
    pub marks: f64,
    pub actual_share: f64,
    pub questions: usize,
}

/// Every intermediate term of the final score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Sum of per-question alignment scores (QP).
    pub points: i32,
    /// Sum of worst-case scores (QPMin).
    pub min_points: i32,
    /// Sum of best-case scores (QPMax).
    pub max_points: i32,
    /// QP normalized to 0–100.
    pub alignment_score: f64,
    /// Module penalty C2; `None` when no teaching hours were declared.
    #[serde(default)]
    pub module_penalty: Option<f64>,
    /// Outcome penalty C3.
    pub outcome_penalty: f64,
    /// Combined penalty P.
    pub penalty: f64,
    /// P on a 0–100 scale.
    pub penalty_percentage: f64,
    /// Final score, 0–100, two decimals.
    pub final_score: f64,
}

impl ScoreBreakdown {
    pub fn module_coverage_applied(&self) -> bool {
        self.module_penalty.is_some()
    }
}

/// Everything the aggregator derives from scored questions.
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub levels: Vec<LevelRollup>,
    pub outcomes: Vec<OutcomeRollup>,
    pub modules: Vec<ModuleRollup>,
    pub question_types: BTreeMap<String, usize>,
    pub total_marks: f64,
    pub score: ScoreBreakdown,
}

/// Rescale optional weights to sum to 100.
///
/// Left untouched when no weight is present, or the present ones already sum
/// to 0 or 100.
pub fn normalize_weights(weights: &mut [Option<f64>]) {
    if weights.iter().all(Option::is_none) {
        return;
    }
    let sum: f64 = weights.iter().flatten().sum();
    if sum == 0.0 || sum == 100.0 || !sum.is_finite() {
        return;
    }
    for w in weights.iter_mut().flatten() {
        *w = *w / sum * 100.0;
    }
}

/// `value` as a percentage of `total`, 0 when `total` is not positive.
pub fn share(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total * 100.0
    } else {
        0.0
    }
}

/// Normalize alignment points between their theoretical bounds.
pub fn normalize_points(points: i32, min_points: i32, max_points: i32) -> f64 {
    let span = match max_points - min_points {
        0 => 1,
        d => d,
    };
    (f64::from(points - min_points) / f64::from(span) * 100.0).clamp(0.0, 100.0)
}

/// Module penalty C2: mean relative under-coverage across modules.
///
/// Over-covered modules and modules with no expected share contribute 0.
pub fn module_penalty(modules: &[ModuleRollup]) -> f64 {
    if modules.is_empty() {
        return 0.0;
    }
    let total: f64 = modules
        .iter()
        .filter(|m| m.expected_share > 0.0)
        .map(|m| (m.expected_share - m.actual_share) / m.expected_share)
        .filter(|diff| *diff >= 0.0)
        .sum();
    total / modules.len() as f64
}

/// Outcome penalty C3: mean relative under-coverage across outcomes.
pub fn outcome_penalty(outcomes: &[OutcomeRollup]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    let total: f64 = outcomes
        .iter()
        .filter(|o| o.expected_share > 0.0)
        .map(|o| (o.expected_share - o.actual_share) / o.expected_share)
        .filter(|diff| *diff > 0.0)
        .sum();
    total / outcomes.len() as f64
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Blend alignment and coverage into the final score.
pub fn compute_score(
    points: i32,
    min_points: i32,
    max_points: i32,
    module_penalty: Option<f64>,
    outcome_penalty: f64,
) -> ScoreBreakdown {
    let alignment_score = normalize_points(points, min_points, max_points);
    let penalty = match module_penalty {
        Some(c2) => (c2 + outcome_penalty) / 2.0,
        None => outcome_penalty,
    };
    let penalty_percentage = (penalty / 2.0 * 100.0).clamp(0.0, 100.0);
    let final_score = round2(((alignment_score + (100.0 - penalty_percentage)) / 2.0).clamp(0.0, 100.0));

    ScoreBreakdown {
        points,
        min_points,
        max_points,
        alignment_score,
        module_penalty,
        outcome_penalty,
        penalty,
        penalty_percentage,
        final_score,
    }
}

/// Aggregate scored questions against the teaching plan.
pub fn aggregate(
    level_map: &LevelMap,
    questions: &[ScoredQuestion],
    outcomes: &[Outcome],
    modules: &[Module],
) -> Aggregate {
    let total_marks: f64 = questions.iter().map(|q| q.marks).sum();
    let total_weight: f64 = outcomes.iter().map(|o| o.weight).sum();
    let total_hours: f64 = modules.iter().map(|m| m.hours.max(0.0)).sum();
    let hours_usable = total_hours > 0.0;

    let mut levels: Vec<LevelRollup> = Level::ASSIGNABLE
        .into_iter()
        .chain(std::iter::once(Level::UNCLASSIFIED))
        .map(|level| LevelRollup {
            level,
            categories: if level.is_classified() {
                level_map.categories_at(level)
            } else {
                Vec::new()
            },
            outcome_weight: 0.0,
            questions: 0,
            marks: 0.0,
        })
        .collect();

    for outcome in outcomes {
        if let Some(category) = outcome.category() {
            let level = level_map.level_of(Some(category));
            if let Some(rollup) = levels.iter_mut().find(|r| r.level == level) {
                rollup.outcome_weight += outcome.weight;
            }
        }
    }

    let mut outcome_rollups: Vec<OutcomeRollup> = outcomes
        .iter()
        .map(|o| OutcomeRollup {
            id: o.id.clone(),
            weight: o.weight,
            category: o.category(),
            expected_level: level_map.level_of(o.category()),
            expected_share: share(o.weight, total_weight),
            marks: 0.0,
            actual_share: 0.0,
            questions: 0,
        })
        .collect();

    let mut module_rollups: Vec<ModuleRollup> = modules
        .iter()
        .map(|m| ModuleRollup {
            id: m.id.clone(),
            hours: m.hours,
            expected_share: if hours_usable {
                share(m.hours.max(0.0), total_hours)
            } else {
                0.0
            },
            marks: 0.0,
            actual_share: 0.0,
            questions: 0,
        })
        .collect();

    let mut question_types: BTreeMap<String, usize> = BTreeMap::new();
    let (mut points, mut min_points, mut max_points) = (0i32, 0i32, 0i32);

    for q in questions {
        let label = q.question_type.as_deref().unwrap_or("Unspecified");
        *question_types.entry(label.to_string()).or_default() += 1;

        if let Some(rollup) = levels
            .iter_mut()
            .find(|r| r.level == q.classification.level)
        {
            rollup.questions += 1;
            rollup.marks += q.marks;
        }

        if let Some(id) = &q.outcome_id {
            if let Some(rollup) = outcome_rollups.iter_mut().find(|o| &o.id == id) {
                rollup.marks += q.marks;
                rollup.questions += 1;
            }
        }

        if let Some(id) = &q.module_id {
            if let Some(rollup) = module_rollups.iter_mut().find(|m| &m.id == id) {
                rollup.marks += q.marks;
                rollup.questions += 1;
            }
        }

        points += q.alignment.score;
        max_points += best_case(q.expected_level);
        min_points += worst_case(q.classification.level, q.expected_level);
    }

    for rollup in &mut outcome_rollups {
        rollup.actual_share = share(rollup.marks, total_marks);
    }
    for rollup in &mut module_rollups {
        rollup.actual_share = share(rollup.marks, total_marks);
    }

    let c2 = hours_usable.then(|| module_penalty(&module_rollups));
    let c3 = outcome_penalty(&outcome_rollups);
    let score = compute_score(points, min_points, max_points, c2, c3);

    tracing::debug!(
        points,
        min_points,
        max_points,
        module_penalty = ?c2,
        outcome_penalty = c3,
        "aggregate computed"
    );

    Aggregate {
        levels,
        outcomes: outcome_rollups,
        modules: module_rollups,
        question_types,
        total_marks,
        score,
    }
}
