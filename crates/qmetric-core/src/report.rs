//! Evaluation report types with JSON persistence and comparison.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::Evaluation;
use crate::model::PaperInfo;

/// A saved evaluation of one paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// The paper that was evaluated.
    pub paper: PaperInfo,
    pub evaluation: Evaluation,
}

impl EvaluationReport {
    /// Wrap a fresh evaluation with an id and timestamp.
    pub fn new(paper: PaperInfo, evaluation: Evaluation) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            paper,
            evaluation,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: EvaluationReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this report against a baseline.
    ///
    /// A final-score drop larger than `threshold` points is a regression.
    pub fn compare(&self, baseline: &EvaluationReport, threshold: f64) -> ComparisonReport {
        let baseline_score = baseline.evaluation.final_score();
        let current_score = self.evaluation.final_score();
        let delta = current_score - baseline_score;

        let outcomes = self
            .evaluation
            .outcomes
            .iter()
            .map(|o| {
                let before = baseline
                    .evaluation
                    .outcomes
                    .iter()
                    .find(|b| b.id == o.id)
                    .map(|b| b.actual_share);
                ShareDelta {
                    id: o.id.clone(),
                    expected_share: o.expected_share,
                    baseline_share: before,
                    current_share: o.actual_share,
                }
            })
            .collect();

        let modules = self
            .evaluation
            .modules
            .iter()
            .map(|m| {
                let before = baseline
                    .evaluation
                    .modules
                    .iter()
                    .find(|b| b.id == m.id)
                    .map(|b| b.actual_share);
                ShareDelta {
                    id: m.id.clone(),
                    expected_share: m.expected_share,
                    baseline_share: before,
                    current_share: m.actual_share,
                }
            })
            .collect();

        ComparisonReport {
            baseline_paper: baseline.paper.id.clone(),
            current_paper: self.paper.id.clone(),
            baseline_score,
            current_score,
            delta,
            threshold,
            alignment_delta: self.evaluation.score.alignment_score
                - baseline.evaluation.score.alignment_score,
            penalty_delta: self.evaluation.score.penalty_percentage
                - baseline.evaluation.score.penalty_percentage,
            outcomes,
            modules,
        }
    }
}

/// Coverage share of one outcome or module in both reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareDelta {
    pub id: String,
    pub expected_share: f64,
    /// `None` when the baseline did not declare this id.
    pub baseline_share: Option<f64>,
    pub current_share: f64,
}

impl ShareDelta {
    /// Change in distance from the expected share; negative means closer.
    pub fn drift(&self) -> Option<f64> {
        self.baseline_share.map(|before| {
            (self.current_share - self.expected_share).abs()
                - (before - self.expected_share).abs()
        })
    }
}

/// Result of comparing two evaluation reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub baseline_paper: String,
    pub current_paper: String,
    pub baseline_score: f64,
    pub current_score: f64,
    /// `current_score - baseline_score`.
    pub delta: f64,
    pub threshold: f64,
    pub alignment_delta: f64,
    pub penalty_delta: f64,
    pub outcomes: Vec<ShareDelta>,
    pub modules: Vec<ShareDelta>,
}

impl ComparisonReport {
    /// Returns true if the final score dropped beyond the threshold.
    pub fn has_regression(&self) -> bool {
        self.delta < -self.threshold
    }

    /// Returns true if the final score rose beyond the threshold.
    pub fn has_improvement(&self) -> bool {
        self.delta > self.threshold
    }

    /// Render as a Markdown table (for PR comments).
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("## qmetric comparison\n\n");
        md.push_str(&format!(
            "**{}** → **{}**: {:.2} → {:.2} ({:+.2})\n\n",
            self.baseline_paper, self.current_paper, self.baseline_score, self.current_score, self.delta
        ));

        if self.has_regression() {
            md.push_str(&format!(
                "### Regression\n\nFinal score dropped by more than {:.2} points.\n\n",
                self.threshold
            ));
        } else if self.has_improvement() {
            md.push_str("### Improvement\n\n");
        }

        md.push_str("| Term | Change |\n|------|--------|\n");
        md.push_str(&format!("| Alignment | {:+.2} |\n", self.alignment_delta));
        md.push_str(&format!("| Penalty % | {:+.2} |\n", self.penalty_delta));

        for (title, rows) in [("Outcomes", &self.outcomes), ("Modules", &self.modules)] {
            if rows.is_empty() {
                continue;
            }
            md.push_str(&format!("\n### {title}\n\n"));
            md.push_str("| ID | Expected | Baseline | Current |\n|----|----------|----------|---------|\n");
            for r in rows {
                let before = r
                    .baseline_share
                    .map(|b| format!("{b:.1}%"))
                    .unwrap_or_else(|| "-".to_string());
                md.push_str(&format!(
                    "| {} | {:.1}% | {} | {:.1}% |\n",
                    r.id, r.expected_share, before, r.current_share
                ));
            }
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::evaluate;
    use crate::model::{Outcome, RawQuestion};

    fn make_report(id: &str, text: &str, marks: f64) -> EvaluationReport {
        let outcomes = vec![Outcome {
            id: "CO1".into(),
            weight: 100.0,
            categories: vec!["Apply".into()],
        }];
        let questions = vec![RawQuestion {
            number: Some("Q1".into()),
            text: text.into(),
            marks,
            question_type: None,
            outcome: "CO1".into(),
            module: None,
            weight: None,
        }];
        EvaluationReport::new(
            PaperInfo {
                id: id.into(),
                ..Default::default()
            },
            evaluate(&questions, &outcomes, &[]),
        )
    }

    #[test]
    fn compare_identical_reports() {
        let a = make_report("a", "Solve the recurrence.", 10.0);
        let b = make_report("b", "Solve the recurrence.", 10.0);
        let cmp = b.compare(&a, 1.0);
        assert_eq!(cmp.delta, 0.0);
        assert!(!cmp.has_regression());
        assert!(!cmp.has_improvement());
        assert_eq!(cmp.outcomes[0].drift(), Some(0.0));
    }

    #[test]
    fn compare_with_regression() {
        let baseline = make_report("v1", "Solve the recurrence.", 10.0);
        let current = make_report("v2", "Stacks and queues.", 10.0);
        let cmp = current.compare(&baseline, 1.0);
        assert!(cmp.delta < 0.0);
        assert!(cmp.has_regression());
        assert!(cmp.to_markdown().contains("Regression"));
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report("rt", "Solve the recurrence.", 10.0);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = EvaluationReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.paper.id, "rt");
        assert_eq!(loaded.evaluation.final_score(), report.evaluation.final_score());
        assert_eq!(loaded.evaluation.level_map, report.evaluation.level_map);
    }

    #[test]
    fn markdown_lists_outcomes() {
        let a = make_report("a", "Solve the recurrence.", 10.0);
        let md = a.compare(&a, 1.0).to_markdown();
        assert!(md.contains("| CO1 | 100.0% | 100.0% | 100.0% |"));
    }
}
