//! Markdown report generator.

use anyhow::Result;
use std::path::Path;

use qmetric_core::report::EvaluationReport;

/// Escape pipe characters so text stays inside its table cell.
fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Generate a Markdown report from an evaluation report.
pub fn generate_markdown(report: &EvaluationReport) -> String {
    let eval = &report.evaluation;
    let score = &eval.score;
    let mut md = String::new();

    let title = if report.paper.name.is_empty() {
        report.paper.id.as_str()
    } else {
        report.paper.name.as_str()
    };
    md.push_str(&format!("# qmetric report: {}\n\n", title));
    md.push_str(&format!(
        "Evaluated {} ({} questions, {} marks).\n\n",
        report.created_at.format("%Y-%m-%d %H:%M UTC"),
        eval.questions.len(),
        eval.total_marks
    ));
    if let Some(code) = &report.paper.course_code {
        md.push_str(&format!("Course code: {code}\n\n"));
    }

    md.push_str("## Score\n\n");
    md.push_str("| Metric | Value |\n|---|---|\n");
    md.push_str(&format!("| Final score | {:.2} |\n", score.final_score));
    md.push_str(&format!(
        "| Alignment | {:.1}% ({} points, range {}..{}) |\n",
        score.alignment_score, score.points, score.min_points, score.max_points
    ));
    md.push_str(&format!("| Outcome penalty | {:.3} |\n", score.outcome_penalty));
    match score.module_penalty {
        Some(p) => md.push_str(&format!("| Module penalty | {p:.3} |\n")),
        None => md.push_str("| Module penalty | not applied |\n"),
    }
    md.push_str(&format!(
        "| Coverage penalty | {:.1}% |\n\n",
        score.penalty_percentage
    ));

    md.push_str("## Outcomes\n\n");
    md.push_str("| Outcome | Level | Expected | Actual | Suggestion |\n|---|---|---|---|---|\n");
    for (o, rec) in eval.outcomes.iter().zip(&eval.recommendations.outcomes) {
        md.push_str(&format!(
            "| {} | {} | {:.1}% | {:.1}% | {} |\n",
            cell(&o.id),
            o.expected_level,
            o.expected_share,
            o.actual_share,
            rec.suggestion
        ));
    }
    md.push('\n');

    if score.module_coverage_applied() {
        md.push_str("## Modules\n\n");
        md.push_str("| Module | Hours | Expected | Actual | Suggestion |\n|---|---|---|---|---|\n");
        for (m, rec) in eval.modules.iter().zip(&eval.recommendations.modules) {
            md.push_str(&format!(
                "| {} | {} | {:.1}% | {:.1}% | {} |\n",
                cell(&m.id),
                m.hours,
                m.expected_share,
                m.actual_share,
                rec.suggestion
            ));
        }
        md.push('\n');
    }

    md.push_str("## Questions\n\n");
    md.push_str("| Question | Marks | Trigger words | Highest | Score | Remark |\n|---|---|---|---|---|---|\n");
    for q in &eval.recommendations.questions {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            cell(&q.question),
            q.marks,
            cell(&q.matched_words),
            q.highest_word.as_deref().unwrap_or("N/A"),
            q.score,
            q.remark
        ));
    }

    if !eval.question_types.is_empty() {
        md.push_str("\n## Question types\n\n");
        for (kind, count) in &eval.question_types {
            md.push_str(&format!("- {}: {}\n", kind, count));
        }
    }

    if !eval.issues.is_empty() {
        md.push_str("\n## Issues\n\n");
        for issue in &eval.issues {
            md.push_str(&format!("- {issue}\n"));
        }
    }

    md
}

/// Write a Markdown report to a file.
pub fn write_markdown_report(report: &EvaluationReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, generate_markdown(report))?;
    Ok(())
}
