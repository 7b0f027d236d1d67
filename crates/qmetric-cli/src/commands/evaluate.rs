//! The `qmetric evaluate` command.

use std::path::PathBuf;

use anyhow::Result;

use qmetric_core::config::load_config_from;
use qmetric_core::engine::{Evaluation, EvaluationIssue, EvaluationObserver, Evaluator, NoopObserver};
use qmetric_core::lexicon::Lexicon;
use qmetric_core::parser;
use qmetric_core::report::EvaluationReport;
use qmetric_core::statistics::ScoredQuestion;
use qmetric_report::html::write_html_report;
use qmetric_report::markdown::write_markdown_report;

/// Console progress observer, used with `--verbose`.
struct ConsoleObserver;

impl EvaluationObserver for ConsoleObserver {
    fn on_question_scored(&self, q: &ScoredQuestion) {
        let word = q
            .classification
            .highest_word
            .as_deref()
            .unwrap_or("-");
        eprintln!(
            "  {} [{} marks] level {} via '{}' (expected {}): {:+}",
            q.label,
            q.marks,
            q.classification.level,
            word,
            q.expected_level,
            q.alignment.score,
        );
    }

    fn on_issue(&self, issue: &EvaluationIssue) {
        eprintln!("  WARNING: {issue}");
    }

    fn on_complete(&self, evaluation: &Evaluation) {
        eprintln!(
            "\nComplete: {} questions, {} unclassified, final score {:.2}",
            evaluation.questions.len(),
            evaluation.unclassified_count(),
            evaluation.final_score()
        );
    }
}

/// Expand the `--format` value into individual report formats.
fn resolve_formats(format: Option<&str>, configured: &[String]) -> Vec<String> {
    match format {
        Some("all") => vec!["json".into(), "html".into(), "md".into()],
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        None => configured.to_vec(),
    }
}

pub fn execute(
    paper_path: PathBuf,
    output: Option<PathBuf>,
    format: Option<String>,
    config_path: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let output = output.unwrap_or_else(|| config.output_dir.clone());
    let formats = resolve_formats(format.as_deref(), &config.formats);

    let papers = if paper_path.is_dir() {
        parser::load_paper_directory(&paper_path)?
    } else {
        vec![parser::parse_paper(&paper_path)?]
    };
    anyhow::ensure!(
        !papers.is_empty(),
        "no paper files found in {}",
        paper_path.display()
    );

    let evaluator = Evaluator::new(Lexicon::builtin());

    for paper in &papers {
        eprintln!(
            "qmetric v{}: evaluating '{}': {} questions, {} outcomes, {} modules",
            env!("CARGO_PKG_VERSION"),
            paper.info.id,
            paper.questions.len(),
            paper.outcomes.len(),
            paper.modules.len()
        );

        for w in parser::validate_paper(paper) {
            match &w.subject {
                Some(subject) => tracing::warn!(paper = %paper.info.id, "[{subject}] {}", w.message),
                None => tracing::warn!(paper = %paper.info.id, "{}", w.message),
            }
        }

        let evaluation = if verbose {
            evaluator.evaluate_paper(paper, &ConsoleObserver)
        } else {
            evaluator.evaluate_paper(paper, &NoopObserver)
        };
        let report = EvaluationReport::new(paper.info.clone(), evaluation);

        print_summary(&report);

        std::fs::create_dir_all(&output)?;
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
        let stem = format!("{}-{timestamp}", file_stem(&paper.info.id));

        for fmt in &formats {
            match fmt.as_str() {
                "json" => {
                    let path = output.join(format!("{stem}.json"));
                    report.save_json(&path)?;
                    eprintln!("Results saved to: {}", path.display());
                }
                "html" => {
                    let path = output.join(format!("{stem}.html"));
                    write_html_report(&report, &path)?;
                    eprintln!("HTML report: {}", path.display());
                }
                "md" | "markdown" => {
                    let path = output.join(format!("{stem}.md"));
                    write_markdown_report(&report, &path)?;
                    eprintln!("Markdown report: {}", path.display());
                }
                _ => {
                    eprintln!("Unknown format: {fmt}");
                }
            }
        }
    }

    Ok(())
}

/// Make a paper id safe to use in a file name.
fn file_stem(id: &str) -> String {
    let stem: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "paper".to_string()
    } else {
        stem
    }
}

fn print_summary(report: &EvaluationReport) {
    use comfy_table::{Cell, Table};

    let eval = &report.evaluation;
    let score = &eval.score;

    let mut table = Table::new();
    table.set_header(vec![
        "Paper",
        "Final Score",
        "Alignment",
        "Outcome Penalty",
        "Module Penalty",
        "Unclassified",
    ]);
    table.add_row(vec![
        Cell::new(&report.paper.id),
        Cell::new(format!("{:.2}", score.final_score)),
        Cell::new(format!("{:.1}%", score.alignment_score)),
        Cell::new(format!("{:.3}", score.outcome_penalty)),
        Cell::new(
            score
                .module_penalty
                .map(|p| format!("{p:.3}"))
                .unwrap_or_else(|| "n/a".to_string()),
        ),
        Cell::new(eval.unclassified_count()),
    ]);
    eprintln!("\n{table}");

    let mut outcomes = Table::new();
    outcomes.set_header(vec!["Outcome", "Level", "Expected", "Actual", "Suggestion"]);
    for (o, rec) in eval.outcomes.iter().zip(&eval.recommendations.outcomes) {
        outcomes.add_row(vec![
            Cell::new(&o.id),
            Cell::new(o.expected_level),
            Cell::new(format!("{:.1}%", o.expected_share)),
            Cell::new(format!("{:.1}%", o.actual_share)),
            Cell::new(&rec.suggestion),
        ]);
    }
    eprintln!("{outcomes}");
}
