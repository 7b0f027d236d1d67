//! The `qmetric compare` command.

use std::path::PathBuf;

use anyhow::Result;

use qmetric_core::config::load_config;
use qmetric_core::report::{EvaluationReport, ShareDelta};

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: Option<f64>,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let threshold = match threshold {
        Some(t) => t,
        None => load_config()?.regression_threshold,
    };
    anyhow::ensure!(threshold >= 0.0, "threshold must not be negative");

    let baseline = EvaluationReport::load_json(&baseline_path)?;
    let current = EvaluationReport::load_json(&current_path)?;

    let report = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            // text format
            println!(
                "Comparison: {} -> {}: final score {:.2} -> {:.2} ({:+.2})",
                report.baseline_paper,
                report.current_paper,
                report.baseline_score,
                report.current_score,
                report.delta
            );
            println!(
                "  alignment {:+.2}, coverage penalty {:+.2}",
                report.alignment_delta, report.penalty_delta
            );

            if report.has_regression() {
                println!("\nRegression: score dropped by more than {:.2} points", threshold);
            } else if report.has_improvement() {
                println!("\nImprovement: score rose by more than {:.2} points", threshold);
            }

            print_shares("Outcomes", &report.outcomes);
            print_shares("Modules", &report.modules);
        }
    }

    if fail_on_regression && report.has_regression() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_shares(title: &str, rows: &[ShareDelta]) {
    if rows.is_empty() {
        return;
    }
    println!("\n{title}:");
    for r in rows {
        match (r.baseline_share, r.drift()) {
            (Some(before), Some(drift)) => println!(
                "  {} expected {:.1}%: {:.1}% -> {:.1}% ({})",
                r.id,
                r.expected_share,
                before,
                r.current_share,
                if drift < 0.0 {
                    "closer"
                } else if drift > 0.0 {
                    "further"
                } else {
                    "unchanged"
                }
            ),
            _ => println!(
                "  {} expected {:.1}%: new, {:.1}%",
                r.id, r.expected_share, r.current_share
            ),
        }
    }
}
