//! The `qmetric validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(paper_path: PathBuf) -> Result<()> {
    let papers = if paper_path.is_dir() {
        qmetric_core::parser::load_paper_directory(&paper_path)?
    } else {
        vec![qmetric_core::parser::parse_paper(&paper_path)?]
    };

    let mut total_warnings = 0;

    for paper in &papers {
        println!(
            "Paper: {} ({} questions, {} outcomes, {} modules)",
            paper.info.id,
            paper.questions.len(),
            paper.outcomes.len(),
            paper.modules.len()
        );

        let warnings = qmetric_core::parser::validate_paper(paper);
        for w in &warnings {
            let prefix = w
                .subject
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All papers valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
