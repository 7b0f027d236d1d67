//! Paper file parser.
//!
//! Loads papers (teaching plan plus question rows) from TOML or JSON files
//! and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::engine::{is_no_module, resolve_reference};
use crate::error::PaperError;
use crate::lexicon::Category;
use crate::model::{Module, Outcome, Paper, PaperInfo, RawQuestion};

/// Intermediate structure shared by the TOML and JSON forms.
#[derive(Debug, Deserialize)]
struct PaperFile {
    paper: PaperInfo,
    #[serde(default)]
    outcomes: Vec<FileOutcome>,
    #[serde(default)]
    modules: Vec<Module>,
    #[serde(default)]
    questions: Vec<FileQuestion>,
}

#[derive(Debug, Deserialize)]
struct FileOutcome {
    id: String,
    #[serde(default)]
    weight: f64,
    #[serde(default)]
    categories: Vec<String>,
    /// Single-category shorthand, used when `categories` is empty.
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileQuestion {
    #[serde(default)]
    number: Option<String>,
    text: String,
    #[serde(default)]
    marks: f64,
    #[serde(default, alias = "type")]
    question_type: Option<String>,
    outcome: String,
    #[serde(default)]
    module: Option<String>,
    #[serde(default)]
    weight: Option<f64>,
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn convert(file: PaperFile) -> Result<Paper, PaperError> {
    let outcomes = file
        .outcomes
        .into_iter()
        .map(|o| {
            if !non_negative(o.weight) {
                return Err(PaperError::InvalidOutcomeWeight {
                    outcome: o.id,
                    weight: o.weight,
                });
            }
            let categories = if o.categories.is_empty() {
                o.category.into_iter().collect()
            } else {
                o.categories
            };
            Ok(Outcome {
                id: o.id,
                weight: o.weight,
                categories,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for m in &file.modules {
        if !non_negative(m.hours) {
            return Err(PaperError::InvalidHours {
                module: m.id.clone(),
                hours: m.hours,
            });
        }
    }

    let questions = file
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            let name = q.number.clone().unwrap_or_else(|| format!("#{}", i + 1));
            if !non_negative(q.marks) {
                return Err(PaperError::InvalidMarks {
                    question: name,
                    marks: q.marks,
                });
            }
            if let Some(weight) = q.weight.filter(|w| !non_negative(*w)) {
                return Err(PaperError::InvalidQuestionWeight {
                    question: name,
                    weight,
                });
            }
            Ok(RawQuestion {
                number: q.number,
                text: q.text,
                marks: q.marks,
                question_type: q.question_type,
                outcome: q.outcome,
                module: q.module,
                weight: q.weight,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paper {
        info: file.paper,
        outcomes,
        modules: file.modules,
        questions,
    })
}

/// Parse a single paper file, choosing the format by extension.
pub fn parse_paper(path: &Path) -> Result<Paper> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read paper file: {}", path.display()))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => parse_paper_str(&content, path),
        Some("json") => parse_paper_json(&content, path),
        other => Err(PaperError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

/// Parse a TOML string into a `Paper` (useful for testing).
pub fn parse_paper_str(content: &str, source_path: &Path) -> Result<Paper> {
    let parsed: PaperFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
    convert(parsed).with_context(|| format!("invalid paper: {}", source_path.display()))
}

/// Parse a JSON string into a `Paper`.
pub fn parse_paper_json(content: &str, source_path: &Path) -> Result<Paper> {
    let parsed: PaperFile = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;
    convert(parsed).with_context(|| format!("invalid paper: {}", source_path.display()))
}

/// Recursively load all `.toml` and `.json` papers from a directory.
pub fn load_paper_directory(dir: &Path) -> Result<Vec<Paper>> {
    let mut papers = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            papers.extend(load_paper_directory(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "toml" || ext == "json")
        {
            match parse_paper(&path) {
                Ok(paper) => papers.push(paper),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(papers)
}

/// A warning from paper validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The outcome, module or question the warning concerns.
    pub subject: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a paper for common issues. None of these stop an evaluation.
pub fn validate_paper(paper: &Paper) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |subject: Option<&str>, message: String| {
        warnings.push(ValidationWarning {
            subject: subject.map(str::to_string),
            message,
        });
    };

    let mut seen = HashSet::new();
    for o in &paper.outcomes {
        if !seen.insert(o.id.to_lowercase()) {
            warn(Some(&o.id), format!("duplicate outcome ID: {}", o.id));
        }
        match o.categories.first() {
            None => warn(Some(&o.id), "no cognitive category declared".into()),
            Some(c) if c.parse::<Category>().is_err() => {
                warn(Some(&o.id), format!("unrecognized cognitive category: {c}"))
            }
            Some(_) => {}
        }
    }

    let mut seen = HashSet::new();
    for m in &paper.modules {
        if !seen.insert(m.id.to_lowercase()) {
            warn(Some(&m.id), format!("duplicate module ID: {}", m.id));
        }
    }

    if paper.outcomes.is_empty() {
        warn(None, "no outcomes declared".into());
    } else {
        let total: f64 = paper.outcomes.iter().map(|o| o.weight).sum();
        if (total - 100.0).abs() > 0.01 {
            warn(
                None,
                format!("outcome weights sum to {total}, not 100; shares will be rescaled"),
            );
        }
    }

    if !paper.modules.is_empty() && paper.modules.iter().all(|m| m.hours == 0.0) {
        warn(
            None,
            "total teaching hours is 0; module coverage will be skipped".into(),
        );
    }

    if paper.questions.is_empty() {
        warn(None, "paper has no questions".into());
    }

    let outcome_ids = paper.outcomes.iter().map(|o| o.id.as_str());
    let module_ids = paper.modules.iter().map(|m| m.id.as_str());
    for q in &paper.questions {
        let label = q.label();
        if q.text.trim().is_empty() {
            warn(Some(label), "question text is empty".into());
        }
        if resolve_reference(&q.outcome, outcome_ids.clone()).is_none() {
            warn(
                Some(label),
                format!("outcome '{}' is not declared", q.outcome),
            );
        }
        if let Some(module) = &q.module {
            if !is_no_module(module)
                && !paper.modules.is_empty()
                && resolve_reference(module, module_ids.clone()).is_none()
            {
                warn(Some(label), format!("module '{module}' is not declared"));
            }
        }
    }

    warnings
}
