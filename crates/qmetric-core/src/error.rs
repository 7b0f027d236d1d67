//! Paper input error types.
//!
//! The engine never fails on well-typed input; these errors describe rows
//! that are rejected before it runs.

use thiserror::Error;

/// Problems that make a paper file unusable.
#[derive(Debug, Error, PartialEq)]
pub enum PaperError {
    /// A question carries negative or non-finite marks.
    #[error("question {question}: marks must be a non-negative number, got {marks}")]
    InvalidMarks { question: String, marks: f64 },

    /// A question weight is negative or non-finite.
    #[error("question {question}: weight must be a non-negative number, got {weight}")]
    InvalidQuestionWeight { question: String, weight: f64 },

    /// An outcome weight is negative or non-finite.
    #[error("outcome {outcome}: weight must be a non-negative number, got {weight}")]
    InvalidOutcomeWeight { outcome: String, weight: f64 },

    /// Module hours are negative or non-finite.
    #[error("module {module}: hours must be a non-negative number, got {hours}")]
    InvalidHours { module: String, hours: f64 },

    /// The paper file extension is not one we can parse.
    #[error("unsupported paper format: {0} (expected .toml or .json)")]
    UnsupportedFormat(String),
}

impl PaperError {
    /// Identifier of the offending row, if the error is tied to one.
    pub fn subject(&self) -> Option<&str> {
        match self {
            PaperError::InvalidMarks { question, .. }
            | PaperError::InvalidQuestionWeight { question, .. } => Some(question),
            PaperError::InvalidOutcomeWeight { outcome, .. } => Some(outcome),
            PaperError::InvalidHours { module, .. } => Some(module),
            PaperError::UnsupportedFormat(_) => None,
        }
    }
}
