//! qmetric-report: report generation for qmetric evaluations.
//!
//! Renders an [`EvaluationReport`](qmetric_core::report::EvaluationReport)
//! as a self-contained HTML page or a Markdown document.

pub mod html;
pub mod markdown;
