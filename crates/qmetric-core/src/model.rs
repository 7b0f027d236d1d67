//! Core data model types for qmetric.
//!
//! A [`Paper`] bundles the teaching plan (course outcomes and module hours)
//! with the question rows that were ingested from the exam paper.

use serde::{Deserialize, Serialize};

use crate::lexicon::Category;

/// A declared course outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    /// Outcome identifier (e.g. "CO3").
    pub id: String,
    /// Expected share of the total assessment, in percent.
    pub weight: f64,
    /// Declared cognitive categories; only the first one counts.
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Outcome {
    /// The authoritative category: the first declared one, if recognized.
    pub fn category(&self) -> Option<Category> {
        self.categories.first().and_then(|c| c.parse().ok())
    }
}

/// A syllabus module with its declared teaching hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// Module identifier (e.g. "M2").
    pub id: String,
    /// Teaching hours spent on this module.
    #[serde(default)]
    pub hours: f64,
}

/// One question row as delivered by ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawQuestion {
    /// Question number as printed on the paper (e.g. "Q1a").
    #[serde(default)]
    pub number: Option<String>,
    /// Question text.
    pub text: String,
    /// Marks allotted to the question.
    pub marks: f64,
    /// Free-form question type label (e.g. "MCQ", "Long Answer").
    #[serde(default)]
    pub question_type: Option<String>,
    /// Outcome reference, matched against [`Outcome::id`].
    pub outcome: String,
    /// Module reference, matched against [`Module::id`]; "N/A" means none.
    #[serde(default)]
    pub module: Option<String>,
    /// Optional relative weight, distinct from marks.
    #[serde(default)]
    pub weight: Option<f64>,
}

impl RawQuestion {
    /// Label used in reports: the question number, else the text.
    pub fn label(&self) -> &str {
        self.number.as_deref().unwrap_or(&self.text)
    }
}

/// Descriptive metadata about the paper being evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperInfo {
    /// Unique identifier for the paper.
    pub id: String,
    /// Human-readable title.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub year_of_study: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub course_teacher: Option<String>,
}

/// A complete evaluation input: teaching plan plus questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    pub info: PaperInfo,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub questions: Vec<RawQuestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(categories: &[&str]) -> Outcome {
        Outcome {
            id: "CO1".into(),
            weight: 40.0,
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn only_first_category_is_authoritative() {
        assert_eq!(
            outcome(&["Apply", "Create"]).category(),
            Some(Category::Apply)
        );
        assert_eq!(outcome(&["bogus", "Create"]).category(), None);
        assert_eq!(outcome(&[]).category(), None);
    }

    #[test]
    fn question_label_prefers_number() {
        let mut q = RawQuestion {
            number: Some("Q2b".into()),
            text: "Define a stack.".into(),
            marks: 2.0,
            question_type: None,
            outcome: "CO1".into(),
            module: None,
            weight: None,
        };
        assert_eq!(q.label(), "Q2b");
        q.number = None;
        assert_eq!(q.label(), "Define a stack.");
    }
}
