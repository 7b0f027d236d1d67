//! Fixed cognitive-category vocabulary.
//!
//! The six categories of the revised Bloom's taxonomy, each with the trigger
//! words that mark a question as demanding that kind of thinking. The table is
//! a closed constant: changing it means shipping a new build, not editing
//! runtime configuration.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// A cognitive category, ordered from lowest to highest demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Remember,
    Understand,
    Apply,
    Analyze,
    Evaluate,
    Create,
}

impl Category {
    /// All categories in ascending order of cognitive demand.
    pub const ALL: [Category; 6] = [
        Category::Remember,
        Category::Understand,
        Category::Apply,
        Category::Analyze,
        Category::Evaluate,
        Category::Create,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Remember => "remember",
            Category::Understand => "understand",
            Category::Apply => "apply",
            Category::Analyze => "analyze",
            Category::Evaluate => "evaluate",
            Category::Create => "create",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remember" => Ok(Category::Remember),
            "understand" => Ok(Category::Understand),
            "apply" => Ok(Category::Apply),
            "analyze" | "analyse" => Ok(Category::Analyze),
            "evaluate" => Ok(Category::Evaluate),
            "create" => Ok(Category::Create),
            other => Err(format!("unknown cognitive category: {other}")),
        }
    }
}

const REMEMBER: &[&str] = &[
    "recall", "give", "reproduce", "memorize", "define", "identify", "describe", "label", "list",
    "name", "state", "match", "recognize", "examine", "draw", "write", "locate", "quote", "read",
    "record", "repeat", "retell", "visualize", "copy", "duplicate", "enumerate", "listen",
    "observe", "omit", "tabulate", "tell", "what", "why", "when", "where", "which",
];

const UNDERSTAND: &[&str] = &[
    "explain", "how", "interpret", "paraphrase", "summarize", "classify", "compare",
    "differentiate", "discuss", "distinguish", "extend", "predict", "associate", "contrast",
    "convert", "demonstrate", "estimate", "identify", "infer", "relate", "restate", "translate",
    "generalize", "group", "illustrate", "judge", "observe", "order", "report", "represent",
    "research", "review", "rewrite", "show", "trace",
];

const APPLY: &[&str] = &[
    "solve", "apply", "modify", "use", "calculate", "change", "demonstrate", "experiment",
    "relate", "show", "complete", "manipulate", "practice", "simulate", "transfer",
];

const ANALYZE: &[&str] = &[
    "analyze", "compare", "classify", "contrast", "distinguish", "infer", "separate",
    "categorize", "differentiate", "correlate", "deduce", "devise", "dissect", "estimate",
    "evaluate",
];

const EVALUATE: &[&str] = &[
    "evaluate", "judge", "assess", "appraise", "critique", "criticize", "discern", "discriminate",
    "consider", "weigh", "measure", "estimate", "rate", "grade", "score", "rank", "test",
    "recommend", "decide", "conclude", "argue", "debate", "justify", "persuade", "defend",
    "support", "summarize", "editorialize", "predict", "distinguish",
];

const CREATE: &[&str] = &[
    "design", "compose", "create", "plan", "combine", "formulate", "invent", "hypothesize",
    "substitute", "compile", "construct", "develop", "generalize", "integrate", "modify",
    "organize", "prepare", "produce", "rearrange", "rewrite", "adapt", "arrange", "assemble",
    "choose", "collaborate", "facilitate", "imagine", "intervene", "manage", "originate",
    "propose", "simulate", "solve", "support", "test", "validate",
];

/// Immutable word → category table.
///
/// Several words are listed under more than one category; such a word
/// belongs to the lowest category that lists it.
#[derive(Debug, Clone)]
pub struct Lexicon {
    index: HashMap<&'static str, Category>,
}

impl Lexicon {
    /// Build the lexicon from the fixed word tables.
    pub fn new() -> Self {
        let mut index = HashMap::new();
        for category in Category::ALL {
            for &word in Self::table(category) {
                index.entry(word).or_insert(category);
            }
        }
        Self { index }
    }

    /// The process-wide lexicon, built on first use.
    pub fn builtin() -> &'static Lexicon {
        static LEXICON: OnceLock<Lexicon> = OnceLock::new();
        LEXICON.get_or_init(Lexicon::new)
    }

    /// Category of an already-lowercased token, if it is a trigger word.
    pub fn category_of(&self, word: &str) -> Option<Category> {
        self.index.get(word).copied()
    }

    /// Trigger words declared for a category, in table order.
    pub fn words(&self, category: Category) -> &'static [&'static str] {
        Self::table(category)
    }

    /// Number of distinct trigger words.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn table(category: Category) -> &'static [&'static str] {
        match category {
            Category::Remember => REMEMBER,
            Category::Understand => UNDERSTAND,
            Category::Apply => APPLY,
            Category::Analyze => ANALYZE,
            Category::Evaluate => EVALUATE,
            Category::Create => CREATE,
        }
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}
