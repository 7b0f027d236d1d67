//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn qmetric() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("qmetric").unwrap()
}

const SAMPLE_PAPER: &str = "../../papers/cs201-midterm.toml";

/// Evaluate `paper` into `out` as JSON and return the written report path.
fn evaluate_to_json(paper: &Path, out: &Path) -> PathBuf {
    qmetric()
        .arg("evaluate")
        .arg("--paper")
        .arg(paper)
        .arg("--output")
        .arg(out)
        .arg("--format")
        .arg("json")
        .assert()
        .success();

    std::fs::read_dir(out)
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| p.extension().is_some_and(|e| e == "json"))
        .expect("report written")
}

fn write_single_question_paper(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("quiz.toml");
    std::fs::write(
        &path,
        format!(
            r#"[paper]
id = "quiz"

[[outcomes]]
id = "CO1"
weight = 100
categories = ["Apply"]

[[questions]]
number = "Q1"
text = "{text}"
marks = 10
outcome = "CO1"
"#
        ),
    )
    .unwrap();
    path
}

#[test]
fn validate_sample_paper() {
    qmetric()
        .arg("validate")
        .arg("--paper")
        .arg(SAMPLE_PAPER)
        .assert()
        .success()
        .stdout(predicate::str::contains("cs201-midterm (6 questions, 3 outcomes, 3 modules)"))
        .stdout(predicate::str::contains("All papers valid"));
}

#[test]
fn validate_directory() {
    qmetric()
        .arg("validate")
        .arg("--paper")
        .arg("../../papers")
        .assert()
        .success()
        .stdout(predicate::str::contains("cs201-midterm"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("draft.toml");
    std::fs::write(
        &path,
        r#"[paper]
id = "draft"

[[outcomes]]
id = "CO1"
weight = 60
categories = ["Memorise"]

[[questions]]
number = "Q1"
text = "Define a heap."
marks = 4
outcome = "CO7"
"#,
    )
    .unwrap();

    qmetric()
        .arg("validate")
        .arg("--paper")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[CO1] WARNING: unrecognized cognitive category: Memorise"))
        .stdout(predicate::str::contains("outcome weights sum to 60, not 100"))
        .stdout(predicate::str::contains("[Q1] WARNING: outcome 'CO7' is not declared"))
        .stdout(predicate::str::contains("3 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    qmetric()
        .arg("validate")
        .arg("--paper")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_rejects_negative_marks() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(
        &path,
        r#"[paper]
id = "bad"

[[questions]]
number = "Q1"
text = "Define a stack."
marks = -2
outcome = "CO1"
"#,
    )
    .unwrap();

    qmetric()
        .arg("validate")
        .arg("--paper")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn evaluate_writes_all_formats() {
    let dir = TempDir::new().unwrap();

    qmetric()
        .arg("evaluate")
        .arg("--paper")
        .arg(SAMPLE_PAPER)
        .arg("--output")
        .arg(dir.path())
        .arg("--format")
        .arg("all")
        .assert()
        .success()
        .stderr(predicate::str::contains("Final Score"))
        .stderr(predicate::str::contains("Results saved to"))
        .stderr(predicate::str::contains("HTML report"))
        .stderr(predicate::str::contains("Markdown report"));

    let mut extensions: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| {
            e.unwrap()
                .path()
                .extension()
                .map(|x| x.to_string_lossy().into_owned())
        })
        .collect();
    extensions.sort();
    assert_eq!(extensions, vec!["html", "json", "md"]);
}

#[test]
fn evaluate_json_report_is_loadable() {
    let dir = TempDir::new().unwrap();
    let path = evaluate_to_json(Path::new(SAMPLE_PAPER), dir.path());

    let content = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["paper"]["id"], "cs201-midterm");
    assert_eq!(json["evaluation"]["questions"].as_array().unwrap().len(), 6);
    assert_eq!(json["evaluation"]["total_marks"], 40.0);

    let score = json["evaluation"]["score"]["final_score"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&score));

    let issues = json["evaluation"]["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["kind"], "unclassified");
    assert_eq!(issues[0]["question"], "Q4");
}

#[test]
fn evaluate_verbose_prints_questions() {
    let dir = TempDir::new().unwrap();

    qmetric()
        .arg("evaluate")
        .arg("--paper")
        .arg(SAMPLE_PAPER)
        .arg("--output")
        .arg(dir.path())
        .arg("--verbose")
        .assert()
        .success()
        .stderr(predicate::str::contains("Q2a [5 marks] level 1 via 'Calculate'"))
        .stderr(predicate::str::contains("Q4: no cognitive trigger word found"));
}

#[test]
fn evaluate_nonexistent_paper() {
    qmetric()
        .arg("evaluate")
        .arg("--paper")
        .arg("no_such_paper.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn compare_detects_regression() {
    let dir = TempDir::new().unwrap();

    let baseline_dir = dir.path().join("baseline");
    let paper = write_single_question_paper(dir.path(), "Calculate the load factor.");
    let baseline = evaluate_to_json(&paper, &baseline_dir);

    let current_dir = dir.path().join("current");
    let paper = write_single_question_paper(dir.path(), "Load factor of a hash table.");
    let current = evaluate_to_json(&paper, &current_dir);

    qmetric()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .assert()
        .success()
        .stdout(predicate::str::contains("100.00 -> 50.00 (-50.00)"))
        .stdout(predicate::str::contains("Regression"));

    qmetric()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .arg("--fail-on-regression")
        .assert()
        .failure();

    qmetric()
        .arg("compare")
        .arg("--baseline")
        .arg(&current)
        .arg("--current")
        .arg(&baseline)
        .arg("--fail-on-regression")
        .arg("--format")
        .arg("markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("## qmetric comparison"))
        .stdout(predicate::str::contains("### Improvement"));
}

#[test]
fn compare_nonexistent_report() {
    qmetric()
        .arg("compare")
        .arg("--baseline")
        .arg("no_such_file.json")
        .arg("--current")
        .arg("also_no_file.json")
        .assert()
        .failure();
}

#[test]
fn lexicon_lists_categories() {
    qmetric()
        .arg("lexicon")
        .assert()
        .success()
        .stdout(predicate::str::contains("remember ("))
        .stdout(predicate::str::contains("create ("));
}

#[test]
fn lexicon_single_category() {
    qmetric()
        .arg("lexicon")
        .arg("--category")
        .arg("Apply")
        .assert()
        .success()
        .stdout(predicate::str::contains("apply (15 words)"))
        .stdout(predicate::str::contains("calculate"))
        .stdout(predicate::str::contains("remember").not());
}

#[test]
fn lexicon_unknown_category() {
    qmetric()
        .arg("lexicon")
        .arg("--category")
        .arg("synthesis")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown cognitive category"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    qmetric()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created qmetric.toml"))
        .stdout(predicate::str::contains("Created papers/example.toml"));

    assert!(dir.path().join("qmetric.toml").exists());
    assert!(dir.path().join("papers/example.toml").exists());

    qmetric()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--paper")
        .arg("papers/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("All papers valid"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    qmetric()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    qmetric()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    qmetric()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exam paper quality evaluation"));
}

#[test]
fn version_output() {
    qmetric()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("qmetric"));
}
