//! Regression detection integration tests.
//!
//! Tests the report comparison workflow end-to-end, including
//! JSON persistence, report loading, and regression detection.

use qmetric_core::engine::evaluate;
use qmetric_core::model::{Module, Outcome, PaperInfo, RawQuestion};
use qmetric_core::report::EvaluationReport;

fn outcomes() -> Vec<Outcome> {
    vec![
        Outcome {
            id: "CO1".into(),
            weight: 50.0,
            categories: vec!["Understand".into()],
        },
        Outcome {
            id: "CO2".into(),
            weight: 50.0,
            categories: vec!["Apply".into()],
        },
    ]
}

fn modules() -> Vec<Module> {
    vec![
        Module {
            id: "M1".into(),
            hours: 10.0,
        },
        Module {
            id: "M2".into(),
            hours: 10.0,
        },
    ]
}

fn question(number: &str, text: &str, marks: f64, outcome: &str, module: &str) -> RawQuestion {
    RawQuestion {
        number: Some(number.into()),
        text: text.into(),
        marks,
        question_type: None,
        outcome: outcome.into(),
        module: Some(module.into()),
        weight: None,
    }
}

fn make_report(id: &str, questions: Vec<RawQuestion>) -> EvaluationReport {
    EvaluationReport::new(
        PaperInfo {
            id: id.into(),
            ..Default::default()
        },
        evaluate(&questions, &outcomes(), &modules()),
    )
}

fn balanced() -> EvaluationReport {
    make_report(
        "balanced",
        vec![
            question("Q1", "Explain virtual memory.", 10.0, "CO1", "M1"),
            question("Q2", "Calculate the page fault rate.", 10.0, "CO2", "M2"),
        ],
    )
}

fn lopsided() -> EvaluationReport {
    make_report(
        "lopsided",
        vec![
            question("Q1", "Explain virtual memory.", 18.0, "CO1", "M1"),
            question("Q2", "Calculate the page fault rate.", 2.0, "CO2", "M1"),
        ],
    )
}

#[test]
fn detect_coverage_regression() {
    let baseline = balanced();
    let current = lopsided();
    let cmp = current.compare(&baseline, 1.0);

    assert!(cmp.delta < 0.0);
    assert!(cmp.has_regression());
    assert!(!cmp.has_improvement());
    assert_eq!(cmp.alignment_delta, 0.0);
    assert!(cmp.penalty_delta > 0.0);

    let co2 = cmp.outcomes.iter().find(|o| o.id == "CO2").unwrap();
    assert_eq!(co2.baseline_share, Some(50.0));
    assert!((co2.current_share - 10.0).abs() < 1e-9);
    assert!(co2.drift().unwrap() > 0.0);
}

#[test]
fn identical_reports_have_no_regression() {
    let cmp = balanced().compare(&balanced(), 0.0);
    assert_eq!(cmp.delta, 0.0);
    assert!(!cmp.has_regression());
    assert!(!cmp.has_improvement());
    assert!(cmp.outcomes.iter().all(|o| o.drift() == Some(0.0)));
}

#[test]
fn threshold_absorbs_small_drops() {
    let baseline = balanced();
    let current = lopsided();
    let drop = baseline.evaluation.final_score() - current.evaluation.final_score();

    assert!(!current.compare(&baseline, drop + 0.5).has_regression());
    assert!(current.compare(&baseline, drop - 0.5).has_regression());
}

#[test]
fn report_survives_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("balanced.json");

    let report = balanced();
    report.save_json(&path).unwrap();
    let loaded = EvaluationReport::load_json(&path).unwrap();

    assert_eq!(loaded.id, report.id);
    assert_eq!(loaded.paper, report.paper);
    assert_eq!(loaded.evaluation.final_score(), report.evaluation.final_score());
    assert_eq!(loaded.evaluation.questions.len(), 2);

    let cmp = loaded.compare(&report, 0.0);
    assert_eq!(cmp.delta, 0.0);
}

#[test]
fn markdown_comparison_lists_shares() {
    let cmp = lopsided().compare(&balanced(), 1.0);
    let md = cmp.to_markdown();

    assert!(md.contains("## qmetric comparison"));
    assert!(md.contains("### Regression"));
    assert!(md.contains("| CO2 | 50.0% | 50.0% | 10.0% |"));
    assert!(md.contains("| M2 | 50.0% | 50.0% | 0.0% |"));
}
