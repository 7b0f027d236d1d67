//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use qmetric_core::alignment::Remark;
use qmetric_core::recommend::Verdict;
use qmetric_core::report::EvaluationReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn verdict_class(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Appropriate => "pass",
        Verdict::Increase | Verdict::Decrease => "warn",
    }
}

fn remark_class(remark: Remark) -> &'static str {
    match remark {
        Remark::Matches | Remark::Higher => "pass",
        Remark::Lower => "fail",
    }
}

/// Generate an HTML report from an evaluation report.
pub fn generate_html(report: &EvaluationReport) -> String {
    let eval = &report.evaluation;
    let title = if report.paper.name.is_empty() {
        &report.paper.id
    } else {
        &report.paper.name
    };
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>qmetric report: {}</title>\n",
        html_escape(title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>qmetric report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Paper: <strong>{}</strong> | {} questions | {} marks | {}</p>\n",
        html_escape(title),
        eval.questions.len(),
        eval.total_marks,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    let info = &report.paper;
    let details: Vec<String> = [
        ("College", &info.college),
        ("Branch", &info.branch),
        ("Year", &info.year_of_study),
        ("Semester", &info.semester),
        ("Course", &info.course_name),
        ("Code", &info.course_code),
        ("Teacher", &info.course_teacher),
    ]
    .iter()
    .filter_map(|(k, v)| v.as_ref().map(|v| format!("{k}: {}", html_escape(v))))
    .collect();
    if !details.is_empty() {
        html.push_str(&format!("<p class=\"meta\">{}</p>\n", details.join(" | ")));
    }
    html.push_str("</header>\n");

    // Key metrics
    let score = &eval.score;
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Key Metrics</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Final Score</th><th>Alignment</th><th>Coverage Penalty</th><th>Outcome Penalty</th><th>Module Penalty</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td class=\"score\">{:.2}</td><td>{:.1}%</td><td>{:.1}%</td><td>{:.3}</td><td>{}</td></tr></tbody>\n",
        score.final_score,
        score.alignment_score,
        score.penalty_percentage,
        score.outcome_penalty,
        score
            .module_penalty
            .map(|p| format!("{p:.3}"))
            .unwrap_or_else(|| "not applied".to_string()),
    ));
    html.push_str("</table>\n");
    if !eval.outcomes.is_empty() {
        html.push_str(&generate_share_chart(
            eval.outcomes
                .iter()
                .map(|o| (o.id.as_str(), o.expected_share, o.actual_share)),
        ));
    }
    html.push_str("</section>\n");

    // Level distribution
    html.push_str("<section class=\"levels\">\n");
    html.push_str("<h2>Cognitive Levels</h2>\n");
    html.push_str("<table>\n<thead><tr><th>Level</th><th>Categories</th><th>Outcome Weight</th><th>Questions</th><th>Marks</th></tr></thead>\n<tbody>\n");
    for l in &eval.levels {
        let categories = l
            .categories
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            l.level, categories, l.outcome_weight, l.questions, l.marks
        ));
    }
    html.push_str("</tbody></table>\n</section>\n");

    // Outcome coverage
    html.push_str("<section class=\"outcomes\">\n");
    html.push_str("<h2>Outcome Coverage</h2>\n");
    html.push_str("<table>\n<thead><tr><th>Outcome</th><th>Category</th><th>Expected Level</th><th>Expected %</th><th>Actual %</th><th>Marks</th><th>Suggestion</th></tr></thead>\n<tbody>\n");
    for (o, rec) in eval.outcomes.iter().zip(&eval.recommendations.outcomes) {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td><td>{:.1}%</td><td>{}</td><td class=\"{}\">{}</td></tr>\n",
            html_escape(&o.id),
            o.category.map(|c| c.as_str()).unwrap_or("-"),
            o.expected_level,
            o.expected_share,
            o.actual_share,
            o.marks,
            verdict_class(rec.verdict),
            html_escape(&rec.suggestion),
        ));
    }
    html.push_str("</tbody></table>\n</section>\n");

    // Module coverage
    html.push_str("<section class=\"modules\">\n");
    html.push_str("<h2>Module Coverage</h2>\n");
    if score.module_coverage_applied() {
        html.push_str("<table>\n<thead><tr><th>Module</th><th>Hours</th><th>Expected %</th><th>Actual %</th><th>Marks</th><th>Suggestion</th></tr></thead>\n<tbody>\n");
        for (m, rec) in eval.modules.iter().zip(&eval.recommendations.modules) {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{:.1}%</td><td>{:.1}%</td><td>{}</td><td class=\"{}\">{}</td></tr>\n",
                html_escape(&m.id),
                m.hours,
                m.expected_share,
                m.actual_share,
                m.marks,
                verdict_class(rec.verdict),
                html_escape(&rec.suggestion),
            ));
        }
        html.push_str("</tbody></table>\n");
    } else {
        html.push_str("<p class=\"meta\">No teaching hours declared; module coverage not applied.</p>\n");
    }
    html.push_str("</section>\n");

    // Per-question results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Question</th><th onclick=\"sortTable(1)\">Marks</th><th onclick=\"sortTable(2)\">Outcome</th><th onclick=\"sortTable(3)\">Trigger Words</th><th onclick=\"sortTable(4)\">Highest</th><th onclick=\"sortTable(5)\">Level</th><th onclick=\"sortTable(6)\">Score</th><th onclick=\"sortTable(7)\">Remark</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for q in &eval.recommendations.questions {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td></tr>\n",
            html_escape(&q.question),
            q.marks,
            html_escape(q.outcome.as_deref().unwrap_or("-")),
            html_escape(&q.matched_words),
            html_escape(q.highest_word.as_deref().unwrap_or("N/A")),
            eval.questions
                .iter()
                .find(|s| s.label == q.question)
                .map(|s| s.classification.level.to_string())
                .unwrap_or_default(),
            q.score,
            remark_class(q.remark),
            q.remark,
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    if !eval.issues.is_empty() {
        html.push_str("<section class=\"issues\">\n<h2>Input Issues</h2>\n<ul>\n");
        for issue in &eval.issues {
            html.push_str(&format!("<li>{}</li>\n", html_escape(&issue.to_string())));
        }
        html.push_str("</ul>\n</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &EvaluationReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

/// Paired bars of expected vs actual share, one row per id.
fn generate_share_chart<'a>(rows: impl Iterator<Item = (&'a str, f64, f64)>) -> String {
    let bar_height = 14;
    let max_width = 400;
    let padding = 10;
    let label_width = 120;

    let rows: Vec<_> = rows.collect();
    let row_height = bar_height * 2 + padding;
    let total_height = rows.len() * row_height + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (id, expected, actual)) in rows.iter().enumerate() {
        let y = i * row_height + padding;
        let bar = |share: f64| ((share.clamp(0.0, 100.0) / 100.0) * max_width as f64) as usize;
        let color = if (actual - expected).abs() < 0.5 {
            "#22c55e"
        } else if actual < expected {
            "#ef4444"
        } else {
            "#eab308"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height,
            html_escape(id)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#9ca3af\" rx=\"3\"/>\n",
            label_width,
            y,
            bar(*expected),
            bar_height
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"3\"/>\n",
            label_width,
            y + bar_height,
            bar(*actual),
            bar_height,
            color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}% / {:.1}%</text>\n",
            label_width + bar(expected.max(*actual)) + 8,
            y + bar_height,
            expected,
            actual
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --warn: #fef9c3; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --warn: #713f12; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.score { font-size: 1.5rem; font-weight: bold; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.warn { background: var(--warn); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    if (!isNaN(na) && !isNaN(nb)) return asc ? na - nb : nb - na;
    return asc ? va.localeCompare(vb) : vb.localeCompare(va);
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
