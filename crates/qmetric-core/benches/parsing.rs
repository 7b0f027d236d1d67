use criterion::{black_box, criterion_group, criterion_main, Criterion};

use qmetric_core::parser::{parse_paper_json, parse_paper_str};

fn bench_paper_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("paper_parsing");

    let small = generate_paper_toml(10);
    let large = generate_paper_toml(200);

    group.bench_function("toml_10_questions", |b| {
        b.iter(|| parse_paper_str(black_box(&small), black_box("bench.toml".as_ref())))
    });

    group.bench_function("toml_200_questions", |b| {
        b.iter(|| parse_paper_str(black_box(&large), black_box("bench.toml".as_ref())))
    });

    let json = generate_paper_json(200);
    group.bench_function("json_200_questions", |b| {
        b.iter(|| parse_paper_json(black_box(&json), black_box("bench.json".as_ref())))
    });

    group.finish();
}

fn generate_paper_toml(n: usize) -> String {
    let mut s = String::new();
    s.push_str(
        r#"[paper]
id = "bench"
name = "Benchmark"

[[outcomes]]
id = "CO1"
weight = 60
categories = ["Understand"]

[[outcomes]]
id = "CO2"
weight = 40
categories = ["Apply"]

[[modules]]
id = "M1"
hours = 12
"#,
    );
    for i in 0..n {
        s.push_str(&format!(
            r#"
[[questions]]
number = "Q{i}"
text = "Explain and solve problem {i}."
marks = {marks}
type = "Short"
outcome = "CO{co}"
module = "M1"
"#,
            marks = i % 5 + 1,
            co = i % 2 + 1,
        ));
    }
    s
}

fn generate_paper_json(n: usize) -> String {
    let questions: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"number":"Q{i}","text":"Explain and solve problem {i}.","marks":{},"outcome":"CO{}"}}"#,
                i % 5 + 1,
                i % 2 + 1
            )
        })
        .collect();
    format!(
        r#"{{"paper":{{"id":"bench"}},"outcomes":[{{"id":"CO1","weight":60,"categories":["Understand"]}},{{"id":"CO2","weight":40,"categories":["Apply"]}}],"questions":[{}]}}"#,
        questions.join(",")
    )
}

criterion_group!(benches, bench_paper_parsing);
criterion_main!(benches);
