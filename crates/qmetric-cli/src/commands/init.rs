//! The `qmetric init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("qmetric.toml").exists() {
        println!("qmetric.toml already exists, skipping.");
    } else {
        std::fs::write("qmetric.toml", SAMPLE_CONFIG)?;
        println!("Created qmetric.toml");
    }

    std::fs::create_dir_all("papers")?;
    let example_path = Path::new("papers/example.toml");
    if example_path.exists() {
        println!("papers/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_PAPER)?;
        println!("Created papers/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit papers/example.toml with your course outcomes, modules and questions");
    println!("  2. Run: qmetric validate --paper papers/example.toml");
    println!("  3. Run: qmetric evaluate --paper papers/example.toml --format all");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# qmetric configuration

# Where `qmetric evaluate` writes reports. ${VAR} references are expanded.
output_dir = "./qmetric-results"

# Report formats: json, html, md
formats = ["json", "html"]

# Final-score drop (in points) that `qmetric compare` reports as a regression.
regression_threshold = 1.0
"#;

const EXAMPLE_PAPER: &str = r#"[paper]
id = "cs201-midterm"
name = "Data Structures Mid-Term Examination"
college = "Government College of Engineering"
branch = "Computer Engineering"
year_of_study = "SE"
semester = "III"
course_name = "Data Structures"
course_code = "CS201"
course_teacher = "R. Kulkarni"

[[outcomes]]
id = "CO1"
weight = 30
categories = ["Understand"]

[[outcomes]]
id = "CO2"
weight = 40
categories = ["Apply"]

[[outcomes]]
id = "CO3"
weight = 30
categories = ["Analyze"]

[[modules]]
id = "M1"
hours = 10

[[modules]]
id = "M2"
hours = 12

[[modules]]
id = "M3"
hours = 8

[[questions]]
number = "Q1a"
text = "Explain how a hash table resolves collisions using chaining."
marks = 5
type = "Theory"
outcome = "CO1"
module = "M1"

[[questions]]
number = "Q1b"
text = "Describe the difference between a stack and a queue."
marks = 5
type = "Theory"
outcome = "CO1"
module = "M1"

[[questions]]
number = "Q2a"
text = "Calculate the height of a complete binary tree with 31 nodes."
marks = 5
type = "Numerical"
outcome = "CO2"
module = "M2"

[[questions]]
number = "Q2b"
text = "Implement insertion into a binary search tree and demonstrate it on the keys 8, 3, 10, 1."
marks = 10
type = "Programming"
outcome = "CO2"
module = "M2"

[[questions]]
number = "Q3"
text = "Analyze the worst-case running time of quicksort and compare it with merge sort."
marks = 10
type = "Long Answer"
outcome = "CO3"
module = "M3"

[[questions]]
number = "Q4"
text = "Red-black tree rotations."
marks = 5
outcome = "CO3"
module = "M3"
"#;
