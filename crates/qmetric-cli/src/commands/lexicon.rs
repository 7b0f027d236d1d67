//! The `qmetric lexicon` command.

use anyhow::Result;

use qmetric_core::lexicon::{Category, Lexicon};

pub fn execute(category: Option<String>) -> Result<()> {
    let lexicon = Lexicon::builtin();

    let categories: Vec<Category> = match category {
        Some(name) => vec![name.parse().map_err(anyhow::Error::msg)?],
        None => Category::ALL.to_vec(),
    };

    for c in categories {
        let words = lexicon.words(c);
        println!("{} ({} words)", c, words.len());
        println!("  {}", words.join(", "));
    }

    Ok(())
}
