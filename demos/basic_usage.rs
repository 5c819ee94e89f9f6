//! Bootstrap UNIHAN on first run, then look up a character and search by meaning.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p cihai-demos --example basic_usage
//! ```
//!
//! The first run downloads `Unihan.zip` from unicode.org (roughly 7 MB) into
//! the user cache directory and loads it into `cihai.db` under the user data
//! directory. Later runs reuse both.

use cihai::Cihai;

fn main() {
    let c = Cihai::new().expect("failed to build cihai");

    if !c.is_bootstrapped().expect("failed to inspect database") {
        println!("Bootstrapping Unihan database (first run only)...");
        let report = c.bootstrap_unihan().expect("bootstrap failed");
        println!(
            "  Loaded {} characters, {} fields",
            report.rows_inserted,
            report.fields.len()
        );
    }

    let unihan = c.unihan().expect("UNIHAN dataset is attached by default");

    // === Lookup ===
    println!("\n=== Lookup: 好 ===");
    match unihan.lookup_char('好').expect("lookup failed") {
        Some(row) => {
            for (column, value) in row.non_empty() {
                println!("{column:>30} {value}");
            }
        }
        None => println!("  not found"),
    }

    // === Reverse lookup ===
    println!("\n=== Reverse lookup: 'library' ===");
    let rows = unihan.reverse_char(&["library"]).expect("search failed");
    for row in rows.iter().take(10) {
        println!(
            "  {} {}",
            row.text("char").unwrap_or_default(),
            row.text("kDefinition").unwrap_or_default()
        );
    }
    println!("  ({} matches)", rows.len());
}
