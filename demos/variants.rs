//! Traditional, simplified and semantic variants of a few characters.
//!
//! Loads only the fields this demo needs, into a separate database.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p cihai-demos --example variants
//! ```

use cihai::Cihai;

const CONFIG: &str = r#"
database:
  url: "sqlite:///{user_data_dir}/variants-demo.db"
unihan_options:
  fields:
    - kDefinition
    - kTraditionalVariant
    - kSimplifiedVariant
    - kSemanticVariant
    - kSpecializedSemanticVariant
    - kZVariant
"#;

fn main() {
    let config = serde_yaml::from_str(CONFIG).expect("demo config is valid YAML");
    let c = Cihai::builder()
        .config(config)
        .build()
        .expect("failed to build cihai");

    if !c.is_bootstrapped().expect("failed to inspect database") {
        println!("Bootstrapping Unihan database (variant fields only)...");
        c.bootstrap_unihan().expect("bootstrap failed");
    }

    let variants = c
        .unihan_variants()
        .expect("variants plugin is attached by default");

    for ch in ['乾', '干', '說', '鐵'] {
        println!("\n=== {ch} ===");
        let found = variants.variants(ch).expect("variant lookup failed");
        if found.is_empty() {
            println!("  (no variants)");
        }
        for variant in found {
            let sources = if variant.sources.is_empty() {
                String::new()
            } else {
                format!("  [{}]", variant.sources.join(", "))
            };
            println!(
                "{:>22} {} {}{sources}",
                variant.kind, variant.character, variant.ucn
            );
        }
    }
}
