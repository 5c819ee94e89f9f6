use std::path::{Path, PathBuf};

use cihai::{Cihai, Record};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "cihai", version)]
#[command(about = "Look up CJK characters in the UNIHAN database")]
struct Cli {
    /// Path to a JSON or YAML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Log level.
    #[arg(
        long = "log-level",
        alias = "log_level",
        global = true,
        value_enum,
        ignore_case = true,
        default_value_t = LogLevel::Info
    )]
    log_level: LogLevel,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    #[value(alias = "warn")]
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Get details on a CJK character.
    Info(InfoArgs),
    /// Find characters whose fields contain any of the given words.
    Reverse(ReverseArgs),
    /// List the variants of a CJK character.
    Variants(VariantsArgs),
}

#[derive(Debug, Args)]
struct InfoArgs {
    /// The character to look up.
    char: String,
}

#[derive(Debug, Args)]
struct ReverseArgs {
    /// Words or readings to search for.
    #[arg(required = true)]
    hints: Vec<String>,
}

#[derive(Debug, Args)]
struct VariantsArgs {
    /// The character to look up.
    char: String,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(level: LogLevel) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.directive().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    let c = open(cli.config.as_deref())?;

    match cli.command {
        Command::Info(args) => run_info(&c, args),
        Command::Reverse(args) => run_reverse(&c, args),
        Command::Variants(args) => run_variants(&c, args),
    }
}

/// Builds the application and bootstraps UNIHAN on first use.
fn open(config: Option<&Path>) -> Result<Cihai, String> {
    let c = match config {
        Some(path) => Cihai::from_file(path),
        None => Cihai::new(),
    }
    .map_err(|e| e.to_string())?;
    tracing::debug!(config = ?config, "opened cihai");

    if c.is_bootstrapped().map_err(|e| e.to_string())? {
        tracing::debug!("UNIHAN store already bootstrapped");
    } else {
        println!("Bootstrapping Unihan database");
        let report = c.bootstrap_unihan().map_err(|e| e.to_string())?;
        c.reflect_db().map_err(|e| e.to_string())?;
        tracing::debug!(rows = report.rows_inserted, "UNIHAN store bootstrapped");
    }

    Ok(c)
}

fn run_info(c: &Cihai, args: InfoArgs) -> Result<(), String> {
    let ch = single_char(&args.char)?;
    let row = c
        .unihan()
        .and_then(|unihan| unihan.lookup_char(ch))
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("no UNIHAN entry for {ch}"))?;

    print!("{}", format_info(&row));
    Ok(())
}

fn run_reverse(c: &Cihai, args: ReverseArgs) -> Result<(), String> {
    let hints: Vec<&str> = args.hints.iter().map(String::as_str).collect();
    let rows = c
        .unihan()
        .and_then(|unihan| unihan.reverse_char(&hints))
        .map_err(|e| e.to_string())?;

    for row in &rows {
        println!(
            "{} {} {}",
            row.text("char").unwrap_or_default(),
            row.text("ucn").unwrap_or_default(),
            row.text("kDefinition").unwrap_or_default()
        );
    }
    Ok(())
}

fn run_variants(c: &Cihai, args: VariantsArgs) -> Result<(), String> {
    let ch = single_char(&args.char)?;
    let variants = c
        .unihan_variants()
        .and_then(|plugin| plugin.variants(ch))
        .map_err(|e| e.to_string())?;

    for variant in &variants {
        println!("{:>30} {} {}", variant.kind, variant.character, variant.ucn);
    }
    Ok(())
}

/// Renders every non-empty column as a right-aligned `name value` line.
fn format_info(row: &Record) -> String {
    row.non_empty()
        .map(|(column, value)| format!("{column:>30} {value:>60}\n"))
        .collect()
}

fn single_char(raw: &str) -> Result<char, String> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(format!("expected a single character, got {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use cihai::rusqlite::types::Value;

    use super::*;

    #[test]
    fn test_single_char() {
        assert_eq!(single_char("好").unwrap(), '好');
        assert!(single_char("").is_err());
        assert!(single_char("好的").is_err());
    }

    #[test]
    fn test_log_level_directives() {
        assert_eq!(LogLevel::Warning.directive(), "warn");
        assert_eq!(LogLevel::Critical.directive(), "error");

        let cli = Cli::try_parse_from(["cihai", "--log_level", "DEBUG", "info", "好"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        let cli = Cli::try_parse_from(["cihai", "info", "好"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Info);
    }

    #[test]
    fn test_format_info_skips_empty_columns() {
        let row = Record::new(
            "Unihan",
            vec![
                ("char".into(), Value::Text("好".into())),
                ("kDefinition".into(), Value::Text("good".into())),
                ("kZVariant".into(), Value::Null),
            ],
        );
        let out = format_info(&row);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], format!("{:>30} {:>60}", "kDefinition", "good"));
    }
}
