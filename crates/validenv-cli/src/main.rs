//! Command-line front end: print a sample dotenv for a schema, or check a
//! dotenv file against one and print the merged config.

use anyhow::Context;
use clap::Parser;
use log::{LevelFilter, info, warn};
use std::path::PathBuf;
use validenv_cli::{check_dotenv, sample_config};
use validenv_config::{ProcessEnv, Strictness};

/// Command-line options for the validenv tool.
#[derive(Parser)]
#[command(name = "validenv", version)]
struct Cli {
    /// Path to a JSON or JSON5 schema file
    schema: PathBuf,
    /// Dotenv file to check; prints a sample config when omitted
    dotenv: Option<PathBuf>,
    /// Strictness level (full, warn or none); read from the environment when unset
    #[arg(long, value_parser = parse_strictness)]
    strictness: Option<Strictness>,
}

fn parse_strictness(raw: &str) -> Result<Strictness, String> {
    raw.parse::<Strictness>().map_err(|err| err.to_string())
}

fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    info!(
        "starting validenv (schema={}, dotenv={:?}, strictness={:?})",
        cli.schema.display(),
        cli.dotenv,
        cli.strictness
    );

    let Some(dotenv) = cli.dotenv else {
        let sample = sample_config(&cli.schema)?;
        println!("{sample}");
        return Ok(());
    };

    let report = check_dotenv(&cli.schema, &dotenv, cli.strictness, &ProcessEnv)
        .context("config check failed")?;
    if !report.unknown_keys.is_empty() {
        warn!(
            "{} key(s) in {} are not declared in the schema",
            report.unknown_keys.len(),
            dotenv.display()
        );
    }
    println!("{}", report.to_pretty_json()?);
    Ok(())
}
