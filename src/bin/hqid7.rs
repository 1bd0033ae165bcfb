//! Command that generates hqid7 strings or breaks one down into its fields

use std::{
    fmt::Write as _,
    io::{self, Write as _},
};

use anyhow::Context;
use chrono::{DateTime, Local, Utc};
use clap::{CommandFactory, Parser, Subcommand};
use hqid7::Hqid7;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "HQID7_LOG";

/// Generate and inspect hqid7 identifiers.
#[derive(Debug, Parser)]
#[command(name = "hqid7", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate and print new hqid7 strings
    #[command(visible_alias = "generate")]
    New {
        /// Number of identifiers to print
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Parse an hqid7 and show its timestamp and random parts
    Parse {
        /// The 22-character hqid7 string
        id: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed arguments");

    match cli.command {
        Some(Command::New { count }) => generate(count),
        Some(Command::Parse { id }) => parse(&id),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

fn generate(count: usize) -> anyhow::Result<()> {
    let mut buf = io::BufWriter::new(io::stdout().lock());
    for _ in 0..count {
        let id = hqid7::hqid7().context("failed to generate hqid7")?;
        writeln!(buf, "{id}")?;
    }
    buf.flush()?;
    Ok(())
}

fn parse(src: &str) -> anyhow::Result<()> {
    let id = src
        .parse::<Hqid7>()
        .with_context(|| format!("failed to decode hqid7 '{src}'"))?;
    print!("{}", render_report(src, &id, &Local));
    Ok(())
}

/// Formats the field breakdown of `id`, showing local times in the time zone `tz`.
fn render_report<Tz>(src: &str, id: &Hqid7, tz: &Tz) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

    let timestamp_ms = id.timestamp_ms();
    let (utc, local) = match DateTime::<Utc>::from_timestamp_millis(timestamp_ms as i64) {
        Some(t) => (
            format!("{} UTC", t.format(TIME_FORMAT)),
            t.with_timezone(tz).format("%Y-%m-%d %H:%M:%S%.3f %:z").to_string(),
        ),
        None => ("out of range".to_owned(), "out of range".to_owned()),
    };

    let mut out = String::new();
    // writing into a String cannot fail
    let _ = writeln!(out, "hqid7: {src}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Timestamp (UTC):   {utc}");
    let _ = writeln!(out, "Timestamp (Local): {local}");
    let _ = writeln!(out, "Unix milliseconds: {timestamp_ms}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Version:           {}", id.version());
    let _ = writeln!(
        out,
        "Variant:           {0} (binary: {0:02b})",
        id.variant()
    );
    let _ = writeln!(
        out,
        "Sub-ms precision:  {0} (binary: {0:012b})",
        id.sub_ms_precision()
    );
    let _ = writeln!(out, "Random bits (62):  0x{:015X}", id.random_bits());
    out
}
