//! cdp - command-line front end for the CDF codec and CDP transform.
//!
//! - forward / inverse: split any file into class and index channels and back
//! - encode / decode: JSON field records through a schema
//! - analyze: entropy and zstd size of each channel
//! - inspect-map: class layout of the active resonance map

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use serde::Serialize;

use cdp_core::cdf::UnknownTagPolicy;
use cdp_core::constants::{DEFAULT_ANALYSIS_LEVEL, DEFAULT_CHUNK_SIZE};
use cdp_core::pipeline::ParallelismProfile;
use cdp_core::telemetry::TelemetrySnapshot;

mod commands;

#[derive(Parser)]
#[command(name = "cdp")]
#[command(about = "Canonical dictionary codec and class/index transform", long_about = None)]
#[command(version)]
struct Cli {
    /// Resonance map JSON (defaults to the bundled 96-class map)
    #[arg(short, long, global = true, env = "CDP_MAP")]
    map: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Append log output to this file instead of stderr
    #[arg(long, global = true, env = "CDP_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Print pipeline telemetry as JSON on stderr
    #[arg(long, global = true)]
    telemetry: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a file into class and index channels
    Forward {
        input: PathBuf,
        #[arg(long)]
        classes: PathBuf,
        #[arg(long)]
        indices: PathBuf,
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },

    /// Rebuild a file from its class and index channels
    Inverse {
        #[arg(long)]
        classes: PathBuf,
        #[arg(long)]
        indices: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
        /// Compare the rebuilt file against this original
        #[arg(long)]
        verify: Option<PathBuf>,
    },

    /// Encode JSON field records ([{"label", "value"}]) into both channels
    Encode {
        #[arg(long)]
        schema: PathBuf,
        records: PathBuf,
        #[arg(long)]
        classes: PathBuf,
        #[arg(long)]
        indices: PathBuf,
        /// Worker threads (defaults to one per core, minus one)
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Decode both channels back into JSON field records
    Decode {
        #[arg(long)]
        schema: PathBuf,
        #[arg(long)]
        classes: PathBuf,
        #[arg(long)]
        indices: PathBuf,
        /// Skip records with unknown tags instead of failing
        #[arg(long)]
        skip_unknown: bool,
        /// Only return these fields; every other tag is ignored
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Entropy and zstd size of a file and its two channels
    Analyze {
        input: PathBuf,
        #[arg(short, long, default_value_t = DEFAULT_ANALYSIS_LEVEL)]
        level: i32,
    },

    /// Print the class layout of the active map
    InspectMap,
}

fn init_logging(verbose: u8, log_file: Option<&PathBuf>) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.parse_default_env();
    builder.format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()));

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("installing logger")?;
    Ok(())
}

fn profile(workers: Option<usize>) -> ParallelismProfile {
    match workers {
        Some(n) => ParallelismProfile::dynamic().with_workers(n.max(1)),
        None => ParallelismProfile::dynamic(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report(snapshot: &TelemetrySnapshot, enabled: bool) -> Result<()> {
    log::info!(
        "{} bytes forward, {} bytes inverse, {} chunks in {:?}",
        snapshot.bytes_forward,
        snapshot.bytes_inverse,
        snapshot.chunks,
        snapshot.elapsed
    );
    for (stage, dur) in &snapshot.stage_times {
        log::debug!("  {}: {:?}", stage, dur);
    }
    if enabled {
        eprintln!("{}", serde_json::to_string_pretty(snapshot)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_ref())?;

    let map = commands::load_map(cli.map.as_deref())?;

    match cli.command {
        Commands::Forward { input, classes, indices, chunk_size } => {
            let snapshot = commands::forward(&map, &input, &classes, &indices, chunk_size)?;
            report(&snapshot, cli.telemetry)
        }
        Commands::Inverse { classes, indices, output, chunk_size, verify } => {
            let snapshot =
                commands::inverse(&map, &classes, &indices, &output, chunk_size, verify.as_deref())?;
            report(&snapshot, cli.telemetry)
        }
        Commands::Encode { schema, records, classes, indices, workers } => {
            let snapshot =
                commands::encode(&map, &schema, &records, &classes, &indices, &profile(workers))?;
            report(&snapshot, cli.telemetry)
        }
        Commands::Decode { schema, classes, indices, skip_unknown, fields, output, workers } => {
            let policy = if skip_unknown { UnknownTagPolicy::Skip } else { UnknownTagPolicy::Abort };
            let (records, snapshot) = commands::decode(
                &map,
                &schema,
                &classes,
                &indices,
                policy,
                &fields,
                &profile(workers),
            )?;
            report(&snapshot, cli.telemetry)?;
            match output {
                Some(path) => {
                    let json = serde_json::to_string_pretty(&records)?;
                    std::fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    Ok(())
                }
                None => print_json(&records),
            }
        }
        Commands::Analyze { input, level } => print_json(&commands::analyze(&map, &input, level)?),
        Commands::InspectMap => print_json(&commands::inspect_map(&map)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_decode_flags() {
        let cli = Cli::try_parse_from([
            "cdp", "-vv", "decode", "--schema", "s.json", "--classes", "c", "--indices", "i",
            "--skip-unknown", "--fields", "a,b",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Decode { skip_unknown, fields, .. } => {
                assert!(skip_unknown);
                assert_eq!(fields, vec!["a".to_string(), "b".to_string()]);
            }
            _ => panic!("expected decode"),
        }
    }
}
