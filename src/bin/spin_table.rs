//! Spin-priority table generator.
//!
//! Reads a JSON system description, runs the spin-priority assignment,
//! and writes the resulting table as a C header.
//!
//! # Exit codes
//! - `0`: table written.
//! - `1`: the configuration could not be loaded or the table not written.
//! - `2`: invalid usage.

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use log::warn;
use thiserror::Error;

use spin_priority::assignment;
use spin_priority::config::{Config, ConfigError};
use spin_priority::model::ModelError;
use spin_priority::table;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid system: {0}")]
    Model(#[from] ModelError),
    #[error("cannot write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn usage(program: &str) {
    eprintln!("Usage: {} <config.json> <out_header.h>", program);
}

fn run(config_path: &Path, out_path: &Path) -> Result<usize, CliError> {
    let config = Config::load(config_path)?;
    let system = config.build()?;
    let result = assignment::assign(&system, &config.analysis);
    for report in result.infeasible() {
        warn!(
            "task {} remains infeasible: blocking {} > slack {}",
            system.task(report.task).name,
            report.blocking,
            report.slack
        );
    }
    let entries = table::entries(&system, &result.priorities);
    table::write_to_path(out_path, &entries).map_err(|source| CliError::Output {
        path: out_path.to_path_buf(),
        source,
    })?;
    Ok(entries.len())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        usage(args.first().map_or("spin-table", String::as_str));
        process::exit(2);
    }

    let out_path = Path::new(&args[2]);
    match run(Path::new(&args[1]), out_path) {
        Ok(n) => println!("Wrote {} with {} entries.", out_path.display(), n),
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    }
}
