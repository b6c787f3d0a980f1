mod cli;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::process;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use cli::{Cli, Mode};
use huf_compress::config::HufConfig;
use huf_compress::error::{HufError, EXIT_UNKNOWN};
use huf_compress::Compressor;
use serde::Serialize;
use tracing::info;

fn init_tracing(cli: &Cli) {
    // --quiet silences everything, --verbose honours RUST_LOG and otherwise
    // shows debug events from this crate, the default only shows warnings.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "huf=debug,huf_compress=debug".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            let err = cli::parse_error(&e);
            let _ = e.print();
            process::exit(err.exit_code());
        }
    };

    init_tracing(&cli);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        let code = e
            .downcast_ref::<HufError>()
            .map_or(EXIT_UNKNOWN, HufError::exit_code);
        process::exit(code);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => HufConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => HufConfig::default(),
    };
    let compressor = Compressor::new(config);

    match cli.mode() {
        Mode::Compress => {
            let output = require_output(cli)?;
            let report = with_files(&compressor, &cli.input, output, |c, r, w| c.compress(r, w))?;
            info!(
                input = %cli.input.display(),
                output = %output.display(),
                ratio = report.ratio,
                "compressed"
            );
            if cli.json {
                print_json(&report)?;
            }
        }
        Mode::Decompress => {
            let output = require_output(cli)?;
            let report =
                with_files(&compressor, &cli.input, output, |c, r, w| c.decompress(r, w))?;
            info!(
                input = %cli.input.display(),
                output = %output.display(),
                bytes = report.original_size,
                "decompressed"
            );
            if cli.json {
                print_json(&report)?;
            }
        }
        Mode::Inspect => {
            let input = open_input(&cli.input, compressor.config().buffer_size)?;
            let dump = compressor
                .inspect(input)
                .with_context(|| format!("inspecting {}", cli.input.display()))?;
            let json = serde_json::to_string_pretty(&dump)?;
            match &cli.output {
                Some(path) => std::fs::write(path, json + "\n")
                    .map_err(HufError::from)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{json}"),
            }
        }
    }
    Ok(())
}

fn require_output(cli: &Cli) -> Result<&Path, HufError> {
    cli.output
        .as_deref()
        .ok_or_else(|| HufError::InvalidArguments("missing output path".into()))
}

fn open_input(path: &Path, buffer_size: usize) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path)
        .map_err(HufError::from)
        .with_context(|| format!("cannot open {}", path.display()))?;
    Ok(BufReader::with_capacity(buffer_size, file))
}

/// Run `op` from `input` into a freshly created `output`.
///
/// On failure the output file is truncated to zero bytes, below the
/// smallest valid header, so it cannot pass for a complete result.
fn with_files<T, F>(compressor: &Compressor, input: &Path, output: &Path, op: F) -> anyhow::Result<T>
where
    F: FnOnce(&Compressor, &mut dyn Read, &mut dyn Write) -> Result<T, HufError>,
{
    let buffer_size = compressor.config().buffer_size;
    let mut reader = open_input(input, buffer_size)?;
    let file = File::create(output)
        .map_err(HufError::from)
        .with_context(|| format!("cannot create {}", output.display()))?;

    let mut writer = BufWriter::with_capacity(buffer_size, &file);
    let result = op(compressor, &mut reader, &mut writer);
    drop(writer);

    match result {
        Ok(value) => Ok(value),
        Err(e) => {
            if let Err(truncate) = file.set_len(0) {
                tracing::warn!(output = %output.display(), error = %truncate, "could not truncate output");
            }
            Err(e).with_context(|| format!("{} -> {}", input.display(), output.display()))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
