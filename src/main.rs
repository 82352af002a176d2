use std::{fs, path::PathBuf, process};

use anyhow::Context;
use clap::Parser;
use huffman_rust::{run_files, utils::Timer, ExitCode, HuffError, Properties};

#[derive(Parser, Debug)]
#[command(about = "Huffman-compress ('c') or decompress ('d') a file; the first input byte selects the operation")]
struct Args {
    /// A .properties file with the default settings
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Input file, in.txt unless configured otherwise
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Output file, out.txt unless configured otherwise
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Write a JSON report to <output>.stats.json
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn execute(args: Args) -> anyhow::Result<()> {
    let mut props = match &args.config {
        Some(path) => Properties::load(path)?,
        None => Properties::default(),
    };
    if let Some(input) = args.input {
        props.input = input;
    }
    if let Some(output) = args.output {
        props.output = output;
    }
    props.stats |= args.stats;

    let mut timer = Timer::new();
    let stats = timer
        .time(|| run_files(&props))
        .with_context(|| format!("{} -> {}", props.input.display(), props.output.display()))?;

    log::info!(
        "{} {} -> {} bytes (ratio {:.4}) in {}ns",
        stats.operation, stats.input_bytes, stats.output_bytes, stats.ratio(), timer.total_time
    );

    if props.stats {
        let stats_path = format!("{}.stats.json", props.output.display());
        fs::write(&stats_path, serde_json::to_string_pretty(&stats)?)
            .with_context(|| format!("writing {stats_path}"))?;
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let exit = match execute(Args::parse()) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            log::error!("{e:#}");
            e.downcast_ref::<HuffError>().map_or(ExitCode::WrongInput, HuffError::exit_code)
        }
    };

    if exit != ExitCode::Success {
        println!("{exit}");
    }
    process::exit(exit.code());
}
