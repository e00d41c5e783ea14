use clap::Parser;
use partdft::LocalCluster;
use partdft_cli::{read_signal, write_spectrum, OutputFormat};
use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Direct DFT of a real signal, computed by a group of worker threads.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Input file with one or more samples per line; `-` or absent reads stdin
    input: Option<PathBuf>,

    /// Number of workers (defaults to PARTDFT_WORKERS or the CPU count)
    #[arg(long, short)]
    workers: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log each pipeline stage to stderr
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::builder()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let signal = read_signal(args.input.as_deref())?;
    let cluster = match args.workers {
        Some(n) => LocalCluster::new(n)?,
        None => LocalCluster::from_env()?,
    };
    log::info!(
        "transforming {} samples with {} workers",
        signal.len(),
        cluster.workers()
    );
    let spectrum = cluster.transform(&signal)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_spectrum(&mut out, &spectrum, args.format)?;
    out.flush()?;
    Ok(())
}
