// src/main.rs
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use shopstats::{app, cli::Args, config::RunConfig};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = RunConfig::try_from(args)?;
    init_logging(config.verbose);
    init_thread_pool(config.jobs)?;
    log::debug!("shopstats v{} · jobs={}", shopstats::VERSION, config.jobs);

    app::run(&config)?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(feature = "parallel")]
fn init_thread_pool(jobs: usize) -> Result<()> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
        .map_err(|e| shopstats_shared_kernel::InfrastructureError::ThreadPoolCreation { details: e.to_string() })?;
    Ok(())
}

#[cfg(not(feature = "parallel"))]
fn init_thread_pool(_jobs: usize) -> Result<()> {
    Ok(())
}
