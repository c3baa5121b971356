use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use dino_core::{
    load_interpreter_config, run_script_file, save_map, InterpreterConfig, TerminalFrontend, World,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a dino grid-world script", long_about = None)]
struct Cli {
    /// Top-level script to run.
    script: PathBuf,
    /// File that receives the final grid.
    output: PathBuf,
    /// Seconds to wait after each drawn frame; negative values count as 0.
    #[arg(long, allow_negative_numbers = true)]
    interval: Option<i64>,
    /// Do not draw the grid while running.
    #[arg(long)]
    no_display: bool,
    /// Do not write the final grid.
    #[arg(long)]
    no_save: bool,
    /// JSON interpreter config (falls back to DINO_CONFIG_PATH, then builtin defaults).
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn interpreter_config(&self) -> InterpreterConfig {
        let (mut config, _) = load_interpreter_config(self.config.as_deref());
        if let Some(interval) = self.interval {
            config.refresh_interval_secs = interval.max(0).unsigned_abs();
        }
        if self.no_display {
            config.display = false;
        }
        if self.no_save {
            config.save_output = false;
        }
        config
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(target: "dino::session", error = %format!("{err:#}"), "script.failed");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.interpreter_config();
    info!(
        target: "dino::session",
        script = %cli.script.display(),
        display = config.display,
        interval_secs = config.refresh_interval_secs,
        "script.start"
    );

    // Frames are only requested when display is on; warnings always print.
    let world = run_script_file(&cli.script, &config, TerminalFrontend::stdout())?;

    if config.save_output {
        save_output(cli, &world);
    }
    Ok(())
}

/// A dump that cannot be written does not fail the run.
fn save_output(cli: &Cli, world: &World) {
    let saved = save_map(&cli.output, world)
        .with_context(|| format!("cannot write output file {}", cli.output.display()));
    match saved {
        Ok(()) => info!(target: "dino::session", output = %cli.output.display(), "dump.saved"),
        Err(err) => {
            warn!(target: "dino::session", error = %format!("{err:#}"), "dump.failed");
            eprintln!("Warning: {err:#}");
        }
    }
}
