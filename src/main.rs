mod app;
mod config;
mod errors;
mod input;
mod interpreter;
mod util;

use anyhow::{Context, Result};
use app::{Mode, Session};
use clap::Parser;
use config::Config;
use interpreter::CommandInterpreter;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::{info, warn};
use util::ring_buffer::EvictPolicy;

#[derive(Parser, Debug)]
#[command(
    name = "cbuf",
    about = "Fixed-capacity circular buffer driven by line commands on stdin",
    version
)]
struct Cli {
    /// What to do when asked to evict more values than are stored
    #[arg(long, value_enum)]
    evict_policy: Option<EvictPolicy>,

    /// Print a description of each parsed command instead of applying it
    #[arg(long)]
    describe: bool,

    /// Exit with status 1 when the session ends on a malformed command or buffer error
    #[arg(long)]
    strict: bool,

    /// Do not print a diagnostic to stderr when the session ends on an error
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print config file path and current values, then exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None       => Config::load(),
    };
    if cli.print_config {
        return run_print_config(&cli, &cfg);
    }

    util::logging::init(&cfg.logging.level, cli.verbose);

    let policy = cli.evict_policy.unwrap_or(cfg.session.evict_policy);
    let mode = if cli.describe { Mode::Describe } else { Mode::Apply };
    let strict_exit = cli.strict || cfg.session.strict_exit;
    let diagnostics = !cli.quiet && cfg.session.diagnostics;

    let mut interp = CommandInterpreter::new(io::stdin().lock());
    let mut out = BufWriter::new(io::stdout().lock());
    let mut session = Session::new(policy, mode);
    info!(policy = policy.label(), mode = ?mode, "starting session");

    let result = session.run(&mut interp, &mut out);
    let store = session.store();
    info!(
        operations = session.applied(),
        lines = interp.line_number(),
        capacity = store.capacity(),
        live = store.len(),
        full = store.is_full(),
        ok = result.is_ok(),
        "session finished"
    );

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_recoverable() => {
            warn!(error = %e, "session ended on error");
            if diagnostics {
                eprintln!("cbuf: {}", e);
            }
            if strict_exit {
                drop(out);
                std::process::exit(1);
            }
            Ok(())
        }
        Err(e) => Err(e).context("cbuf session failed"),
    }
}

fn run_print_config(cli: &Cli, cfg: &Config) -> Result<()> {
    let path = cli
        .config
        .clone()
        .or_else(Config::config_path)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    println!("# Config: {}", path);
    println!();
    print!("{}", cfg.to_toml()?);
    Ok(())
}
