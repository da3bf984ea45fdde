// Crease entry point.
//
// 1. Parse arguments
// 2. Initialize tracing (stderr, so stdout stays clean JSON)
// 3. Resolve the rules file
// 4. Run the subcommand and map its outcome to the exit code

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error};

use crease_cli::cli::Cli;
use crease_cli::{commands, settings};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("failed to initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let rules = settings::resolve_rules(cli.config_dir.as_deref())?;
    debug!(
        "Rules: roster_size={}, budget={}, default_price={}",
        rules.roster_size, rules.credit_budget, rules.default_player_price
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&cli.command, &rules, &mut out)
}

/// Initialize tracing to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose { "crease=debug,warn" } else { "crease=info,warn" };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
