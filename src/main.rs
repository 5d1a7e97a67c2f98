use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, error};

use stocklive::adapter::inbound::cli::command::{Cli, Commands, ConfigCommand};
use stocklive::adapter::inbound::cli::output::Output;
use stocklive::adapter::inbound::cli::{compare, config, paths, portfolio, screen};
use stocklive::error::Result;
use stocklive::infrastructure::config::Config;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let out = Output::new(cli.json, cli.quiet, cli.verbose);

    if let Err(e) = run(cli, out).await {
        error!(error = %e, "Command failed");
        out.error(&e.to_string());
        std::process::exit(1);
    }
}

/// Explicit `--config` must exist; the default location may be absent.
#[allow(clippy::result_large_err)]
fn load_config(explicit: Option<&PathBuf>) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path),
        None => Config::load_or_default(paths::default_config()),
    }
}

async fn run(cli: Cli, out: Output) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(paths::default_config);

    match &cli.command {
        Commands::Config(ConfigCommand::Init(args)) => {
            let path = args.path.clone().unwrap_or(config_path);
            return config::execute_init(&path, args.force, out);
        }
        Commands::Config(ConfigCommand::Validate) => {
            return config::execute_validate(&config_path, out);
        }
        _ => {}
    }

    let mut settings = load_config(cli.config.as_ref())?;
    settings.logging = settings.logging.with_verbosity(cli.verbose, cli.quiet);
    settings.init_logging();
    debug!(config = %config_path.display(), "Configuration loaded");

    match &cli.command {
        Commands::Compare(args) => compare::execute(&settings, args, out).await,
        Commands::Screen(args) => screen::execute(&settings, args, out).await,
        Commands::Portfolio(args) => portfolio::execute(&settings, args, out).await,
        Commands::Config(_) => config::execute_show(&settings, out),
    }
}
