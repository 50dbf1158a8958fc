use std::error::Error;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tunsup::{
    cli::{Cli, Commands, parse_args},
    config::load_config,
    privilege,
    session::Session,
};

fn main() {
    let args = parse_args();
    init_logging(&args);

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    }
}

fn run(args: Cli) -> Result<i32, Box<dyn Error>> {
    let command = args.command.unwrap_or(Commands::Run { config: None });

    match command {
        Commands::Run { config } => {
            let config = load_config(config.as_deref())?;
            let code = Session::new(config).run()?;
            Ok(code)
        }
        Commands::Grant { config, executable } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(path) = executable {
                config.executable = path;
            }
            privilege::grant(
                &config.executable,
                &config.capabilities,
                config.elevation_prefix(),
            )?;
            info!("Capability grant complete for {}", config.executable.display());
            Ok(0)
        }
    }
}

fn init_logging(args: &Cli) {
    let filter = if let Some(level) = args.log_level {
        EnvFilter::new(level.as_str())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
