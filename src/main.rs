//! Wavtrim CLI
//!
//! Command-line interface for cutting and exporting WAV audio.

use clap::Parser;
use env_logger::Env;
use log::{debug, error};

use wavtrim::cli::{commands, Cli, Commands};
use wavtrim::Result;

fn main() {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    debug!("Wavtrim v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Wavtrim v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("{} [{}]", err, err.error_code());
        eprintln!("{}", err.friendly_message());
        for suggestion in err.recovery_suggestions() {
            eprintln!("  - {}", suggestion);
        }
        std::process::exit(1);
    }
}

fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Trim {
            input,
            output,
            start,
            end,
            json,
        } => commands::trim(&input, &output, start, end, json),
        Commands::Convert {
            input,
            output,
            json,
        } => commands::convert(&input, &output, json),
        Commands::Info { input, json } => commands::info(&input, json),
    }
}
