//! formsmith CLI - build, store and fill typed forms
//!
//! Usage: formsmith <COMMAND>
//!
//! Commands:
//!   draft   Create and edit the local draft
//!   check   Check the draft's structure and expressions
//!   save    Persist the draft
//!   list    List saved forms
//!   show    Print a saved form
//!   fill    Fill in a saved form and submit it

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use formsmith::config::Config;
use formsmith::infrastructure::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config loading logs, so start from the default level
    if let Err(e) = logging::init(log_spec(cli.verbose, &Config::default())) {
        eprintln!("warning: logging disabled: {}", e);
    }

    let cwd = std::env::current_dir()?;
    let (config, warnings) = Config::load_or_default_with_warnings(Some(&cwd));
    if let Err(e) = logging::reconfigure(log_spec(cli.verbose, &config)) {
        eprintln!("warning: invalid log level: {}", e);
    }
    for warning in &warnings {
        log::warn!("{}", warning);
    }

    let result = run(cli, &config);
    logging::shutdown();
    result
}

fn run(cli: Cli, config: &Config) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Commands::Draft { file, action } => commands::draft::cmd_draft(&file.path, action, json),
        Commands::Check { file } => commands::check::cmd_check(&file.path, json),
        Commands::Save { file } => commands::forms::cmd_save(config, &file.path, json),
        Commands::List => commands::forms::cmd_list(config, json),
        Commands::Show { id } => commands::forms::cmd_show(config, &id),
        Commands::Fill {
            id,
            set,
            revalidate_derived,
        } => commands::fill::cmd_fill(config, id, &set, revalidate_derived, json),
    }
}

/// `-v` flags win over the configured verbosity
fn log_spec(verbose: u8, config: &Config) -> &'static str {
    match verbose {
        0 => config.output.verbosity.log_spec(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
