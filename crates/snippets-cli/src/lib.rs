pub mod cli;
pub mod commands;
pub mod utils;

use clap::Parser;
use cli::Snippets;
use commands::{handle_command, load_settings, Session};
use snippets_core::Result;
use std::process;
use utils::init_logging;

fn run(args: Snippets) -> Result<()> {
    let settings = load_settings(&args)?;
    init_logging(args.debug || settings.debug);

    let session = Session::load(settings, args.project.as_deref())?;
    handle_command(args.commands, &session)
}

/// Run the snippets CLI application
pub fn run_main() {
    let args = Snippets::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
