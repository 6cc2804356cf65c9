use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author = "bahdotsh",
    version = env!("CARGO_PKG_VERSION"),
    about = "snippets - expand #hashtag snippets in chat messages",
    long_about = "snippets replaces #name markers in a message with reusable text blocks loaded from global and project snippet directories."
)]
pub struct Snippets {
    #[clap(long, global = true, help = "Enable debug logging")]
    pub debug: bool,

    #[clap(long, global = true, help = "Path to the settings file")]
    pub config: Option<PathBuf>,

    #[clap(
        long,
        global = true,
        help = "Project root whose .snippets/snippet directory overrides global snippets"
    )]
    pub project: Option<PathBuf>,

    #[clap(subcommand)]
    pub commands: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand a message and print the result
    Expand {
        #[clap(help = "Message text; read from stdin when omitted")]
        text: Option<String>,

        #[clap(long, help = "Print the message and inject blocks as JSON")]
        json: bool,
    },
    /// List loaded snippets with their aliases
    List {
        #[clap(long, help = "Print the snippets as JSON")]
        json: bool,
    },
    /// Print the raw content of a snippet
    Show {
        #[clap(help = "Snippet name or alias")]
        name: String,
    },
}
