use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "provnav")]
#[command(about = "Explore a provenance graph one node at a time")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (defaults to ./.provnav.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Root of the provenance REST API, overriding the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Navigate interactively in the terminal
    Explore(ExploreArgs),

    /// Serve the navigator over HTTP
    Serve(ServeArgs),

    /// Print the neighborhood of a single node
    Show(ShowArgs),

    /// Generate a starter .provnav.toml configuration file
    Init(InitArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ExploreArgs {
    /// Node to start from
    pub node_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Node to start from
    pub node_id: String,

    /// Port for the HTTP server
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// Open the navigator in the default browser
    #[arg(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Node to lay out
    pub node_id: String,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Directory to create .provnav.toml in
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}
