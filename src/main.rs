use clap::Parser;
use provnav::cli::{Cli, Command};
use provnav::{cmd_explore, cmd_init, cmd_serve, cmd_show};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("provnav=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let exit_code = match cli.command {
        Command::Explore(args) => cmd_explore(&cli.global, args),
        Command::Serve(args) => cmd_serve(&cli.global, args),
        Command::Show(args) => cmd_show(&cli.global, args),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}
