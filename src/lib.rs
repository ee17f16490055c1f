pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fetch;
pub mod fs;
pub mod layout;
pub mod model;
pub mod navigation;
pub mod output;
pub mod server;
pub mod style;

pub use api::{
    ProvnavError, controller, controller_with_source, load_config, neighborhood, render, view,
};
pub use cli::Cli;
pub use commands::{cmd_explore, cmd_init, cmd_serve, cmd_show};
pub use config::Config;
pub use fetch::{NeighborhoodFetcher, NodeSource};
pub use layout::{LayoutOptions, layout};
pub use navigation::{NavigationController, NavigationOutcome};
