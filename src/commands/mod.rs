mod explore;
mod init;
mod serve;
mod show;

pub use explore::{cmd_explore, run_session};
pub use init::{cmd_init, cmd_init_with_fs};
pub use serve::cmd_serve;
pub use show::{cmd_show, cmd_show_with_fs};

use crate::api;
use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::navigation::NavigationController;
use crate::style;
use std::path::Path;
use tokio::runtime::Runtime;

/// Shared context for command execution: resolved config plus a runtime.
pub struct CommandContext {
    pub config: Config,
    pub runtime: Runtime,
}

impl CommandContext {
    /// Returns Err(exit_code) if setup fails.
    pub fn new(global: &GlobalArgs) -> Result<Self, i32> {
        let config = match api::load_config(
            Path::new("."),
            global.config.as_deref(),
            global.base_url.as_deref(),
        ) {
            Ok(config) => config,
            Err(e) => {
                style::error(&e.to_string());
                if global.config.is_none() {
                    style::hint("run `provnav init` for a commented template");
                }
                return Err(1);
            }
        };

        let runtime = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                style::error(&format!("Failed to start async runtime: {}", e));
                return Err(1);
            }
        };

        Ok(Self { config, runtime })
    }

    pub fn controller(&self) -> Result<NavigationController, i32> {
        api::controller(&self.config).map_err(|e| {
            style::error(&format!("Failed to create HTTP client: {}", e));
            1
        })
    }

    /// Build a controller and show `node_id` as its first view.
    pub fn open(&self, node_id: &str) -> Result<NavigationController, i32> {
        let mut controller = self.controller()?;
        style::status(&format!(
            "Loading {} from {}",
            node_id,
            style::url(&self.config.server.base_url)
        ));
        match self.runtime.block_on(controller.open(node_id)) {
            Ok(_) => Ok(controller),
            Err(e) => {
                style::error(&e.to_string());
                Err(1)
            }
        }
    }
}
