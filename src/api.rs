//! Library entry points.
//!
//! The CLI commands print and return exit codes; these functions return
//! `Result`s so the navigator can be embedded in other programs or driven
//! against a custom [`NodeSource`].
//!
//! # Example
//!
//! ```no_run
//! use provnav::{Config, controller};
//!
//! # async fn run() -> Result<(), provnav::ProvnavError> {
//! let config = Config::default().with_base_url("http://localhost:5000/api/v4")?;
//! let mut nav = controller(&config)?;
//! nav.open("a3c1e2d4-0000-4000-8000-000000000000").await?;
//! for node in &nav.current_view().nodes {
//!     println!("{} {}", node.id, node.display_label());
//! }
//! # Ok(())
//! # }
//! ```

use crate::cli::OutputFormat;
use crate::config::{CONFIG_FILE, Config, ConfigError};
use crate::fetch::{FetchError, NeighborhoodFetcher, NodeSource};
use crate::fs::{FileSystem, default_fs};
use crate::layout::layout;
use crate::model::{Neighborhood, ViewGraph};
use crate::navigation::{NavigationController, NavigationError};
use crate::output::{JsonOutput, MarkdownOutput, OutputFormatter, ViewReport};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvnavError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolve the effective configuration.
///
/// An explicit `config_path` must exist; otherwise `.provnav.toml` in `dir` is
/// used when present. `base_url` wins over both.
pub fn load_config(
    dir: &Path,
    config_path: Option<&Path>,
    base_url: Option<&str>,
) -> Result<Config, ProvnavError> {
    load_config_with_fs(dir, config_path, base_url, default_fs())
}

pub fn load_config_with_fs(
    dir: &Path,
    config_path: Option<&Path>,
    base_url: Option<&str>,
    fs: &dyn FileSystem,
) -> Result<Config, ProvnavError> {
    let config = match config_path {
        Some(path) => Config::from_file_with_fs(path, fs)?,
        None => Config::load_with_fs(dir, fs)?,
    };
    match base_url {
        Some(url) => Ok(config.with_base_url(url)?),
        None => Ok(config),
    }
}

/// A controller talking to the REST API named in `config`.
pub fn controller(config: &Config) -> Result<NavigationController, ProvnavError> {
    Ok(build_controller(config, config.fetcher()?))
}

/// A controller reading from any [`NodeSource`], e.g. an in-memory fixture.
pub fn controller_with_source(
    config: &Config,
    source: Arc<dyn NodeSource>,
) -> NavigationController {
    let fetcher = NeighborhoodFetcher::new(source).with_query(config.query.clone());
    build_controller(config, fetcher)
}

fn build_controller(config: &Config, fetcher: NeighborhoodFetcher) -> NavigationController {
    NavigationController::new(
        fetcher,
        config.layout.clone(),
        config.navigation.clone(),
    )
    .with_cache(config.cache())
}

/// Fetch the classified and ordered neighborhood of one node.
pub async fn neighborhood(config: &Config, id: &str) -> Result<Neighborhood, ProvnavError> {
    Ok(config.fetcher()?.fetch(id).await?)
}

/// Fetch and lay out one node without any navigation state.
pub async fn view(config: &Config, id: &str) -> Result<ViewGraph, ProvnavError> {
    let neighborhood = neighborhood(config, id).await?;
    Ok(layout(&neighborhood.focal, &neighborhood, &config.layout))
}

/// Render a report in the requested format.
pub fn render(report: &ViewReport<'_>, format: OutputFormat) -> Result<String, ProvnavError> {
    let mut buffer = Vec::new();
    match format {
        OutputFormat::Markdown => MarkdownOutput::default().format(report, &mut buffer)?,
        OutputFormat::Json => JsonOutput::new().format(report, &mut buffer)?,
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Where `provnav init` writes its template for a given directory.
pub fn config_path(dir: &Path) -> std::path::PathBuf {
    dir.join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;

    #[test]
    fn test_base_url_flag_overrides_file() {
        let fs = MockFs::with_files([(
            Path::new("/w/.provnav.toml"),
            "[server]\nbase_url = \"http://from-file/api\"\n",
        )]);

        let config = load_config_with_fs(Path::new("/w"), None, None, &fs).unwrap();
        assert_eq!(config.server.base_url, "http://from-file/api");

        let config =
            load_config_with_fs(Path::new("/w"), None, Some("https://flag/api"), &fs).unwrap();
        assert_eq!(config.server.base_url, "https://flag/api");
    }

    #[test]
    fn test_explicit_config_path() {
        let fs = MockFs::with_files([(
            Path::new("/etc/nav.toml"),
            "[layout]\npage_size = 4\n",
        )]);

        let config =
            load_config_with_fs(Path::new("/w"), Some(Path::new("/etc/nav.toml")), None, &fs)
                .unwrap();
        assert_eq!(config.layout.page_size, 4);

        let err = load_config_with_fs(Path::new("/w"), Some(Path::new("/missing.toml")), None, &fs)
            .unwrap_err();
        assert!(matches!(err, ProvnavError::Config(ConfigError::Io(_))));
    }
}
