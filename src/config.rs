use crate::fetch::{FetchError, GraphDataCache, NeighborhoodFetcher, QueryOptions, RestSource};
use crate::fs::{FileSystem, default_fs};
use crate::layout::{LayoutOptions, LayoutPolicy};
use crate::model::Position;
use crate::navigation::NavigationOptions;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".provnav.toml";

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/v4";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid base URL {0:?}: expected http:// or https://")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub layout: LayoutOptions,
    pub navigation: NavigationOptions,
    /// `None` keeps every neighborhood for the whole session.
    pub cache_max_entries: Option<usize>,
    pub query: QueryOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    server: Option<RawServer>,
    layout: Option<RawLayout>,
    navigation: Option<RawNavigation>,
    cache: Option<RawCache>,
    query: Option<RawQuery>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawLayout {
    policy: Option<LayoutPolicy>,
    page_size: Option<usize>,
    center_x: Option<f32>,
    center_y: Option<f32>,
    column_gap: Option<f32>,
    lane_gap: Option<f32>,
    row_spacing: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct RawNavigation {
    max_breadcrumbs: Option<usize>,
    shrink_delay_ms: Option<u64>,
    expand_delay_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawCache {
    max_entries: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawQuery {
    data_filter: Option<String>,
    process_filter: Option<String>,
    data_orderby: Option<String>,
    process_orderby: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            layout: LayoutOptions::default(),
            navigation: NavigationOptions::default(),
            cache_max_entries: None,
            query: QueryOptions::default(),
        }
    }
}

impl Config {
    /// Load `.provnav.toml` from `dir`, falling back to defaults when absent.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        Self::load_with_fs(dir, default_fs())
    }

    pub fn load_with_fs(dir: &Path, fs: &dyn FileSystem) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE);
        if !fs.exists(&config_path) {
            return Ok(Self::default());
        }
        Self::from_file_with_fs(&config_path, fs)
    }

    /// Load an explicitly named config file, which must exist.
    pub fn from_file_with_fs(path: &Path, fs: &dyn FileSystem) -> Result<Self, ConfigError> {
        let content = fs.read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let server = match raw.server {
            Some(s) => ServerConfig {
                base_url: validate_base_url(
                    s.base_url.unwrap_or(defaults.server.base_url),
                )?,
                timeout: s
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.server.timeout),
            },
            None => defaults.server,
        };

        let layout = match raw.layout {
            Some(l) => {
                let d = defaults.layout;
                LayoutOptions {
                    policy: l.policy.unwrap_or(d.policy),
                    page_size: l.page_size.unwrap_or(d.page_size),
                    center: Position::new(
                        l.center_x.unwrap_or(d.center.x),
                        l.center_y.unwrap_or(d.center.y),
                    ),
                    column_gap: l.column_gap.unwrap_or(d.column_gap),
                    lane_gap: l.lane_gap.unwrap_or(d.lane_gap),
                    row_spacing: l.row_spacing.unwrap_or(d.row_spacing),
                }
            }
            None => defaults.layout,
        };

        let navigation = match raw.navigation {
            Some(n) => {
                let d = defaults.navigation;
                NavigationOptions {
                    max_breadcrumbs: n.max_breadcrumbs.unwrap_or(d.max_breadcrumbs),
                    shrink_delay: n
                        .shrink_delay_ms
                        .map(Duration::from_millis)
                        .unwrap_or(d.shrink_delay),
                    expand_delay: n
                        .expand_delay_ms
                        .map(Duration::from_millis)
                        .unwrap_or(d.expand_delay),
                }
            }
            None => defaults.navigation,
        };

        let cache_max_entries = raw
            .cache
            .and_then(|c| c.max_entries)
            .filter(|&n| n > 0);

        let query = match raw.query {
            Some(q) => {
                let d = defaults.query;
                QueryOptions {
                    data_filter: q.data_filter.unwrap_or(d.data_filter),
                    process_filter: q.process_filter.unwrap_or(d.process_filter),
                    data_orderby: q.data_orderby.unwrap_or(d.data_orderby),
                    process_orderby: q.process_orderby.unwrap_or(d.process_orderby),
                }
            }
            None => defaults.query,
        };

        Ok(Self {
            server,
            layout,
            navigation,
            cache_max_entries,
            query,
        })
    }

    /// Override the configured API root, e.g. from `--base-url`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        self.server.base_url = validate_base_url(base_url.into())?;
        Ok(self)
    }

    pub fn fetcher(&self) -> Result<NeighborhoodFetcher, FetchError> {
        let source = RestSource::new(&self.server.base_url, self.server.timeout)?;
        Ok(NeighborhoodFetcher::new(Arc::new(source)).with_query(self.query.clone()))
    }

    pub fn cache(&self) -> GraphDataCache {
        match self.cache_max_entries {
            Some(n) => GraphDataCache::with_max_entries(n),
            None => GraphDataCache::new(),
        }
    }
}

fn validate_base_url(url: String) -> Result<String, ConfigError> {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::InvalidBaseUrl(url))
    }
}

/// Starter `.provnav.toml` written by `provnav init`.
pub fn generate_config_template() -> String {
    let layout = LayoutOptions::default();
    let navigation = NavigationOptions::default();
    let query = QueryOptions::default();

    format!(
        r#"# provnav configuration

[server]
# Root of the provenance REST API
base_url = "{base_url}"
timeout_secs = 30

[layout]
# "four-lane" keeps data lanes next to the focal node,
# "focal-aware" moves process lanes inward around data nodes
policy = "four-lane"
page_size = {page_size}
center_x = {center_x:.1}
center_y = {center_y:.1}
column_gap = {column_gap:.1}
lane_gap = {lane_gap:.1}
row_spacing = {row_spacing:.1}

[navigation]
max_breadcrumbs = {max_breadcrumbs}
shrink_delay_ms = {shrink}
expand_delay_ms = {expand}

[cache]
# 0 keeps every visited neighborhood
max_entries = 0

[query]
data_filter = "{data_filter}"
process_filter = "{process_filter}"
data_orderby = "{data_orderby}"
process_orderby = "{process_orderby}"
"#,
        base_url = DEFAULT_BASE_URL,
        page_size = layout.page_size,
        center_x = layout.center.x,
        center_y = layout.center.y,
        column_gap = layout.column_gap,
        lane_gap = layout.lane_gap,
        row_spacing = layout.row_spacing,
        max_breadcrumbs = navigation.max_breadcrumbs,
        shrink = navigation.shrink_delay.as_millis(),
        expand = navigation.expand_delay.as_millis(),
        data_filter = query.data_filter,
        process_filter = query.process_filter,
        data_orderby = query.data_orderby,
        process_orderby = query.process_orderby,
    )
}
