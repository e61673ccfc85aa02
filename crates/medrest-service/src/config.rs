use medrest_core::reserved;
use medrest_search::{PlatformVersion, SearchOptions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub platform: PlatformSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Search validations
        let selector = self.search.selector_param.trim();
        if selector.is_empty() {
            return Err("search.selector_param must not be empty".into());
        }
        if self
            .search
            .reserved_params
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err("search.reserved_params must not contain empty names".into());
        }
        // Platform validation
        self.platform.parsed_version()?;
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    /// Search registry options derived from the `platform` and `search` sections.
    pub fn search_options(&self) -> Result<SearchOptions, String> {
        let mut options = SearchOptions::default()
            .with_selector(self.search.selector_param.trim())
            .with_reserved_parameters(self.search.reserved_params.iter().cloned());
        if let Some(version) = self.platform.parsed_version()? {
            options = options.with_platform_version(version);
        }
        Ok(options)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlatformSettings {
    /// Running platform version, e.g. "2.4.0". Unset accepts every search handler.
    #[serde(default)]
    pub version: Option<String>,
}

impl PlatformSettings {
    pub fn parsed_version(&self) -> Result<Option<PlatformVersion>, String> {
        self.version
            .as_deref()
            .map(|v| {
                v.parse::<PlatformVersion>()
                    .map_err(|e| format!("platform.version: {e}"))
            })
            .transpose()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_selector_param")]
    pub selector_param: String,
    #[serde(default = "default_reserved_params")]
    pub reserved_params: Vec<String>,
}

fn default_selector_param() -> String {
    reserved::SEARCH_ID.into()
}

fn default_reserved_params() -> Vec<String> {
    reserved::ALL.iter().map(|name| name.to_string()).collect()
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            selector_param: default_selector_param(),
            reserved_params: default_reserved_params(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if pathbuf.exists() {
                    builder = builder.add_source(File::from(pathbuf));
                }
            }
            None => {
                // Try default root-level file
                let default_path = PathBuf::from("medrest.toml");
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g., MEDREST__PLATFORM__VERSION=2.4.0
        // or MEDREST__SEARCH__RESERVED_PARAMS=v,limit
        builder = builder.add_source(
            Environment::with_prefix("MEDREST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("search.reserved_params"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}
