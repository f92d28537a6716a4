#[macro_use]
extern crate tracing;

mod app_config;
mod args;
mod secret;

use app_config::AppConfig;
pub use app_config::get_config_dir;
pub use args::Args;
pub use secret::Secret;
use serde::{
    Deserialize,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};

/// Connection settings for the UniFi API browser.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Host, optionally with scheme. Hosts without scheme are reached via https.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: Secret,
}

/// Settings of the S3-compatible object storage the collections are archived in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: Secret,
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub region: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten, skip_serializing)]
    pub app_config: AppConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Catalog file to use instead of the built-in catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    /// Restrict a run to these collections. Empty means all of them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<String>,
    #[serde(default)]
    pub verbose: bool,
}

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

impl Default for Config {
    fn default() -> Self {
        serde_yml::from_str(DEFAULT_CONFIG).expect("Failed to parse default config")
    }
}

impl Config {
    /// Layers the built-in defaults, `config.yaml` from the config directory and the command line arguments (which
    /// include their environment variable fallbacks), later sources winning.
    pub fn new(args: Args) -> Result<Self, config::ConfigError> {
        Self::from_sources(&get_config_dir(), args)
    }

    fn from_sources(config_dir: &Path, args: Args) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml));

        let config_files = [("config.yaml", config::FileFormat::Yaml)];

        for (file, format) in &config_files {
            let path = config_dir.join(file);
            debug!(?path, "looking for config file");
            let source = config::File::from(path).format(*format).required(false);
            builder = builder.add_source(source);
        }

        builder = builder.add_source(args);

        let cfg: Self = builder.build()?.try_deserialize()?;

        Ok(cfg)
    }

    pub fn config_dir(&self) -> &Path {
        &self.app_config.config_dir
    }
}
