use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    env,
    path::PathBuf,
};

/// Environment variable naming the directory `config.yaml` is read from.
const CONFIG_DIR_ENV: &str = "UNIFI_SCRAPER_CONFIG";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub config_dir: PathBuf,
}

lazy_static::lazy_static! {
    static ref CONFIG_DIR_OVERRIDE: Option<PathBuf> = env::var_os(CONFIG_DIR_ENV).map(PathBuf::from);
}

/// `UNIFI_SCRAPER_CONFIG` when set, else the platform config directory, else `./.config`.
pub fn get_config_dir() -> PathBuf {
    CONFIG_DIR_OVERRIDE
        .clone()
        .or_else(platform_config_dir)
        .unwrap_or_else(|| PathBuf::from(".").join(".config"))
}

fn platform_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "unifi-scraper", "unifi-scraper").map(|dirs| dirs.config_local_dir().to_path_buf())
}
