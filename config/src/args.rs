use clap::Parser;
use std::{
    fmt,
    path::PathBuf,
};

/// Scrape UniFi controller statistics and archive them in object storage.
///
/// Without arguments every collection of the catalog is scraped.
#[derive(Parser, Clone, Default)]
#[command(author, version = version(), about, long_about = None)]
pub struct Args {
    /// Host of the UniFi API browser (e.g. `unifi.example.com`). A URL with scheme is used as is.
    #[clap(long, env = "UNIFI_API_BASE_URL", value_name = "HOST")]
    pub controller_url: Option<String>,

    /// User to log into the API browser with.
    #[clap(long, env = "UNIFI_API_USERNAME", value_name = "USER")]
    pub controller_user: Option<String>,

    /// Password of the API browser user.
    #[clap(long, env = "UNIFI_API_PASSWORD", value_name = "PASSWORD", hide_env_values = true)]
    pub controller_password: Option<String>,

    /// Endpoint of the S3-compatible object storage.
    #[clap(long, env = "BOTO3_ENDPOINT_URL", value_name = "URL")]
    pub storage_endpoint: Option<String>,

    /// Access key for the object storage.
    #[clap(long, env = "BOTO3_ACCESS_KEY", value_name = "KEY")]
    pub storage_access_key: Option<String>,

    /// Secret key for the object storage.
    #[clap(long, env = "BOTO3_SECRET_KEY", value_name = "SECRET", hide_env_values = true)]
    pub storage_secret_key: Option<String>,

    /// Bucket the scraped collections are uploaded to.
    #[clap(long, env = "BOTO3_BUCKET", value_name = "BUCKET")]
    pub storage_bucket: Option<String>,

    /// Use this catalog file instead of the built-in one.
    #[clap(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Only scrape the named collection. Can be given multiple times.
    #[clap(long = "collection", value_name = "NAME")]
    pub collections: Vec<String>,

    /// Print the names of all catalog collections and exit.
    #[clap(long, action)]
    pub list_collections: bool,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[clap(long, action)]
    pub verbose: bool,
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |value: &Option<String>| value.as_ref().map(|_| "***");
        f.debug_struct("Args")
            .field("controller_url", &self.controller_url)
            .field("controller_user", &self.controller_user)
            .field("controller_password", &redacted(&self.controller_password))
            .field("storage_endpoint", &self.storage_endpoint)
            .field("storage_access_key", &self.storage_access_key)
            .field("storage_secret_key", &redacted(&self.storage_secret_key))
            .field("storage_bucket", &self.storage_bucket)
            .field("catalog", &self.catalog)
            .field("collections", &self.collections)
            .field("list_collections", &self.list_collections)
            .field("verbose", &self.verbose)
            .finish()
    }
}

mod config_ext {
    use super::*;
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            let strings = [
                ("controller.url", &self.controller_url),
                ("controller.username", &self.controller_user),
                ("controller.password", &self.controller_password),
                ("storage.endpoint", &self.storage_endpoint),
                ("storage.access_key", &self.storage_access_key),
                ("storage.secret_key", &self.storage_secret_key),
                ("storage.bucket", &self.storage_bucket),
            ];
            for (key, value) in strings {
                if let Some(value) = value {
                    cache.insert(key.to_string(), value.clone().into());
                }
            }
            if let Some(catalog) = &self.catalog {
                cache.insert("catalog".to_string(), catalog.to_string_lossy().to_string().into());
            }
            if !self.collections.is_empty() {
                cache.insert("collections".to_string(), self.collections.clone().into());
            }
            if self.verbose {
                cache.insert("verbose".to_string(), true.into());
            }
            Ok(cache)
        }
    }
}

pub fn version() -> String {
    let author = clap::crate_authors!();
    let config_dir_path = crate::get_config_dir().display().to_string();

    format!(
        "\
Authors: {author}

Config directory: {config_dir_path}"
    )
}
