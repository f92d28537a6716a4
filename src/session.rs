//! # Session Manager
//!
//! Logs into the UniFi API browser and selects the controller to read from. Authentication is cookie based
//! (`PHPSESSID`), so the session keeps a cookie store for every later request.
//!
//! A rejected login is not an error: it is logged and recorded as [`LoginOutcome::Rejected`], and the controller
//! selection is sent regardless. Transport failures still abort.

use crate::error::{
    Error,
    Result,
};
use reqwest::StatusCode;
use unifi_scraper_config::{
    ControllerConfig,
    Secret,
};

pub(crate) const LOGIN_PATH: &str = "/login.php";
pub(crate) const UPDATE_CONTROLLER_PATH: &str = "/ajax/update_controller.php";
pub(crate) const FETCH_COLLECTION_PATH: &str = "/ajax/fetch_collection.php";

/// Only accounts with a single controller are supported, it is always the first one.
pub const CONTROLLER_INDEX: u32 = 1;

#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: Secret,
}

impl From<&ControllerConfig> for Credentials {
    fn from(config: &ControllerConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

/// What the API browser answered to the login request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Accepted,
    Rejected { status: StatusCode, body: String },
}

impl LoginOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, LoginOutcome::Accepted)
    }
}

/// Normalizes the configured controller location into a base URL without trailing slash. Bare hosts are reached via
/// https.
pub fn controller_base_url(location: &str) -> Result<String> {
    let location = location.trim();
    let candidate = if location.contains("://") {
        location.to_string()
    } else {
        format!("https://{location}")
    };
    url::Url::parse(&candidate).map_err(|source| Error::InvalidControllerUrl {
        url: location.to_string(),
        source,
    })?;
    Ok(candidate.trim_end_matches('/').to_string())
}

/// An HTTP client bound to one API browser, authenticated (or not, see [`LoginOutcome`]) for a single run.
#[derive(Clone, Debug)]
pub struct ControllerSession {
    client: reqwest::Client,
    base_url: String,
    login: LoginOutcome,
}

impl ControllerSession {
    /// Logs in with a fresh cookie store and selects controller [`CONTROLLER_INDEX`].
    #[instrument(level = "debug", skip(credentials), fields(user = %credentials.username))]
    pub async fn login(base_url: &str, credentials: &Credentials) -> Result<Self> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let response = client
            .post(format!("{base_url}{LOGIN_PATH}"))
            .json(&serde_json::json!({
                "username": credentials.username,
                "password": credentials.password.expose(),
            }))
            .send()
            .await?;
        let status = response.status();
        debug!(user = %credentials.username, status = status.as_u16(), "login response");

        let login = if status.is_client_error() || status.is_server_error() {
            let body = response.text().await?;
            error!(status = status.as_u16(), "Bad response");
            error!("{body}");
            LoginOutcome::Rejected { status, body }
        } else {
            LoginOutcome::Accepted
        };

        let response = client
            .post(format!("{base_url}{UPDATE_CONTROLLER_PATH}"))
            .form(&[("new_controller_idx", CONTROLLER_INDEX)])
            .send()
            .await?;
        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "controller selection was not accepted");
        }

        match &login {
            LoginOutcome::Accepted => info!("Logged in successfully"),
            LoginOutcome::Rejected { status, .. } => {
                warn!(status = status.as_u16(), "continuing without a confirmed login")
            }
        }

        Ok(Self {
            client,
            base_url,
            login,
        })
    }

    pub fn login_outcome(&self) -> &LoginOutcome {
        &self.login
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
