//! # UniFi Scraper
//!
//! Logs into a UniFi API browser, fetches a fixed catalog of statistics collections and archives each one as a JSON
//! object in S3-compatible storage under `{YYYY}/{MM}/{DD}/{collection}--{YYYY-MM-DD--HH-MM-SS}.json`.
//!
//! - **`catalog`**: collection name to request payload registry
//! - **`session`**: login and controller selection
//! - **`fetch`**: one request per collection, returns the `data` field
//! - **`archive`**: JSON serialization and object storage upload
//! - **`scrape`**: sequential fetch and upload of a whole run

#[macro_use]
extern crate tracing;

pub mod archive;
pub mod catalog;
pub mod error;
pub mod fetch;
mod hooks;
mod logging;
pub mod run;
pub mod scrape;
pub mod session;

pub use archive::{
    ArchiveStore,
    ArchiveUploader,
    BucketStore,
};
pub use catalog::{
    Catalog,
    Payload,
};
pub use error::{
    Error,
    Result,
};
pub use fetch::CollectionFetcher;
pub use hooks::init_errors;
pub use logging::init_logging;
pub use run::{
    object_key,
    ScrapeRun,
};
pub use scrape::{
    run,
    run_with,
    ArchivedObject,
    ScrapeReport,
    Scraper,
};
pub use session::{
    controller_base_url,
    ControllerSession,
    Credentials,
    LoginOutcome,
};
