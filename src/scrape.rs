//! # Scrape Orchestrator
//!
//! Drives fetch and upload for each collection, strictly one after another. The first failing collection aborts the
//! run; objects uploaded before it stay in storage.

use crate::{
    archive::{
        ArchiveStore,
        ArchiveUploader,
        BucketStore,
    },
    catalog::Catalog,
    error::Result,
    fetch::CollectionFetcher,
    run::ScrapeRun,
    session::{
        controller_base_url,
        ControllerSession,
        Credentials,
    },
};
use chrono::{
    DateTime,
    Utc,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use unifi_scraper_config::{
    Config,
    StorageConfig,
};

/// An object written by a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArchivedObject {
    pub collection: String,
    pub bucket: String,
    pub key: String,
    pub size: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScrapeReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub objects: Vec<ArchivedObject>,
}

pub struct Scraper {
    fetcher: CollectionFetcher,
    uploader: ArchiveUploader,
    bucket: String,
    run: ScrapeRun,
}

impl Scraper {
    pub fn new(
        fetcher: CollectionFetcher,
        uploader: ArchiveUploader,
        bucket: impl Into<String>,
        run: ScrapeRun,
    ) -> Self {
        Self {
            fetcher,
            uploader,
            bucket: bucket.into(),
            run,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.fetcher.catalog()
    }

    /// Fetches `name` and uploads it under the run's key. A response without `data` is archived as `null`.
    #[instrument(level = "debug", skip(self), fields(run_id = %self.run.id()))]
    pub async fn fetch_and_upload(&self, name: &str) -> Result<ArchivedObject> {
        let collection = self.fetcher.fetch(name).await?.unwrap_or_else(|| {
            warn!(collection = name, "response has no data field, archiving null");
            Value::Null
        });

        let key = self.run.object_key(name);
        let size = self.uploader.upload(&collection, &self.bucket, &key).await?;

        Ok(ArchivedObject {
            collection: name.to_string(),
            bucket: self.bucket.clone(),
            key,
            size,
        })
    }

    pub async fn scrape_all(&self) -> Result<ScrapeReport> {
        let names: Vec<String> = self.catalog().names().map(str::to_string).collect();
        self.scrape_subset(names).await
    }

    pub async fn scrape_subset<I, S>(&self, names: I) -> Result<ScrapeReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut objects = Vec::new();
        for name in names {
            let name = name.as_ref();
            info!("Scraping and uploading {name}");
            objects.push(self.fetch_and_upload(name).await?);
        }
        Ok(ScrapeReport {
            run_id: self.run.id().to_string(),
            started_at: self.run.start_time(),
            objects,
        })
    }
}

/// One complete run against the configured S3-compatible storage.
pub async fn run(config: &Config, catalog: Catalog) -> Result<ScrapeReport> {
    run_with(config, catalog, connect_s3).await
}

fn connect_s3(storage: &StorageConfig) -> Result<Arc<dyn ArchiveStore>> {
    Ok(Arc::new(BucketStore::s3(storage)?))
}

/// Logs in, then connects the storage through `connect_storage` and scrapes the configured collections (all when
/// none are configured).
#[instrument(level = "debug", skip_all)]
pub async fn run_with<F>(config: &Config, catalog: Catalog, connect_storage: F) -> Result<ScrapeReport>
where
    F: FnOnce(&StorageConfig) -> Result<Arc<dyn ArchiveStore>>,
{
    let scrape_run = ScrapeRun::start();
    info!(run_id = scrape_run.id(), collections = catalog.len(), "starting scrape");

    let base_url = controller_base_url(&config.controller.url)?;
    let session = ControllerSession::login(&base_url, &Credentials::from(&config.controller)).await?;
    let store = connect_storage(&config.storage)?;

    let scraper = Scraper::new(
        CollectionFetcher::new(session, Arc::new(catalog)),
        ArchiveUploader::new(store),
        config.storage.bucket.clone(),
        scrape_run,
    );

    let report = if config.collections.is_empty() {
        scraper.scrape_all().await?
    } else {
        scraper.scrape_subset(&config.collections).await?
    };

    info!(
        run_id = %report.run_id,
        objects = report.objects.len(),
        "Success! Check your object storage for the results."
    );
    Ok(report)
}
