use chrono::{
    DateTime,
    Utc,
};
use rand::Rng;

/// Largest random suffix of a run id.
const RUN_ID_SUFFIX_MAX: u8 = 10;

/// Identity of one scrape run. Every object of a run is keyed by the moment the run started, not by the time its
/// collection was fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeRun {
    started_at: DateTime<Utc>,
    id: String,
}

impl ScrapeRun {
    pub fn start() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(started_at: DateTime<Utc>) -> Self {
        let suffix = rand::thread_rng().gen_range(0..=RUN_ID_SUFFIX_MAX);
        let id = format!("{}-{suffix}", fractional_timestamp(&started_at));
        Self { started_at, id }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn object_key(&self, collection: &str) -> String {
        object_key(&self.started_at, collection)
    }
}

/// Seconds since the epoch with microseconds, trailing zeros trimmed down to one fractional digit.
fn fractional_timestamp(at: &DateTime<Utc>) -> String {
    let micros = format!("{:06}", at.timestamp_subsec_micros());
    let fraction = micros.trim_end_matches('0');
    let fraction = if fraction.is_empty() { "0" } else { fraction };
    format!("{}.{fraction}", at.timestamp())
}

/// `{YYYY}/{MM}/{DD}/{collection}--{YYYY-MM-DD--HH-MM-SS}.json`
pub fn object_key(started_at: &DateTime<Utc>, collection: &str) -> String {
    format!(
        "{}/{collection}--{}.json",
        started_at.format("%Y/%m/%d"),
        started_at.format("%Y-%m-%d--%H-%M-%S")
    )
}
