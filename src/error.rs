use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to read collection catalog {path:?}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Collection catalog is malformed: {0}")]
    CatalogParse(#[source] serde_json::Error),
    #[error("Payload field `{field}` of `{collection}` must be a string, number, boolean or null")]
    CatalogField { collection: String, field: String },
    #[error("Collection `{0}` is not implemented")]
    UnknownCollection(String),
    #[error("Answer for collection `{collection}` is {kind}, expected an object")]
    UnexpectedResponse { collection: String, kind: &'static str },
    #[error("Invalid controller URL {url:?}: {source}")]
    InvalidControllerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Request to the controller failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Object storage request failed: {0}")]
    Storage(#[from] object_store::Error),
    #[error("Invalid object key: {0}")]
    StoragePath(#[from] object_store::path::Error),
    #[error("Failed to serialize collection: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Store for bucket `{expected}` cannot write to bucket `{requested}`")]
    BucketMismatch { expected: String, requested: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
