use crate::{
    catalog::Catalog,
    error::{
        Error,
        Result,
    },
    session::{
        ControllerSession,
        FETCH_COLLECTION_PATH,
    },
};
use serde_json::Value;
use std::sync::Arc;

/// Fetches catalog collections through an authenticated session, one request per collection.
#[derive(Clone, Debug)]
pub struct CollectionFetcher {
    session: ControllerSession,
    catalog: Arc<Catalog>,
}

impl CollectionFetcher {
    pub fn new(session: ControllerSession, catalog: Arc<Catalog>) -> Self {
        Self { session, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the `data` field of the API browser's answer, `None` when the answer has none. Unknown names fail
    /// before anything is sent, answers that are not a JSON object fail with [`Error::UnexpectedResponse`].
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch(&self, name: &str) -> Result<Option<Value>> {
        let payload = self
            .catalog
            .get(name)
            .ok_or_else(|| Error::UnknownCollection(name.to_string()))?;

        let response = self
            .session
            .client()
            .post(self.session.endpoint(FETCH_COLLECTION_PATH))
            .form(&payload.form_fields())
            .send()
            .await?;
        debug!(status = response.status().as_u16(), "fetch_collection response");

        match response.json::<Value>().await? {
            Value::Object(mut body) => Ok(body.remove("data")),
            other => Err(Error::UnexpectedResponse {
                collection: name.to_string(),
                kind: json_kind(&other),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
