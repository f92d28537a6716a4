//! # Payload Catalog
//!
//! Maps collection names to the form fields that make the API browser return that collection. The catalog file looks
//! like this:
//!
//! ```json
//! {
//!   "payloads": { "list_clients": { "selected_collection_method": "list_clients" } },
//!   "required_additional_payload_keys": { "selected_site_id": "default" }
//! }
//! ```
//!
//! The additional keys are merged into every payload when the catalog is built. Each entry gets its own merged map.

use crate::error::{
    Error,
    Result,
};
use serde::{
    de::{
        MapAccess,
        Visitor,
    },
    Deserialize,
    Deserializer,
    Serialize,
};
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fmt,
    path::Path,
};

const BUILTIN_CATALOG: &str = include_str!("../data/collection_payloads.json");

/// Key of the shared fields in the catalog file, also used when reporting bad fields in that section.
const ADDITIONAL_KEYS: &str = "required_additional_payload_keys";

/// Request body fields for a single collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, Value>);

impl Payload {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new payload holding the fields of `self` and `additional`. Shared keys are assumed not to collide,
    /// if they do the value from `additional` is kept.
    pub fn merged_with(&self, additional: &Payload) -> Payload {
        let mut merged = self.0.clone();
        for (key, value) in &additional.0 {
            if let Some(previous) = merged.insert(key.clone(), value.clone()) {
                debug!(%key, %previous, "additional payload key overrides collection field");
            }
        }
        Payload(merged)
    }

    /// Renders the payload as form fields. `null` fields are left out, booleans are spelled `True`/`False`.
    pub fn form_fields(&self) -> Vec<(&str, String)> {
        self.0
            .iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    Value::Null => return None,
                    Value::Bool(true) => "True".to_string(),
                    Value::Bool(false) => "False".to_string(),
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((key.as_str(), value))
            })
            .collect()
    }

    fn ensure_scalar(&self, collection: &str) -> Result<()> {
        match self.0.iter().find(|(_, v)| v.is_array() || v.is_object()) {
            Some((field, _)) => Err(Error::CatalogField {
                collection: collection.to_string(),
                field: field.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Payload {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Payload(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    payloads: OrderedPayloads,
    required_additional_payload_keys: Payload,
}

/// Collection payloads in the order they appear in the catalog file.
struct OrderedPayloads(Vec<(String, Payload)>);

impl<'de> Deserialize<'de> for OrderedPayloads {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PayloadsVisitor;

        impl<'de> Visitor<'de> for PayloadsVisitor {
            type Value = OrderedPayloads;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of collection names to payloads")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut payloads = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Payload>()? {
                    payloads.push(entry);
                }
                Ok(OrderedPayloads(payloads))
            }
        }

        deserializer.deserialize_map(PayloadsVisitor)
    }
}

/// Immutable registry of collections, with the additional keys already merged into every payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    order: Vec<String>,
    entries: BTreeMap<String, Payload>,
}

impl Catalog {
    /// Reads and merges the catalog file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&content)?;
        debug!(?path, collections = catalog.len(), "loaded collection catalog");
        Ok(catalog)
    }

    /// The catalog shipped with this crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json).map_err(Error::CatalogParse)?;
        Self::from_parts(file.payloads.0, &file.required_additional_payload_keys)
    }

    /// Builds a catalog keeping the order of `payloads`. A repeated name keeps its first position and its last
    /// payload.
    pub fn from_parts(payloads: impl IntoIterator<Item = (String, Payload)>, additional: &Payload) -> Result<Self> {
        additional.ensure_scalar(ADDITIONAL_KEYS)?;
        let mut catalog = Self::default();
        for (name, payload) in payloads {
            payload.ensure_scalar(&name)?;
            let merged = payload.merged_with(additional);
            if catalog.entries.insert(name.clone(), merged).is_none() {
                catalog.order.push(name);
            }
        }
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&Payload> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Collection names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
