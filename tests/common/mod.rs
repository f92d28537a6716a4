#![allow(dead_code)]

use axum::{
    extract::State,
    http::{
        header,
        HeaderMap,
        StatusCode,
        Uri,
    },
    response::{
        IntoResponse,
        Response,
    },
    Json,
    Router,
};
use object_store::{
    memory::InMemory,
    ObjectStore,
};
use serde_json::{
    json,
    Value,
};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        Mutex,
    },
};
use tokio::{
    net::TcpListener,
    task::JoinHandle,
};
use unifi_scraper::{
    ArchiveUploader,
    BucketStore,
    Catalog,
    CollectionFetcher,
    ControllerSession,
    Credentials,
    ScrapeRun,
    Scraper,
};
use unifi_scraper_config::Secret;

pub const BUCKET: &str = "unifi-scrapes";
pub const SESSION_COOKIE: &str = "PHPSESSID=3f2a9c";

pub const TEST_CATALOG: &str = r#"{
    "payloads": {
        "A": { "selected_collection_method": "A" },
        "B": { "selected_collection_method": "B" },
        "C": { "selected_collection_method": "C" }
    },
    "required_additional_payload_keys": { "selected_site_id": "default" }
}"#;

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub path: String,
    pub content_type: Option<String>,
    pub cookie: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn form(&self) -> HashMap<String, String> {
        url::form_urlencoded::parse(self.body.as_bytes())
            .into_owned()
            .collect()
    }
}

#[derive(Clone)]
struct ControllerState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    login_status: StatusCode,
    collections: Arc<HashMap<String, Value>>,
    raw_answers: Arc<HashMap<String, Value>>,
}

/// An API browser stand-in that records every request it gets.
pub struct MockController {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    server: JoinHandle<()>,
}

impl MockController {
    /// Collections are answered by the value of their `selected_collection_method` field. Collections without an
    /// entry are answered without a `data` field.
    pub async fn start(login_status: StatusCode, collections: HashMap<String, Value>) -> Self {
        Self::serve(login_status, collections, HashMap::new()).await
    }

    /// Answers the given collections with the bare value as response body, without the `data` envelope.
    pub async fn with_raw_answers(raw_answers: HashMap<String, Value>) -> Self {
        Self::serve(StatusCode::OK, HashMap::new(), raw_answers).await
    }

    async fn serve(
        login_status: StatusCode,
        collections: HashMap<String, Value>,
        raw_answers: HashMap<String, Value>,
    ) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = ControllerState {
            requests: requests.clone(),
            login_status,
            collections: Arc::new(collections),
            raw_answers: Arc::new(raw_answers),
        };
        let app = Router::new().fallback(handle).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
            server,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    pub fn fetched_collections(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == "/ajax/fetch_collection.php")
            .filter_map(|r| r.form().get("selected_collection_method").cloned())
            .collect()
    }
}

impl Drop for MockController {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(State(state): State<ControllerState>, uri: Uri, headers: HeaderMap, body: String) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let request = RecordedRequest {
        path: uri.path().to_string(),
        content_type: header_value(header::CONTENT_TYPE),
        cookie: header_value(header::COOKIE),
        body,
    };
    state.requests.lock().unwrap().push(request.clone());

    match request.path.as_str() {
        "/login.php" if state.login_status.is_success() => (
            StatusCode::OK,
            [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
            Json(json!({ "success": true })),
        )
            .into_response(),
        "/login.php" => (state.login_status, "invalid credentials").into_response(),
        "/ajax/update_controller.php" => StatusCode::OK.into_response(),
        "/ajax/fetch_collection.php" => {
            let method = request.form().get("selected_collection_method").cloned().unwrap_or_default();
            if let Some(raw) = state.raw_answers.get(&method) {
                return Json(raw.clone()).into_response();
            }
            match state.collections.get(&method) {
                Some(data) => Json(json!({ "data": data })).into_response(),
                None => Json(json!({ "state": "error" })).into_response(),
            }
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        username: "scraper".to_string(),
        password: Secret::new("hunter2"),
    }
}

pub fn collections() -> HashMap<String, Value> {
    HashMap::from([
        ("A".to_string(), json!([{ "oid": "5f1", "num_sta": 12, "wlan_bytes": 1024.5 }])),
        ("B".to_string(), json!({ "count": 3, "archived": false })),
        ("C".to_string(), json!([])),
    ])
}

/// A logged-in scraper for `catalog`, writing to an in-memory bucket.
pub async fn logged_in_scraper(
    mock: &MockController,
    catalog: Catalog,
    run: ScrapeRun,
) -> (Scraper, Arc<dyn ObjectStore>) {
    let session = ControllerSession::login(&mock.base_url, &credentials())
        .await
        .unwrap();
    let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
    let scraper = Scraper::new(
        CollectionFetcher::new(session, Arc::new(catalog)),
        ArchiveUploader::new(Arc::new(BucketStore::new(BUCKET, store.clone()))),
        BUCKET,
        run,
    );
    (scraper, store)
}

pub fn test_catalog() -> Catalog {
    Catalog::from_json_str(TEST_CATALOG).unwrap()
}
