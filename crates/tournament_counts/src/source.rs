use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::{FetchError, TournamentSource};

pub const DEFAULT_STORE_URL: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_COLLECTION: &str = "tournaments";
const DEFAULT_PAGE_SIZE: u32 = 300;
const DEFAULT_MAX_PAGES: usize = 1_000;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One tournament document. Only the free-text `game` field is read; a
/// missing or non-string value is kept as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TournamentRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub game: Option<String>,
}

impl TournamentRecord {
    pub fn with_game(game: impl Into<String>) -> Self {
        Self {
            game: Some(game.into()),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| value.as_str().map(str::to_string)))
}

/// In-memory records, e.g. loaded from a JSON fixture.
#[derive(Debug, Clone, Default)]
pub struct RecordListSource {
    records: Vec<TournamentRecord>,
}

impl RecordListSource {
    pub fn new(records: Vec<TournamentRecord>) -> Self {
        Self { records }
    }

    pub fn from_json(raw: &str) -> Result<Self, FetchError> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }
}

#[async_trait]
impl TournamentSource for RecordListSource {
    async fn fetch_all(&self) -> Result<Vec<TournamentRecord>, FetchError> {
        Ok(self.records.clone())
    }
}

#[derive(Debug, Clone)]
pub struct DocumentStoreConfig {
    pub base_url: String,
    pub project: String,
    pub collection: String,
    pub api_key: Option<String>,
    pub page_size: u32,
    /// Upper bound on pages read per fetch.
    pub max_pages: usize,
    /// Applies to each page request, connect to end of body.
    pub request_timeout: Duration,
}

impl DocumentStoreConfig {
    pub fn new(base_url: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            project: project.into(),
            collection: DEFAULT_COLLECTION.to_string(),
            api_key: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    fn collection_url(&self) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|error| FetchError::InvalidEndpoint(format!("{}: {error}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidEndpoint(self.base_url.clone()))?
            .pop_if_empty()
            .extend([
                "projects",
                self.project.as_str(),
                "databases",
                "(default)",
                "documents",
                self.collection.as_str(),
            ]);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<StoredDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StoredDocument {
    #[serde(default)]
    fields: HashMap<String, Value>,
}

impl StoredDocument {
    fn into_record(self) -> TournamentRecord {
        let game = self
            .fields
            .get("game")
            .and_then(|field| field.get("stringValue"))
            .and_then(Value::as_str)
            .map(str::to_string);
        TournamentRecord { game }
    }
}

/// Reads a collection through a Firestore-style REST listing, following
/// page tokens until the collection is exhausted. A repeated token or more
/// than `max_pages` pages fails the fetch.
pub struct DocumentStoreSource {
    http: Client,
    config: DocumentStoreConfig,
}

impl DocumentStoreSource {
    pub fn new(config: DocumentStoreConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &DocumentStoreConfig {
        &self.config
    }

    async fn fetch_page(
        &self,
        url: &Url,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, FetchError> {
        let mut query: Vec<(&str, String)> = vec![("pageSize", self.config.page_size.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }
        if let Some(key) = &self.config.api_key {
            query.push(("key", key.clone()));
        }

        let page = self
            .http
            .get(url.clone())
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(page)
    }
}

#[async_trait]
impl TournamentSource for DocumentStoreSource {
    async fn fetch_all(&self) -> Result<Vec<TournamentRecord>, FetchError> {
        let url = self.config.collection_url()?;
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();
        let mut pages = 0usize;

        loop {
            if pages >= self.config.max_pages {
                return Err(FetchError::Unavailable(format!(
                    "collection listing exceeded {} pages",
                    self.config.max_pages
                )));
            }
            let page = self.fetch_page(&url, page_token.as_deref()).await?;
            pages += 1;
            records.extend(page.documents.into_iter().map(StoredDocument::into_record));
            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => {
                    if !seen_tokens.insert(token.clone()) {
                        return Err(FetchError::Unavailable(format!(
                            "document store repeated page token '{token}'"
                        )));
                    }
                    page_token = Some(token);
                }
                None => break,
            }
        }

        debug!(%url, pages, records = records.len(), "read tournament collection");
        Ok(records)
    }
}
