//! Wikipedia summary lookup
//!
//! `WikipediaClient` talks to the MediaWiki action API. `fetch_description`
//! wraps any `EncyclopediaService` with the disambiguation fallback and
//! always yields displayable text.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::DestinaError;
use crate::config::WikipediaConfig;
use crate::models::CityName;

/// Shown when a disambiguation retry does not produce a summary
pub const DISAMBIGUATION_APOLOGY: &str = "Sorry, couldn't find a proper description for this city.";

/// Prefix of the message shown for every other lookup failure
pub const FETCH_APOLOGY_PREFIX: &str = "Sorry, couldn't fetch the description";

/// Failure modes of an encyclopedia lookup
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("\"{title}\" may refer to several pages")]
    Disambiguation { title: String, options: Vec<String> },

    #[error("Page \"{0}\" does not match any pages")]
    PageNotFound(String),

    #[error("Page \"{0}\" has no summary text")]
    EmptySummary(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A read-only lookup of short article summaries by title
#[async_trait]
pub trait EncyclopediaService: Send + Sync {
    async fn summary(&self, title: &str, sentences: u32) -> Result<String, LookupError>;
}

/// Fetch a city description, retrying once on disambiguation.
///
/// Never returns an empty string: a blank summary counts as a failed lookup.
#[instrument(skip(service, city), fields(city = %city))]
pub async fn fetch_description(
    service: &dyn EncyclopediaService,
    city: &CityName,
    sentences: u32,
) -> String {
    match non_blank_summary(service, city.as_str(), sentences).await {
        Ok(summary) => summary,
        Err(LookupError::Disambiguation { title, options }) => {
            let Some(alternative) = options.first() else {
                warn!("Disambiguation for \"{}\" offered no alternatives", title);
                return DISAMBIGUATION_APOLOGY.to_string();
            };
            info!(
                "\"{}\" is ambiguous, retrying with \"{}\" ({} options)",
                title,
                alternative,
                options.len()
            );
            match non_blank_summary(service, alternative, sentences).await {
                Ok(summary) => summary,
                Err(e) => {
                    warn!("Retry with \"{}\" failed: {}", alternative, e);
                    DISAMBIGUATION_APOLOGY.to_string()
                }
            }
        }
        Err(e) => {
            warn!("Description lookup failed: {}", e);
            format!("{FETCH_APOLOGY_PREFIX}: {e}")
        }
    }
}

async fn non_blank_summary(
    service: &dyn EncyclopediaService,
    title: &str,
    sentences: u32,
) -> Result<String, LookupError> {
    let summary = service.summary(title, sentences).await?;
    if summary.trim().is_empty() {
        return Err(LookupError::EmptySummary(title.to_string()));
    }
    Ok(summary)
}

/// Alternatives listed on a rendered disambiguation page, in page order.
///
/// Each list item contributes the text of its first link; table-of-contents
/// entries are skipped.
fn list_options(html: &str) -> Vec<String> {
    let document = Html::parse_fragment(html);
    let (Ok(item_sel), Ok(link_sel)) = (Selector::parse("li"), Selector::parse("a")) else {
        return Vec::new();
    };

    document
        .select(&item_sel)
        .filter(|item| !item.value().classes().any(|c| c.starts_with("tocsection")))
        .filter_map(|item| item.select(&link_sel).next())
        .map(|link| link.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// MediaWiki action API client
pub struct WikipediaClient {
    client: Client,
    base_url: String,
}

impl WikipediaClient {
    /// Create a new client from configuration
    pub fn new(config: &WikipediaConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("Destina/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DestinaError::api(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    async fn request<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, LookupError> {
        debug!("MediaWiki request to {} with {:?}", self.base_url, params);

        let response = self
            .client
            .get(&self.base_url)
            .query(params)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Transport(format!(
                "Wikipedia returned HTTP {status}"
            )));
        }

        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

        if let Some(error) = &body.error {
            return Err(LookupError::InvalidResponse(format!(
                "{}: {}",
                error.code, error.info
            )));
        }

        Ok(body.body)
    }

    /// Alternatives listed on a disambiguation page, in the order the page shows them
    async fn disambiguation_options(&self, title: &str) -> Result<Vec<String>, LookupError> {
        let body: ParseBody = self
            .request(&[
                ("action", "parse"),
                ("prop", "text"),
                ("redirects", "1"),
                ("format", "json"),
                ("formatversion", "2"),
                ("page", title),
            ])
            .await?;

        Ok(body
            .parse
            .map(|parsed| list_options(&parsed.text))
            .unwrap_or_default())
    }
}

#[async_trait]
impl EncyclopediaService for WikipediaClient {
    #[instrument(skip(self))]
    async fn summary(&self, title: &str, sentences: u32) -> Result<String, LookupError> {
        // MediaWiki splits `titles` on '|', which is never legal inside a title
        if title.contains('|') {
            return Err(LookupError::PageNotFound(title.to_string()));
        }

        let sentences = sentences.to_string();
        let body: QueryBody = self
            .request(&[
                ("action", "query"),
                ("prop", "extracts|pageprops"),
                ("ppprop", "disambiguation"),
                ("explaintext", "1"),
                ("exsentences", sentences.as_str()),
                ("redirects", "1"),
                ("format", "json"),
                ("formatversion", "2"),
                ("titles", title),
            ])
            .await?;

        let page = body
            .first_page()
            .ok_or_else(|| LookupError::PageNotFound(title.to_string()))?;

        if page.missing || page.invalid {
            return Err(LookupError::PageNotFound(title.to_string()));
        }

        if page.is_disambiguation() {
            let options = self.disambiguation_options(&page.title).await?;
            return Err(LookupError::Disambiguation {
                title: page.title,
                options,
            });
        }

        match page.extract {
            Some(extract) if !extract.trim().is_empty() => {
                debug!("Fetched {} byte summary for \"{}\"", extract.len(), page.title);
                Ok(extract.trim().to_string())
            }
            _ => Err(LookupError::EmptySummary(page.title)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(flatten)]
    body: T,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    query: Option<Query>,
}

impl QueryBody {
    fn first_page(self) -> Option<Page> {
        self.query?.pages.into_iter().next()
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    info: String,
}

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    extract: Option<String>,
    pageprops: Option<PageProps>,
}

impl Page {
    fn is_disambiguation(&self) -> bool {
        self.pageprops
            .as_ref()
            .is_some_and(|props| props.disambiguation.is_some())
    }
}

#[derive(Debug, Deserialize)]
struct PageProps {
    disambiguation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ParseBody {
    #[serde(default)]
    parse: Option<ParsedPage>,
}

#[derive(Debug, Deserialize)]
struct ParsedPage {
    text: String,
}
