//! Wikipedia action API client.
//!
//! Issues the two calls the watcher needs against `api.php`: a geosearch
//! around a coordinate and an intro-extract lookup for a single page id.
//! Response parsing is split into pure functions so the shape handling can
//! be exercised without the network.

use std::collections::HashMap;
use std::time::Duration;

use common::config::WatchConfig;
use common::{Coordinate, Error, PageDetails, PoiSummary};
use reqwest::header::{HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::debug;

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Wikipedia API client with connection pooling and User-Agent header.
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    client: reqwest::Client,
    api_url: String,
    user_agent: HeaderValue,
    search_radius_m: u32,
    result_limit: u32,
}

// ── Wikipedia response types ──────────────────────────────────────────

/// Response from `list=geosearch` with `formatversion=2`.
#[derive(Debug, Deserialize)]
pub struct GeosearchResponse {
    #[serde(default)]
    pub query: Option<GeosearchQuery>,
}

#[derive(Debug, Deserialize)]
pub struct GeosearchQuery {
    #[serde(default)]
    pub geosearch: Option<Vec<PoiSummary>>,
}

/// Response from `prop=extracts` (format version 1: pages keyed by id).
#[derive(Debug, Deserialize)]
pub struct ExtractsResponse {
    #[serde(default)]
    pub query: Option<ExtractsQuery>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractsQuery {
    #[serde(default)]
    pub pages: Option<HashMap<String, ExtractPage>>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractPage {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub extract: Option<String>,
}

// ── Parsing ───────────────────────────────────────────────────────────

/// Parse a geosearch body. A body without `query.geosearch` means no hits.
pub fn parse_geosearch(body: &str) -> Result<Vec<PoiSummary>, Error> {
    let payload: GeosearchResponse = serde_json::from_str(body)
        .map_err(|e| Error::MalformedResponse(format!("geosearch body: {e}")))?;

    Ok(payload
        .query
        .and_then(|q| q.geosearch)
        .unwrap_or_default())
}

/// Parse an extracts body for `page_id`.
///
/// The page entry and its title are required. Pages without an intro come
/// back with no `extract` key and get empty notes.
pub fn parse_extracts(page_id: u64, body: &str) -> Result<PageDetails, Error> {
    let payload: ExtractsResponse = serde_json::from_str(body)
        .map_err(|e| Error::MalformedResponse(format!("extracts body for {page_id}: {e}")))?;

    let Some(mut pages) = payload.query.and_then(|q| q.pages) else {
        return Err(Error::MalformedResponse(format!(
            "no query.pages for {page_id}"
        )));
    };

    let Some(page) = pages.remove(&page_id.to_string()) else {
        return Err(Error::MalformedResponse(format!(
            "page {page_id} absent from query.pages"
        )));
    };

    let Some(title) = page.title else {
        return Err(Error::MalformedResponse(format!("page {page_id} has no title")));
    };

    Ok(PageDetails {
        title,
        extract: page.extract.unwrap_or_default(),
    })
}

fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

// ── Implementation ────────────────────────────────────────────────────

impl WikipediaClient {
    pub fn new(cfg: &WatchConfig) -> Result<Self, Error> {
        let user_agent = HeaderValue::from_str(&cfg.user_agent)
            .map_err(|e| Error::Config(format!("invalid user_agent: {e}")))?;

        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .timeout(Duration::from_secs(cfg.timing.request_timeout_secs))
            .build()
            .map_err(|e| Error::Http(format!("failed to build Wikipedia HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: cfg.api_url.clone(),
            user_agent,
            search_radius_m: cfg.search.search_radius_m,
            result_limit: cfg.search.result_limit,
        })
    }

    /// Query for `list=geosearch` around `at`.
    fn geosearch_query(&self, at: Coordinate) -> [(&'static str, String); 7] {
        [
            ("action", "query".to_string()),
            ("format", "json".to_string()),
            ("list", "geosearch".to_string()),
            ("formatversion", "2".to_string()),
            ("gscoord", format!("{}|{}", at.latitude, at.longitude)),
            ("gsradius", self.search_radius_m.to_string()),
            ("gslimit", self.result_limit.to_string()),
        ]
    }

    /// Query for the intro extract of one page.
    fn extracts_query(page_id: u64) -> [(&'static str, String); 6] {
        [
            ("action", "query".to_string()),
            ("format", "json".to_string()),
            ("prop", "extracts".to_string()),
            ("exlimit", "max".to_string()),
            ("exintro", "true".to_string()),
            ("pageids", page_id.to_string()),
        ]
    }

    fn request(&self, query: &[(&str, String)]) -> reqwest::RequestBuilder {
        self.client
            .get(&self.api_url)
            .header(USER_AGENT, self.user_agent.clone())
            .query(query)
    }

    async fn get_body(&self, query: &[(&str, String)], what: &str) -> Result<String, Error> {
        let resp = self
            .request(query)
            .send()
            .await
            .map_err(|e| Error::Http(format!("{what}: {e}")))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Http(format!("{what}: reading body: {e}")))?;

        if status != 200 {
            return Err(Error::UpstreamStatus {
                status,
                message: format!("{what}: {}", truncate_body(&body)),
            });
        }

        Ok(body)
    }

    /// Pages geotagged within the configured radius of `at`.
    pub async fn geosearch(&self, at: Coordinate) -> Result<Vec<PoiSummary>, Error> {
        let query = self.geosearch_query(at);

        debug!("Geosearch at {} via {}", at, self.api_url);

        let body = self.get_body(&query, &format!("geosearch at {at}")).await?;
        let hits = parse_geosearch(&body)?;

        debug!("Geosearch at {} returned {} pages", at, hits.len());
        Ok(hits)
    }

    /// Title and intro extract for one page.
    pub async fn fetch_details(&self, page_id: u64) -> Result<PageDetails, Error> {
        let query = Self::extracts_query(page_id);

        debug!("Fetching extract for page {}", page_id);

        let body = self
            .get_body(&query, &format!("extract for page {page_id}"))
            .await?;
        parse_extracts(page_id, &body)
    }
}
