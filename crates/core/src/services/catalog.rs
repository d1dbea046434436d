//! Music catalog client: track search pass-through.
//!
//! Thin client for the streaming platform's search API, used by the
//! submission flow. Authenticates with client credentials and caches the
//! access token until shortly before expiry.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use transitionflow_common::{AppError, AppResult, config::CatalogConfig};

/// Refresh the token this many seconds before it expires.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// A track as returned by catalog search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    /// Album art URL, largest image first in the source payload.
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

// Wire shape of the search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TracksPage,
}

#[derive(Debug, Deserialize)]
struct TracksPage {
    #[serde(default)]
    items: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<ArtistItem>,
    album: Option<AlbumItem>,
}

#[derive(Debug, Deserialize)]
struct ArtistItem {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AlbumItem {
    #[serde(default)]
    images: Vec<ImageItem>,
}

#[derive(Debug, Deserialize)]
struct ImageItem {
    url: String,
}

/// Catalog search client.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    config: CatalogConfig,
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: CatalogConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            http,
            config,
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Search the catalog for tracks.
    pub async fn search_tracks(&self, query: &str, limit: u64) -> AppResult<Vec<CatalogTrack>> {
        let token = self.access_token().await?;

        let url = format!("{}/search", self.config.api_url);
        let limit = limit.to_string();
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Catalog search failed with status {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        Ok(body.tracks.items.into_iter().map(Into::into).collect())
    }

    /// Get a valid access token, refreshing through the client-credentials
    /// flow when the cached one is missing or about to expire.
    async fn access_token(&self) -> AppResult<String> {
        {
            let cached = self.token.read().await;
            if let Some(token) = cached.as_ref()
                && token.expires_at > Utc::now()
            {
                return Ok(token.access_token.clone());
            }
        }

        let response = self
            .http
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Catalog token request failed with status {}",
                response.status()
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        let expires_at = Utc::now()
            + chrono::Duration::seconds((body.expires_in - TOKEN_EXPIRY_MARGIN_SECS).max(0));
        let access_token = body.access_token.clone();

        let mut cached = self.token.write().await;
        *cached = Some(CachedToken {
            access_token: body.access_token,
            expires_at,
        });

        Ok(access_token)
    }
}

impl From<TrackItem> for CatalogTrack {
    fn from(item: TrackItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            artists: item.artists.into_iter().map(|a| a.name).collect(),
            image: item
                .album
                .and_then(|a| a.images.into_iter().next().map(|i| i.url)),
        }
    }
}
