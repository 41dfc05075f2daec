pub mod wire;

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::record::Record;
use crate::utils;

pub const DEFAULT_API_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_LANGUAGE: &str = "en";

const USER_AGENT: &str = concat!("pokegrid/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response: {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no '{language}' genus for species: {url}")]
    MissingGenus { url: String, language: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Read-only access to the catalog service.
#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    /// Fetches one record with its species text resolved.
    async fn fetch_record(&self, id: u32) -> Result<Record, ApiError>;

    /// Fetches the member IDs of a category, in index order.
    async fn fetch_category(&self, slug: &str) -> Result<Vec<u32>, ApiError>;
}

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
    /// Requests per second; 0 disables limiting.
    pub rate: u32,
    pub language: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: 10,
            proxy: None,
            rate: 20,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: String,
    language: String,
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl PokeApiClient {
    pub fn new(options: &ClientOptions) -> Result<Self, ApiError> {
        let http = build_http_client(options.proxy.as_deref(), options.timeout_seconds)?;
        let limiter =
            NonZeroU32::new(options.rate).map(|rate| RateLimiter::direct(Quota::per_second(rate)));
        Ok(Self {
            http,
            base_url: options.base_url.trim().trim_end_matches('/').to_string(),
            language: options.language.clone(),
            limiter,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        if let Some(limiter) = self.limiter.as_ref() {
            limiter.until_ready().await;
        }
        debug!("GET {url}");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Http {
                url: url.to_string(),
                source: e,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        resp.json::<T>().await.map_err(|e| ApiError::Decode {
            url: url.to_string(),
            source: e,
        })
    }
}

impl CatalogApi for PokeApiClient {
    async fn fetch_record(&self, id: u32) -> Result<Record, ApiError> {
        let url = utils::join_url(&self.base_url, &format!("pokemon/{id}"));
        let pokemon: wire::PokemonResponse = self.get_json(&url).await?;

        let species_url = pokemon.species.url.clone();
        let species: wire::SpeciesResponse = self.get_json(&species_url).await?;
        let genus = species
            .genus_for(&self.language)
            .ok_or_else(|| ApiError::MissingGenus {
                url: species_url.clone(),
                language: self.language.clone(),
            })?
            .to_string();

        let mut record = pokemon.into_record(genus);
        // Cards are numbered by the ID that was requested.
        record.number = id;
        Ok(record)
    }

    async fn fetch_category(&self, slug: &str) -> Result<Vec<u32>, ApiError> {
        let url = utils::join_url(&self.base_url, &format!("type/{slug}"));
        let index: wire::TypeResponse = self.get_json(&url).await?;
        let ids = index
            .pokemon
            .into_iter()
            .filter_map(|member| match utils::resource_id(&member.pokemon.url) {
                Some(id) => Some(id),
                None => {
                    warn!(
                        "skipping '{}' in category '{slug}': no id in {}",
                        member.pokemon.name, member.pokemon.url
                    );
                    None
                }
            })
            .collect();
        Ok(ids)
    }
}

fn build_http_client(
    proxy: Option<&str>,
    timeout_seconds: usize,
) -> Result<reqwest::Client, ApiError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(USER_AGENT),
    );

    let timeout = Duration::from_secs(timeout_seconds.try_into().unwrap_or(10));
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(timeout);

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| ApiError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| ApiError::HttpClientBuild { source: e })
}
