use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::facility::Coordinates;
use crate::fetch::auth::UrlParam;
use crate::fetch::{fetch_bytes, BasicClient};
use crate::services::geocoder::{Confidence, GeocodeMatch, Geocoder};

pub const TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

const BASE_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    /// `[lng, lat]`
    center: [f64; 2],
    #[serde(default)]
    place_name: String,
    #[serde(default)]
    relevance: f64,
}

fn confidence_for(relevance: f64) -> Confidence {
    match relevance {
        r if r >= 0.9 => Confidence::High,
        r if r >= 0.7 => Confidence::Medium,
        _ => Confidence::Low,
    }
}

/// Reads the best feature out of a Mapbox forward-geocoding response.
///
/// An empty feature list is `Ok(None)`.
pub fn parse_response(bytes: &[u8]) -> Result<Option<GeocodeMatch>> {
    let collection: FeatureCollection = serde_json::from_slice(bytes)?;
    let Some(best) = collection.features.into_iter().next() else {
        return Ok(None);
    };

    let [lng, lat] = best.center;
    let coordinates = Coordinates::new(lat, lng);
    coordinates
        .validate()
        .map_err(|e| anyhow!("geocoder returned {e}"))?;

    Ok(Some(GeocodeMatch {
        coordinates,
        matched_address: best.place_name,
        confidence: confidence_for(best.relevance),
    }))
}

/// [`Geocoder`] backed by the Mapbox places API.
pub struct MapboxGeocoder {
    client: UrlParam<BasicClient>,
    base_url: String,
}

impl MapboxGeocoder {
    pub fn new(access_token: String, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: UrlParam::new(BasicClient::new(timeout)?, "access_token", access_token),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Reads the token from `MAPBOX_ACCESS_TOKEN`.
    pub fn from_env(timeout: Duration) -> Result<Self> {
        let token = std::env::var(TOKEN_ENV)
            .map_err(|_| anyhow!("{TOKEN_ENV} must be set to validate coordinates"))?;
        Self::new(token, timeout)
    }

    fn search_url(&self, query: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("base url cannot take a path"))?
            .push(&format!("{query}.json"));
        url.query_pairs_mut()
            .append_pair("limit", "1")
            .append_pair("types", "poi,address");
        Ok(url)
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    #[tracing::instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Option<GeocodeMatch>> {
        let url = self.search_url(query)?;
        let bytes = fetch_bytes(&self.client, url.as_str()).await?;
        let found = parse_response(&bytes)?;
        debug!(found = found.is_some(), "Mapbox search complete");
        Ok(found)
    }
}
