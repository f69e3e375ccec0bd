//! D&D 5e SRD reference API client.
//!
//! Thin proxy over the public rules API (spells, monsters, classes, races,
//! equipment) with lookup and random-sampling helpers. One pooled
//! `reqwest::Client` is reused across all calls; the core narration path does
//! not depend on this module.

use rand::seq::SliceRandom;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default base URL for the public SRD API.
pub const DEFAULT_SRD_BASE_URL: &str = "https://www.dnd5eapi.co/api";

/// Upper bound on detail lookups per random-sampling call.
const RANDOM_SAMPLE_LOOKUP_BUDGET: usize = 25;

#[derive(Debug, thiserror::Error)]
pub enum SrdError {
    #[error("SRD request failed: {0}")]
    RequestFailed(String),
    #[error("SRD request returned status {0}")]
    Status(u16),
    #[error("Invalid SRD response: {0}")]
    InvalidResponse(String),
}

/// Resource categories exposed by the SRD API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SrdCategory {
    Spells,
    Monsters,
    Classes,
    Races,
    Equipment,
}

impl SrdCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spells => "spells",
            Self::Monsters => "monsters",
            Self::Classes => "classes",
            Self::Races => "races",
            Self::Equipment => "equipment",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "spells" => Some(Self::Spells),
            "monsters" => Some(Self::Monsters),
            "classes" => Some(Self::Classes),
            "races" => Some(Self::Races),
            "equipment" => Some(Self::Equipment),
            _ => None,
        }
    }
}

/// A list entry from the SRD API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRef {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct ResourceList {
    #[serde(default)]
    results: Vec<ResourceRef>,
}

/// Client for the SRD reference API.
#[derive(Clone)]
pub struct SrdClient {
    client: Client,
    base_url: String,
}

impl SrdClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_json(&self, path: &str) -> Result<serde_json::Value, SrdError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .send()
            .await
            .map_err(|e| SrdError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SrdError::Status(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| SrdError::InvalidResponse(e.to_string()))
    }

    /// List all resources in a category.
    pub async fn list(&self, category: SrdCategory) -> Result<Vec<ResourceRef>, SrdError> {
        let value = self.fetch_json(category.as_str()).await?;
        let list: ResourceList = serde_json::from_value(value)
            .map_err(|e| SrdError::InvalidResponse(e.to_string()))?;
        Ok(list.results)
    }

    /// Fetch the full record for one resource.
    pub async fn get(
        &self,
        category: SrdCategory,
        index: &str,
    ) -> Result<serde_json::Value, SrdError> {
        self.fetch_json(&format!("{}/{}", category.as_str(), index))
            .await
    }

    /// Case-insensitive exact-name lookup within a category.
    pub async fn search_by_name(
        &self,
        category: SrdCategory,
        name: &str,
    ) -> Result<Option<ResourceRef>, SrdError> {
        let results = self.list(category).await?;
        Ok(results
            .into_iter()
            .find(|r| r.name.eq_ignore_ascii_case(name)))
    }

    /// Sample random monsters, optionally filtered to one challenge rating.
    ///
    /// Detail lookups are bounded, so a rare challenge rating may yield fewer
    /// than `count` monsters.
    pub async fn random_monsters(
        &self,
        challenge_rating: Option<f64>,
        count: usize,
    ) -> Result<Vec<serde_json::Value>, SrdError> {
        let mut refs = self.list(SrdCategory::Monsters).await?;
        {
            let mut rng = rand::thread_rng();
            refs.shuffle(&mut rng);
        }

        let mut picked = Vec::new();
        for monster_ref in refs.iter().take(RANDOM_SAMPLE_LOOKUP_BUDGET) {
            if picked.len() >= count {
                break;
            }

            let details = match self.get(SrdCategory::Monsters, &monster_ref.index).await {
                Ok(details) => details,
                Err(e) => {
                    tracing::debug!(
                        monster = %monster_ref.index,
                        error = %e,
                        "skipping monster that failed to load"
                    );
                    continue;
                }
            };

            let matches = match challenge_rating {
                Some(cr) => details
                    .get("challenge_rating")
                    .and_then(serde_json::Value::as_f64)
                    .is_some_and(|found| (found - cr).abs() < f64::EPSILON),
                None => true,
            };
            if matches {
                picked.push(details);
            }
        }

        Ok(picked)
    }
}
