//! Region directory client.
//!
//! Lists the municipalities of a state from the public directory endpoint
//! (`/api/ibge/municipios/v1/{uf}`). No key required; errors surface the
//! same generic way as the weather client's.

use crate::config::RegionsConfig;
use crate::models::CityOption;
use crate::{Result, TempoError};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Client for the municipality directory.
#[derive(Debug, Clone)]
pub struct RegionDirectoryClient {
    client: reqwest::Client,
    base_url: String,
    providers: String,
}

#[derive(Debug, Deserialize)]
struct Municipality {
    nome: String,
}

impl RegionDirectoryClient {
    /// Build a client from the regions configuration section.
    pub fn new(config: &RegionsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .build()
            .map_err(|e| TempoError::network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            providers: config.providers.clone(),
        })
    }

    /// List the cities of a state, in the order the directory returns them.
    pub async fn list_cities(&self, uf: &str) -> Result<Vec<CityOption>> {
        debug!(uf, "fetching city list");
        let url = format!("{}/api/ibge/municipios/v1/{uf}", self.base_url);
        let response = self
            .client
            .get(url)
            .query(&[("providers", self.providers.as_str())])
            .send()
            .await
            .map_err(|e| TempoError::network(e.to_string()))?
            .error_for_status()
            .map_err(|e| TempoError::network(e.to_string()))?;

        let municipalities: Vec<Municipality> = response
            .json()
            .await
            .map_err(|e| TempoError::malformed(e.to_string()))?;

        Ok(municipalities
            .into_iter()
            .map(|m| CityOption::new(m.nome))
            .collect())
    }
}
