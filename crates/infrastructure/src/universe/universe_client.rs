//! Universe retrieval and normalization.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use rdpgate_application::{ApplicationError, ApplicationResult, UniverseSource};
use rdpgate_domain::{
    AccessGrant, DataError, HeaderMeta, UniverseSnapshot, lenient, normalize_rows,
};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::adapters::{PlatformResponse, RedirectingHttpClient};
use crate::config::{PlatformConfig, parse_endpoint};

#[derive(Debug, Default, Deserialize)]
struct Links {
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    count: Option<u64>,
}

/// Tabular success payload of the universe endpoint.
#[derive(Debug, Deserialize)]
struct UniverseBody {
    #[serde(default)]
    links: Option<Links>,
    #[serde(default, deserialize_with = "lenient::vec_or_null")]
    headers: Vec<HeaderMeta>,
    #[serde(default, deserialize_with = "lenient::vec_or_null")]
    data: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<DataError>,
}

/// Universe endpoint client.
#[derive(Debug, Clone)]
pub struct UniverseClient {
    http: RedirectingHttpClient,
    endpoint: Url,
}

impl UniverseClient {
    /// Creates a client reading from `endpoint` unless a request overrides it.
    #[must_use]
    pub const fn new(http: RedirectingHttpClient, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// Creates a client from platform settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint does not parse or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &PlatformConfig) -> ApplicationResult<Self> {
        Ok(Self::new(RedirectingHttpClient::new(config)?, config.universe_endpoint()?))
    }

    /// The configured universe endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn cell(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(text) => Some(text),
            other => Some(other.to_string()),
        }
    }

    fn interpret(response: PlatformResponse) -> ApplicationResult<UniverseSnapshot> {
        if response.is_success() {
            if response.body_is_blank() {
                return Ok(UniverseSnapshot::default());
            }
            let body: UniverseBody = serde_json::from_slice(&response.body).map_err(|e| {
                ApplicationError::MalformedResponse(format!("universe response: {e}"))
            })?;

            let rows: Vec<Vec<Option<String>>> = body
                .data
                .into_iter()
                .map(|row| row.into_iter().map(Self::cell).collect())
                .collect();
            let records = normalize_rows(&body.headers, &rows);
            let count = body.links.and_then(|links| links.count);

            return Ok(UniverseSnapshot::new(count, body.headers, records));
        }

        let error = if response.body_is_blank() {
            DataError::from_status(response.status, response.reason)
        } else {
            let envelope: ErrorEnvelope = serde_json::from_slice(&response.body).map_err(|e| {
                ApplicationError::MalformedResponse(format!(
                    "universe error response (status {}): {e}",
                    response.status
                ))
            })?;
            match envelope.error {
                Some(error) => DataError {
                    http_status: response.status,
                    reason: response.reason,
                    ..error
                },
                None => DataError::from_status(response.status, response.reason),
            }
        };

        Err(error.into())
    }
}

#[async_trait]
impl UniverseSource for UniverseClient {
    async fn fetch_universe(
        &self,
        grant: &AccessGrant,
        override_url: Option<&str>,
    ) -> ApplicationResult<UniverseSnapshot> {
        let endpoint = match override_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(raw) => parse_endpoint(raw)?,
            None => self.endpoint.clone(),
        };
        let authorization = grant.authorization_header();

        tracing::debug!(endpoint = %endpoint, "fetching universe");

        let response = self
            .http
            .send(endpoint, |client, url| {
                client.get(url).header(AUTHORIZATION, authorization.as_str())
            })
            .await?;

        let result = Self::interpret(response);
        match &result {
            Ok(snapshot) => tracing::info!(
                count = ?snapshot.count,
                records = snapshot.records.len(),
                "universe fetched"
            ),
            Err(ApplicationError::Data(error)) => {
                tracing::warn!(status = error.http_status, code = ?error.code, "universe request rejected");
            }
            Err(_) => {}
        }
        result
    }
}
