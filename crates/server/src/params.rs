//! Request parameters for the gateway endpoints.
//!
//! Each endpoint has one parameter struct, filled from the query string for
//! `GET` and from a JSON body for `POST`.

use rdpgate_application::{CacheMode, FetchUniverseInput, SearchUniverseInput};
use rdpgate_domain::{AccessGrant, Credential, DomainError, DomainResult, SearchKind, TokenRequest};
use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrString {
    Bool(bool),
    Text(String),
}

/// Deserializes an optional flag from a JSON bool or a `"true"`/`"false"` string.
///
/// Blank strings are treated as absent.
fn opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(value)) => Ok(Some(value)),
        Some(BoolOrString::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(de::Error::custom(format!("expected true or false, got {other:?}"))),
        },
    }
}

fn required(value: Option<&str>, field: &'static str) -> DomainResult<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(DomainError::MissingField(field))
}

/// Parameters of `GetNewToken`.
#[derive(Debug, Default, Deserialize)]
pub struct TokenParams {
    /// Platform username.
    #[serde(default)]
    pub username: Option<String>,
    /// Password for the password grant.
    #[serde(default)]
    pub password: Option<String>,
    /// Client id (app key).
    #[serde(default)]
    pub appid: Option<String>,
    /// Use the refresh-token grant instead of the password grant.
    #[serde(default, deserialize_with = "opt_bool")]
    pub userefreshtoken: Option<bool>,
    /// Refresh token for the refresh grant.
    #[serde(default)]
    pub refreshtoken: Option<String>,
}

impl TokenParams {
    /// Builds the token request, using `default_scope` for password grants.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingField`] for a missing username, app id,
    /// password or refresh token.
    pub fn into_request(self, default_scope: &str) -> DomainResult<TokenRequest> {
        let username = required(self.username.as_deref(), "username")?;
        let appid = required(self.appid.as_deref(), "appid")?;

        if self.userefreshtoken.unwrap_or(false) {
            let refresh_token = required(self.refreshtoken.as_deref(), "refreshtoken")?;
            return Ok(TokenRequest::refresh(
                Credential::new(username, String::new(), appid),
                refresh_token,
            ));
        }

        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or(DomainError::MissingField("password"))?;
        Ok(TokenRequest::password(
            Credential::new(username, password, appid).with_scope(default_scope),
        ))
    }
}

/// Parameters of `GetESGUniverse`.
#[derive(Debug, Default, Deserialize)]
pub struct UniverseParams {
    /// Access token.
    #[serde(default)]
    pub token: Option<String>,
    /// Token type, `Bearer` if omitted.
    #[serde(default)]
    pub tokentype: Option<String>,
    /// Identity to cache the snapshot under.
    #[serde(default)]
    pub username: Option<String>,
    /// Write the snapshot into the cache.
    #[serde(default, deserialize_with = "opt_bool")]
    pub updatecache: Option<bool>,
    /// Return headers and records, not just the count.
    #[serde(default, deserialize_with = "opt_bool")]
    pub showuniverse: Option<bool>,
    /// `full` or `count`.
    #[serde(default)]
    pub cachemode: Option<String>,
}

impl UniverseParams {
    /// Builds the fetch input.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] for a missing token or an unknown cache mode.
    pub fn into_input(self) -> DomainResult<FetchUniverseInput> {
        let grant = AccessGrant::new(self.token.unwrap_or_default(), self.tokentype.as_deref())?;
        let cache_mode: CacheMode = self.cachemode.as_deref().unwrap_or_default().parse()?;

        let mut input = FetchUniverseInput::new(grant);
        input.identity = self.username;
        input.update_cache = self.updatecache.unwrap_or(false);
        input.cache_mode = cache_mode;
        input.include_records = self.showuniverse.unwrap_or(true);
        Ok(input)
    }
}

/// Parameters of `SearchUniverse`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Identity whose cached snapshot is searched.
    #[serde(default)]
    pub username: Option<String>,
    /// Substring to look for.
    #[serde(default)]
    pub query: Option<String>,
    /// `permid`, `ric`, `name` or `any`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl SearchParams {
    /// Builds the search input.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSearchKind`] for an unknown type.
    pub fn into_input(self) -> DomainResult<SearchUniverseInput> {
        Ok(SearchUniverseInput {
            identity: self.username.unwrap_or_default(),
            query: self.query.unwrap_or_default(),
            kind: SearchKind::parse_or_any(self.kind.as_deref())?,
        })
    }
}
