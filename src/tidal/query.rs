use std::collections::BTreeMap;

use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{error::TidalError, management::Credentials, utils};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    TidalJson,
    FormUrlEncoded,
}

impl ContentType {
    pub fn value(self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::TidalJson => "application/vnd.tidal.v1+json",
            ContentType::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }

    /// Media type requested back from the server for this content type.
    fn accept(self) -> &'static str {
        match self {
            ContentType::TidalJson => ContentType::TidalJson.value(),
            ContentType::Json | ContentType::FormUrlEncoded => ContentType::Json.value(),
        }
    }
}

/// Everything a query accumulates before it is sent.
#[derive(Debug, Clone, Default)]
pub struct QueryConfig {
    method: HttpMethod,
    content_type: Option<ContentType>,
    bearer_token: Option<String>,
    basic_credentials: Option<String>,
    body: Option<String>,
    parameters: BTreeMap<String, String>,
}

/// A single-use request against one TIDAL resource.
///
/// Builder methods take the query by value and `execute*` consumes it, so a
/// query cannot be changed once it has been sent.
///
/// ```ignore
/// let track: TrackResponse = Query::new(&client, url)
///     .content_type(ContentType::TidalJson)
///     .auth(store.get().as_deref())?
///     .parameter("countryCode", "US")
///     .execute()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    client: Client,
    url: String,
    config: QueryConfig,
}

impl Query {
    pub fn new(client: &Client, url: impl Into<String>) -> Self {
        Query {
            client: client.clone(),
            url: url.into(),
            config: QueryConfig::default(),
        }
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.config.method = method;
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.config.content_type = Some(content_type);
        self
    }

    /// Attaches bearer credentials.
    ///
    /// Fails with [`TidalError::Unauthorized`] when there are no credentials,
    /// the token is empty, or it has already expired.
    pub fn auth(mut self, credentials: Option<&Credentials>) -> Result<Self, TidalError> {
        let credentials = credentials.ok_or(TidalError::Unauthorized)?;
        if credentials.access_token().is_empty() || credentials.expires_in_seconds() == 0 {
            return Err(TidalError::Unauthorized);
        }

        self.config.bearer_token = Some(credentials.access_token().to_string());
        Ok(self)
    }

    /// Attaches pre-encoded basic credentials. Only the token endpoint uses
    /// these; bearer credentials win if both are present.
    pub fn basic_auth(mut self, credentials_base64: impl Into<String>) -> Self {
        self.config.basic_credentials = Some(credentials_base64.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.config.body = Some(body.into());
        self
    }

    /// Serializes `data` as the request body, defaulting the content type to JSON.
    pub fn json_body<T: Serialize>(mut self, data: &T) -> Result<Self, TidalError> {
        self.config.body = Some(serde_json::to_string(data)?);
        self.config.content_type.get_or_insert(ContentType::Json);
        Ok(self)
    }

    pub fn parameter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.config.parameters.insert(key.into(), value.to_string());
        self
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.config.parameters
    }

    /// The url the query will hit, query string included.
    pub fn target_url(&self) -> String {
        let mut url = self.url.clone();
        for (key, value) in &self.config.parameters {
            utils::append_query_parameter(&mut url, key, value);
        }
        url
    }

    /// Sends the query and returns the raw status code.
    pub async fn execute_status(self) -> Result<u16, TidalError> {
        let response = self.send().await?;
        Ok(response.status().as_u16())
    }

    /// Sends the query and decodes a `200 OK` body into `T`.
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T, TidalError> {
        let response = self.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(TidalError::query(format!(
                "request failed with status code {}",
                status.as_u16()
            )));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub(crate) async fn send(self) -> Result<Response, TidalError> {
        Ok(self.build()?.send().await?)
    }

    pub(crate) fn build(self) -> Result<RequestBuilder, TidalError> {
        let url = self.target_url();
        let QueryConfig {
            method,
            content_type,
            bearer_token,
            basic_credentials,
            body,
            ..
        } = self.config;

        if body.is_some() && method == HttpMethod::Get {
            return Err(TidalError::InvalidRequest(
                "GET requests cannot have a body".to_string(),
            ));
        }

        let accept = content_type.map_or(ContentType::Json.value(), ContentType::accept);
        let mut request = self
            .client
            .request(method.into(), &url)
            .header(ACCEPT, accept);

        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type.value());
        }

        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        } else if let Some(basic) = basic_credentials {
            request = request.header(AUTHORIZATION, format!("Basic {basic}"));
        }

        if let Some(body) = body {
            request = request.body(body);
        }

        debug!(?method, %url, "built query");
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn query(url: &str) -> Query {
        Query::new(&Client::new(), url)
    }

    fn valid_credentials() -> Credentials {
        Credentials::new("token-123", 3600)
    }

    #[test]
    fn parameters_are_appended_verbatim() {
        let q = query("https://openapi.tidal.com/v1/tracks")
            .parameter("countryCode", "US")
            .parameter("ids", "1,2,3");

        let url = q.target_url();
        assert!(url.starts_with("https://openapi.tidal.com/v1/tracks?"));
        assert!(url.contains("countryCode=US"));
        assert!(url.contains("ids=1,2,3"));
        assert_eq!(url.matches('?').count(), 1);
        assert_eq!(url.matches('&').count(), 1);
    }

    #[test]
    fn parameters_extend_an_existing_query_string() {
        let url = query("https://example.com/tracks?x=1")
            .parameter("limit", 10)
            .target_url();
        assert_eq!(url, "https://example.com/tracks?x=1&limit=10");
    }

    #[test]
    fn auth_rejects_missing_credentials() {
        let err = query("https://example.com").auth(None).unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn auth_rejects_empty_token() {
        let creds = Credentials::new("", 3600);
        let err = query("https://example.com").auth(Some(&creds)).unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn auth_rejects_expired_token() {
        let creds = Credentials::issued_at("token", 60, Utc::now() - Duration::seconds(61));
        let err = query("https://example.com").auth(Some(&creds)).unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn get_with_body_is_invalid() {
        let err = query("https://example.com").body("payload").build().unwrap_err();
        assert!(matches!(err, TidalError::InvalidRequest(_)));
    }

    #[test]
    fn bearer_wins_over_basic() {
        let creds = valid_credentials();
        let request = query("https://example.com")
            .basic_auth("aWQ6c2VjcmV0")
            .auth(Some(&creds))
            .unwrap()
            .build()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.headers()[AUTHORIZATION], "Bearer token-123");
    }

    #[test]
    fn basic_auth_is_used_without_bearer() {
        let request = query("https://example.com")
            .method(HttpMethod::Post)
            .content_type(ContentType::FormUrlEncoded)
            .basic_auth("aWQ6c2VjcmV0")
            .body("grant_type=client_credentials")
            .build()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.headers()[AUTHORIZATION], "Basic aWQ6c2VjcmV0");
        assert_eq!(request.headers()[ACCEPT], "application/json");
        assert_eq!(
            request.headers()[CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn tidal_json_requests_ask_for_tidal_json() {
        let creds = valid_credentials();
        let request = query("https://example.com")
            .content_type(ContentType::TidalJson)
            .auth(Some(&creds))
            .unwrap()
            .build()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.headers()[ACCEPT], "application/vnd.tidal.v1+json");
        assert_eq!(
            request.headers()[CONTENT_TYPE],
            "application/vnd.tidal.v1+json"
        );
    }

    #[test]
    fn json_body_defaults_content_type() {
        let request = query("https://example.com")
            .method(HttpMethod::Put)
            .json_body(&serde_json::json!({ "a": 1 }))
            .unwrap()
            .build()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(request.body().and_then(|b| b.as_bytes()), Some(&b"{\"a\":1}"[..]));
    }
}
