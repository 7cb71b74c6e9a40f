use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    error::TidalError,
    management::Credentials,
    tidal::query::{ContentType, HttpMethod, Query},
};

pub const DEFAULT_OFFSET_PARAM: &str = "offset";
pub const DEFAULT_LIMIT_PARAM: &str = "limit";

/// A JSON list envelope such as `{ "data": [ ... ] }`.
///
/// Decoding `{}` must succeed and yield no items: failed list queries are
/// reported through an envelope decoded from an empty object.
pub trait ListEnvelope: DeserializeOwned {
    type Item;

    fn into_data(self) -> Vec<Self::Item>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListQueryStatus {
    Success,
    Failure,
}

/// Outcome of a list query. Failures are values here, not errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQueryResult<T> {
    status: ListQueryStatus,
    message: Option<String>,
    items: Vec<T>,
    offset: Option<u32>,
    limit: Option<u32>,
}

impl<T> ListQueryResult<T> {
    pub fn new(
        status: ListQueryStatus,
        message: Option<String>,
        items: Vec<T>,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Self {
        ListQueryResult {
            status,
            message,
            items,
            offset,
            limit,
        }
    }

    pub fn status(&self) -> ListQueryStatus {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == ListQueryStatus::Success
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn offset(&self) -> Option<u32> {
        self.offset
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// Converts every item, keeping status, message and paging.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> ListQueryResult<U> {
        ListQueryResult {
            status: self.status,
            message: self.message,
            items: self.items.into_iter().map(f).collect(),
            offset: self.offset,
            limit: self.limit,
        }
    }

    /// Replaces the items, keeping status, message and paging.
    pub fn with_items<U>(self, items: Vec<U>) -> ListQueryResult<U> {
        ListQueryResult {
            status: self.status,
            message: self.message,
            items,
            offset: self.offset,
            limit: self.limit,
        }
    }
}

/// A [`Query`] that pages through a list resource.
///
/// Offset and limit remember the parameter name they were stored under, so
/// the values sent can be echoed back in the [`ListQueryResult`].
#[derive(Debug, Clone)]
pub struct ListQuery {
    query: Query,
    offset_param: Option<String>,
    limit_param: Option<String>,
}

impl ListQuery {
    pub fn new(client: &Client, url: impl Into<String>) -> Self {
        ListQuery {
            query: Query::new(client, url),
            offset_param: None,
            limit_param: None,
        }
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.query = self.query.method(method);
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.query = self.query.content_type(content_type);
        self
    }

    pub fn auth(mut self, credentials: Option<&Credentials>) -> Result<Self, TidalError> {
        self.query = self.query.auth(credentials)?;
        Ok(self)
    }

    pub fn basic_auth(mut self, credentials_base64: impl Into<String>) -> Self {
        self.query = self.query.basic_auth(credentials_base64);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.query = self.query.body(body);
        self
    }

    pub fn json_body<T: Serialize>(mut self, data: &T) -> Result<Self, TidalError> {
        self.query = self.query.json_body(data)?;
        Ok(self)
    }

    pub fn parameter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query = self.query.parameter(key, value);
        self
    }

    pub fn offset(self, offset: u32) -> Self {
        self.offset_named(DEFAULT_OFFSET_PARAM, offset)
    }

    pub fn offset_named(mut self, param_name: impl Into<String>, offset: u32) -> Self {
        let param_name = param_name.into();
        self.query = self.query.parameter(param_name.clone(), offset);
        self.offset_param = Some(param_name);
        self
    }

    pub fn limit(self, limit: u32) -> Self {
        self.limit_named(DEFAULT_LIMIT_PARAM, limit)
    }

    pub fn limit_named(mut self, param_name: impl Into<String>, limit: u32) -> Self {
        let param_name = param_name.into();
        self.query = self.query.parameter(param_name.clone(), limit);
        self.limit_param = Some(param_name);
        self
    }

    pub fn target_url(&self) -> String {
        self.query.target_url()
    }

    pub async fn execute_status(self) -> Result<u16, TidalError> {
        self.query.execute_status().await
    }

    /// Sends the query and unwraps the list envelope `E`.
    ///
    /// `data_field` names the envelope field holding the items. It must be
    /// non-empty, but extraction goes through [`ListEnvelope::into_data`];
    /// the name is only used for diagnostics.
    ///
    /// Only a missing `data_field` is returned as an error. Transport, status
    /// and decode failures produce a [`ListQueryStatus::Failure`] result with
    /// the failure message and the items of an envelope decoded from `{}`.
    pub async fn execute<E: ListEnvelope>(
        self,
        data_field: &str,
    ) -> Result<ListQueryResult<E::Item>, TidalError> {
        if data_field.trim().is_empty() {
            return Err(TidalError::InvalidRequest(
                "data field name is required".to_string(),
            ));
        }

        let offset = self.recorded(self.offset_param.as_deref());
        let limit = self.recorded(self.limit_param.as_deref());

        match fetch::<E>(self.query).await {
            Ok(envelope) => {
                let items = envelope.into_data();
                debug!(data_field, count = items.len(), "list query succeeded");
                Ok(ListQueryResult::new(
                    ListQueryStatus::Success,
                    None,
                    items,
                    offset,
                    limit,
                ))
            }
            Err(err) => {
                warn!(data_field, error = %err, "list query failed");
                Ok(ListQueryResult::new(
                    ListQueryStatus::Failure,
                    Some(err.to_string()),
                    empty_items::<E>(),
                    offset,
                    limit,
                ))
            }
        }
    }

    fn recorded(&self, param_name: Option<&str>) -> Option<u32> {
        param_name
            .and_then(|name| self.query.parameters().get(name))
            .and_then(|value| value.parse().ok())
    }
}

async fn fetch<E: DeserializeOwned>(query: Query) -> Result<E, TidalError> {
    let response = query.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(TidalError::query(format!(
            "request failed with status code {}",
            status.as_u16()
        )));
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

fn empty_items<E: ListEnvelope>() -> Vec<E::Item> {
    serde_json::from_str::<E>("{}")
        .map(E::into_data)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::types::TrackListResponse;

    #[derive(Deserialize)]
    struct StrictEnvelope {
        data: Vec<u32>,
    }

    impl ListEnvelope for StrictEnvelope {
        type Item = u32;

        fn into_data(self) -> Vec<u32> {
            self.data
        }
    }

    fn list_query() -> ListQuery {
        ListQuery::new(&Client::new(), "https://example.com/tracks")
    }

    #[test]
    fn offset_and_limit_are_read_back_by_name() {
        let q = list_query()
            .parameter("countryCode", "US")
            .offset_named("skip", 5)
            .limit(10);

        assert_eq!(q.recorded(q.offset_param.as_deref()), Some(5));
        assert_eq!(q.recorded(q.limit_param.as_deref()), Some(10));
        assert!(q.target_url().contains("skip=5"));
        assert!(q.target_url().contains("limit=10"));
    }

    #[test]
    fn unset_paging_reads_back_as_none() {
        let q = list_query().parameter("offset", "not-a-number");
        assert_eq!(q.recorded(q.offset_param.as_deref()), None);
        assert_eq!(q.recorded(q.limit_param.as_deref()), None);
    }

    #[test]
    fn tolerant_envelope_yields_no_items_from_empty_object() {
        assert!(empty_items::<TrackListResponse>().is_empty());
    }

    #[test]
    fn strict_envelope_still_yields_no_items() {
        assert!(empty_items::<StrictEnvelope>().is_empty());
    }

    #[tokio::test]
    async fn missing_data_field_is_rejected() {
        let err = list_query().execute::<TrackListResponse>("").await.unwrap_err();
        assert!(matches!(err, TidalError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn get_with_body_becomes_failure_result() {
        let result = list_query()
            .body("nope")
            .limit(3)
            .execute::<TrackListResponse>("data")
            .await
            .unwrap();

        assert_eq!(result.status(), ListQueryStatus::Failure);
        assert!(result.message().unwrap().contains("GET requests cannot have a body"));
        assert!(result.items().is_empty());
        assert_eq!(result.limit(), Some(3));
    }

    #[test]
    fn map_keeps_paging() {
        let result = ListQueryResult::new(
            ListQueryStatus::Success,
            None,
            vec![1, 2, 3],
            Some(0),
            Some(3),
        )
        .map(|n| n * 10);

        assert_eq!(result.items(), &[10, 20, 30]);
        assert_eq!(result.offset(), Some(0));
        assert_eq!(result.limit(), Some(3));
    }
}
