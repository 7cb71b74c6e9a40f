//! Error types shared by the authorization flow and the query engine.

use thiserror::Error;

/// Boxed cause carried by [`TidalError::QueryFailure`].
pub type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Failures surfaced by the TIDAL client.
///
/// Single-resource queries return these directly. List queries absorb
/// everything that happens after the request is built into a
/// [`ListQueryResult`](crate::tidal::ListQueryResult) with a failure status.
#[derive(Error, Debug)]
pub enum TidalError {
    /// Client id or client secret was empty.
    #[error("invalid credentials: client id and client secret are required")]
    InvalidCredentials,

    /// The authorization endpoint rejected the client, or a resource call was
    /// attempted without a usable access token.
    #[error("unauthorized")]
    Unauthorized,

    /// The request could not be assembled, e.g. a body on a GET request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Transport, status or decode failure while executing a query.
    #[error("query failed: {message}")]
    QueryFailure {
        message: String,
        #[source]
        source: Option<Cause>,
    },
}

impl TidalError {
    pub fn query(message: impl Into<String>) -> Self {
        TidalError::QueryFailure {
            message: message.into(),
            source: None,
        }
    }

    pub fn query_with(message: impl Into<String>, source: impl Into<Cause>) -> Self {
        TidalError::QueryFailure {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TidalError::Unauthorized)
    }
}

impl From<reqwest::Error> for TidalError {
    fn from(err: reqwest::Error) -> Self {
        TidalError::query_with(err.to_string(), err)
    }
}

impl From<serde_json::Error> for TidalError {
    fn from(err: serde_json::Error) -> Self {
        TidalError::query_with(format!("failed to decode response: {err}"), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn query_failure_keeps_its_cause() {
        let cause = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = TidalError::from(cause);

        assert!(matches!(err, TidalError::QueryFailure { .. }));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("query failed: failed to decode response"));
    }

    #[test]
    fn plain_query_failure_has_no_cause() {
        let err = TidalError::query("trackIds is empty");
        assert_eq!(err.to_string(), "query failed: trackIds is empty");
        assert!(err.source().is_none());
    }
}
