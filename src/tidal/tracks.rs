use std::sync::Arc;

use reqwest::Client;

use crate::{
    error::TidalError,
    management::CredentialStore,
    tidal::{
        list_query::{ListQuery, ListQueryResult, ListQueryStatus},
        query::{ContentType, Query},
    },
    types::{ResourceListResponse, Track, TrackListResponse, TrackResponse},
    utils,
};

const DATA_FIELD: &str = "data";
const COUNTRY_CODE_PARAM: &str = "countryCode";

/// Optional paging for list operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl Pagination {
    pub fn new(offset: Option<u32>, limit: Option<u32>) -> Self {
        Pagination { offset, limit }
    }

    fn apply(self, mut query: ListQuery) -> ListQuery {
        if let Some(offset) = self.offset {
            query = query.offset(offset);
        }
        if let Some(limit) = self.limit {
            query = query.limit(limit);
        }
        query
    }
}

/// Track lookups: by id, by a set of ids, by artist, by ISRC and by similarity.
///
/// Every call checks its arguments before building a request and uses the
/// credentials currently held by the owning client.
#[derive(Debug, Clone)]
pub struct TracksEndpoint {
    client: Client,
    api_url: String,
    store: Arc<CredentialStore>,
}

impl TracksEndpoint {
    pub fn new(client: &Client, api_url: impl Into<String>, store: Arc<CredentialStore>) -> Self {
        TracksEndpoint {
            client: client.clone(),
            api_url: api_url.into(),
            store,
        }
    }

    /// `GET /tracks/{id}`
    pub async fn get(&self, track_id: &str, country_code: &str) -> Result<Track, TidalError> {
        require("trackId", track_id)?;
        require("countryCode", country_code)?;

        let credentials = self.store.get();
        let response: TrackResponse =
            Query::new(&self.client, format!("{}/tracks/{}", self.api_url, track_id.trim()))
                .content_type(ContentType::TidalJson)
                .auth(credentials.as_deref())?
                .parameter(COUNTRY_CODE_PARAM, country_code.trim())
                .execute()
                .await?;

        Ok(Track::from(response))
    }

    /// `GET /tracks?ids=a,b,c`
    pub async fn list<S: AsRef<str>>(
        &self,
        track_ids: &[S],
        country_code: &str,
        page: Pagination,
    ) -> Result<ListQueryResult<Track>, TidalError> {
        let ids = utils::join_ids(track_ids);
        if ids.is_empty() {
            return Err(TidalError::query("trackIds is empty"));
        }
        require("countryCode", country_code)?;

        let query = self
            .list_query(format!("{}/tracks", self.api_url), country_code, page)?
            .parameter("ids", ids);
        Ok(query
            .execute::<TrackListResponse>(DATA_FIELD)
            .await?
            .map(Track::from))
    }

    /// `GET /artists/{id}/tracks`
    pub async fn list_by_artist(
        &self,
        artist_id: &str,
        country_code: &str,
        page: Pagination,
    ) -> Result<ListQueryResult<Track>, TidalError> {
        require("artistId", artist_id)?;
        require("countryCode", country_code)?;

        let url = format!("{}/artists/{}/tracks", self.api_url, artist_id.trim());
        let query = self.list_query(url, country_code, page)?;
        Ok(query
            .execute::<TrackListResponse>(DATA_FIELD)
            .await?
            .map(Track::from))
    }

    /// `GET /tracks/byIsrc?isrc=...`
    pub async fn list_by_isrc(
        &self,
        isrc: &str,
        country_code: &str,
        page: Pagination,
    ) -> Result<ListQueryResult<Track>, TidalError> {
        require("isrc", isrc)?;
        require("countryCode", country_code)?;

        let query = self
            .list_query(format!("{}/tracks/byIsrc", self.api_url), country_code, page)?
            .parameter("isrc", isrc.trim());
        Ok(query
            .execute::<TrackListResponse>(DATA_FIELD)
            .await?
            .map(Track::from))
    }

    /// `GET /tracks/{id}/similar`, ids only.
    pub async fn list_similar_ids(
        &self,
        track_id: &str,
        country_code: &str,
        page: Pagination,
    ) -> Result<ListQueryResult<String>, TidalError> {
        require("trackId", track_id)?;
        require("countryCode", country_code)?;

        let url = format!("{}/tracks/{}/similar", self.api_url, track_id.trim());
        let query = self.list_query(url, country_code, page)?;
        Ok(query
            .execute::<ResourceListResponse>(DATA_FIELD)
            .await?
            .map(|similar| similar.resource.id))
    }

    /// Similar tracks resolved to full entities.
    ///
    /// Paging applies to the similarity lookup and is echoed from it. A
    /// failed lookup is returned as is; a failed resolution keeps its own
    /// status and message.
    pub async fn list_similar(
        &self,
        track_id: &str,
        country_code: &str,
        page: Pagination,
    ) -> Result<ListQueryResult<Track>, TidalError> {
        let similar = self.list_similar_ids(track_id, country_code, page).await?;
        if !similar.is_success() || similar.items().is_empty() {
            return Ok(similar.with_items(Vec::new()));
        }

        let tracks = self
            .list(similar.items(), country_code, Pagination::default())
            .await?;

        let status = tracks.status();
        let message = tracks.message().map(str::to_string);
        Ok(ListQueryResult::new(
            status,
            message,
            if status == ListQueryStatus::Success {
                tracks.into_items()
            } else {
                Vec::new()
            },
            similar.offset(),
            similar.limit(),
        ))
    }

    fn list_query(
        &self,
        url: String,
        country_code: &str,
        page: Pagination,
    ) -> Result<ListQuery, TidalError> {
        let credentials = self.store.get();
        let query = ListQuery::new(&self.client, url)
            .content_type(ContentType::TidalJson)
            .auth(credentials.as_deref())?
            .parameter(COUNTRY_CODE_PARAM, country_code.trim());
        Ok(page.apply(query))
    }
}

fn require(field: &str, value: &str) -> Result<(), TidalError> {
    if value.trim().is_empty() {
        return Err(TidalError::query(format!("{field} is empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::management::Credentials;

    fn endpoint(store: Arc<CredentialStore>) -> TracksEndpoint {
        TracksEndpoint::new(&Client::new(), "http://127.0.0.1:9", store)
    }

    fn authorized() -> TracksEndpoint {
        let store = Arc::new(CredentialStore::new());
        store.set(Arc::new(Credentials::new("token", 3600)));
        endpoint(store)
    }

    #[tokio::test]
    async fn empty_track_ids_fail_fast() {
        let ids: [&str; 0] = [];
        let err = authorized()
            .list(&ids, "US", Pagination::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "query failed: trackIds is empty");
    }

    #[tokio::test]
    async fn blank_track_ids_count_as_empty() {
        let err = authorized()
            .list(&["", "  "], "US", Pagination::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("trackIds is empty"));
    }

    #[tokio::test]
    async fn get_requires_track_id_and_country() {
        let tracks = authorized();
        let err = tracks.get("", "US").await.unwrap_err();
        assert!(err.to_string().contains("trackId is empty"));

        let err = tracks.get("123", "").await.unwrap_err();
        assert!(err.to_string().contains("countryCode is empty"));
    }

    #[tokio::test]
    async fn lookups_validate_their_filters() {
        let tracks = authorized();
        let page = Pagination::default();

        let err = tracks.list_by_isrc("", "US", page).await.unwrap_err();
        assert!(err.to_string().contains("isrc is empty"));

        let err = tracks.list_by_artist(" ", "US", page).await.unwrap_err();
        assert!(err.to_string().contains("artistId is empty"));

        let err = tracks.list_similar("", "US", page).await.unwrap_err();
        assert!(err.to_string().contains("trackId is empty"));

        let err = tracks.list(&["1"], "", page).await.unwrap_err();
        assert!(err.to_string().contains("countryCode is empty"));
    }

    #[tokio::test]
    async fn unauthorized_without_credentials() {
        let tracks = endpoint(Arc::new(CredentialStore::new()));

        assert!(tracks.get("1", "US").await.unwrap_err().is_unauthorized());
        assert!(
            tracks
                .list(&["1"], "US", Pagination::default())
                .await
                .unwrap_err()
                .is_unauthorized()
        );
    }

    #[test]
    fn pagination_only_sets_given_values() {
        let query = ListQuery::new(&Client::new(), "https://example.com/tracks");
        let url = Pagination::new(None, Some(20)).apply(query).target_url();
        assert_eq!(url, "https://example.com/tracks?limit=20");
    }
}
