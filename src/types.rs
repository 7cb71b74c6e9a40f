use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::tidal::ListEnvelope;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlbumResource {
    pub id: String,
    pub title: String,
    pub image_cover: Vec<Image>,
    pub video_cover: Vec<Image>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistResource {
    pub id: String,
    pub name: String,
    pub picture: Vec<Image>,
    pub main: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackResource {
    pub artifact_type: Option<String>,
    pub id: String,
    pub title: String,
    pub artists: Vec<ArtistResource>,
    pub album: AlbumResource,
    pub duration: u32,
    pub track_number: u32,
    pub volume_number: u32,
    pub isrc: Option<String>,
    pub copyright: Option<String>,
    pub tidal_url: Option<String>,
}

/// `{ "resource": { ... } }` wrapper around a single track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackResponse {
    pub resource: TrackResource,
}

/// `{ "data": [ { "resource": { ... } } ] }` list of tracks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackListResponse {
    #[serde(default)]
    pub data: Vec<TrackResponse>,
}

impl ListEnvelope for TrackListResponse {
    type Item = TrackResponse;

    fn into_data(self) -> Vec<TrackResponse> {
        self.data
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceId {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceResponse {
    pub resource: ResourceId,
}

/// List envelope whose items only carry ids, as returned for similar tracks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceListResponse {
    #[serde(default)]
    pub data: Vec<ResourceResponse>,
}

impl ListEnvelope for ResourceListResponse {
    type Item = ResourceResponse;

    fn into_data(self) -> Vec<ResourceResponse> {
        self.data
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleAlbum {
    pub id: String,
    pub title: String,
    pub image_covers: Vec<Image>,
    pub video_covers: Vec<Image>,
}

impl From<AlbumResource> for SimpleAlbum {
    fn from(album: AlbumResource) -> Self {
        SimpleAlbum {
            id: album.id,
            title: album.title,
            image_covers: album.image_cover,
            video_covers: album.video_cover,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleArtist {
    pub id: String,
    pub name: String,
    pub pictures: Vec<Image>,
    pub is_main_artist: bool,
}

impl From<ArtistResource> for SimpleArtist {
    fn from(artist: ArtistResource) -> Self {
        SimpleArtist {
            id: artist.id,
            name: artist.name,
            pictures: artist.picture,
            is_main_artist: artist.main,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub duration_seconds: u32,
    pub track_number: u32,
    pub volume_number: u32,
    pub isrc: Option<String>,
    pub copyright: Option<String>,
    pub tidal_url: Option<String>,
    pub album: SimpleAlbum,
    pub artists: Vec<SimpleArtist>,
}

impl Track {
    /// Main artists first, joined for display.
    pub fn artist_names(&self) -> String {
        let mut artists: Vec<&SimpleArtist> = self.artists.iter().collect();
        artists.sort_by_key(|a| !a.is_main_artist);
        artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<TrackResponse> for Track {
    fn from(response: TrackResponse) -> Self {
        let resource = response.resource;
        Track {
            id: resource.id,
            title: resource.title,
            duration_seconds: resource.duration,
            track_number: resource.track_number,
            volume_number: resource.volume_number,
            isrc: resource.isrc,
            copyright: resource.copyright,
            tidal_url: resource.tidal_url,
            album: SimpleAlbum::from(resource.album),
            artists: resource.artists.into_iter().map(SimpleArtist::from).collect(),
        }
    }
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub id: String,
    pub title: String,
    pub artists: String,
    pub album: String,
    pub duration: String,
}
