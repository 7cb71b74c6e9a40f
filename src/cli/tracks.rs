use tabled::Table;

use crate::{
    cli::auth::authorized_api,
    Res, config, info,
    tidal::{ListQueryResult, Pagination},
    types::Track,
    utils, warning,
};

/// Which list lookup `tidalcli tracks` runs.
#[derive(Debug, Clone)]
pub enum TrackFilter {
    Ids(Vec<String>),
    Artist(String),
    Isrc(String),
    Similar(String),
}

pub async fn track(track_id: String, country: Option<String>) -> Res<()> {
    let api = authorized_api().await?;
    let country = country.unwrap_or_else(config::tidal_country_code);

    let pb = utils::spinner("Fetching track...");
    let result = api.tracks.get(&track_id, &country).await;
    pb.finish_and_clear();

    let track = result.map_err(|e| format!("Failed to fetch track {track_id}. Err: {e}"))?;

    println!("{}", Table::new(utils::track_table_rows(std::slice::from_ref(&track))));
    if let Some(isrc) = &track.isrc {
        info!("ISRC: {}", isrc);
    }
    if let Some(url) = &track.tidal_url {
        info!("Listen: {}", url);
    }
    Ok(())
}

pub async fn tracks(filter: TrackFilter, country: Option<String>, page: Pagination) -> Res<()> {
    let api = authorized_api().await?;
    let country = country.unwrap_or_else(config::tidal_country_code);

    let pb = utils::spinner("Fetching tracks...");
    let result = match &filter {
        TrackFilter::Ids(ids) => api.tracks.list(ids.as_slice(), &country, page).await,
        TrackFilter::Artist(artist_id) => api.tracks.list_by_artist(artist_id, &country, page).await,
        TrackFilter::Isrc(isrc) => api.tracks.list_by_isrc(isrc, &country, page).await,
        TrackFilter::Similar(track_id) => api.tracks.list_similar(track_id, &country, page).await,
    };
    pb.finish_and_clear();

    let result = result.map_err(|e| format!("Cannot look up tracks. Err: {e}"))?;
    if result.is_success() {
        print_page(result);
    } else {
        warning!(
            "Track lookup failed: {}",
            result.message().unwrap_or("unknown error")
        );
    }
    Ok(())
}

fn print_page(result: ListQueryResult<Track>) {
    if result.items().is_empty() {
        warning!("No tracks found.");
        return;
    }

    let offset = result.offset();
    let limit = result.limit();
    let count = result.items().len();

    println!("{}", Table::new(utils::track_table_rows(result.items())));

    match (offset, limit) {
        (None, None) => info!("{} tracks", count),
        (offset, limit) => info!(
            "{} tracks (offset {}, limit {})",
            count,
            offset.map_or("-".to_string(), |o| o.to_string()),
            limit.map_or("-".to_string(), |l| l.to_string())
        ),
    }
}
