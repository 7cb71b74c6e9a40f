use crate::{config, info, tidal::TidalApi, warning};

/// Prints version and the endpoints the client would talk to.
pub fn info() {
    let cfg = config::TidalConfig::from_env();

    info!("tidalcli {}", TidalApi::version());
    info!("API url:       {}", cfg.api_url);
    info!("Auth url:      {}", cfg.auth_url);
    info!("Country code:  {}", config::tidal_country_code());
    info!("Env file:      {}", config::env_path().display());

    if config::tidal_client_id().is_none() || config::tidal_client_secret().is_none() {
        warning!("Client credentials are not configured.");
    }
}
