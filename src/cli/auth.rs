use chrono::Local;

use crate::{Res, config, info, success, tidal::TidalApi};

/// Requests a token with the configured client credentials and reports its lifetime.
pub async fn auth() -> Res<()> {
    info!("Requesting access token...");
    let api = authorized_api().await?;

    let credentials = api
        .credentials()
        .ok_or("Authorization returned no credentials.")?;
    success!(
        "Authorization successful! Token valid for {}s (until {}).",
        credentials.expires_in_seconds(),
        credentials
            .expires_at()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}

/// Builds a client from the environment and authorizes it.
pub(crate) async fn authorized_api() -> Res<TidalApi> {
    let (Some(client_id), Some(client_secret)) =
        (config::tidal_client_id(), config::tidal_client_secret())
    else {
        return Err(format!(
            "TIDAL_CLIENT_ID and TIDAL_CLIENT_SECRET must be set (see {}).",
            config::env_path().display()
        )
        .into());
    };

    let api = TidalApi::with_config(config::TidalConfig::from_env());
    api.authorize(&client_id, &client_secret)
        .await
        .map_err(|e| format!("Authorization failed. Err: {e}"))?;
    Ok(api)
}
