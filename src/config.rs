use std::{env, net::SocketAddr, path::PathBuf};

use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub data_root: PathBuf,
    pub geocoder_url: Url,
    pub preview_debounce_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let data_root = env::var("DATA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let geocoder_url: Url = env::var("GEOCODER_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid GEOCODER_URL: {err}")))?;

        let preview_debounce_ms = match env::var("PREVIEW_DEBOUNCE_MS") {
            Ok(raw) => raw
                .parse()
                .map_err(|err| AppError::Config(format!("invalid PREVIEW_DEBOUNCE_MS: {err}")))?,
            Err(_) => 400,
        };

        Ok(Self {
            listen_addr,
            data_root,
            geocoder_url,
            preview_debounce_ms,
        })
    }
}
