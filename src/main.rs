use std::{sync::Arc, time::Duration};

use roadtrip::config::AppConfig;
use roadtrip::error::AppError;
use roadtrip::routes::create_router;
use roadtrip::services::{
    geocode::NominatimGeocoder,
    preview::PreviewService,
    store::{FileStore, SeedStore, TripStore},
    trips::TripService,
};
use roadtrip::state::AppState;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;

    // Capability check, once at startup: without a writable data root the
    // app still runs, serving the seed list from memory.
    let store: Arc<dyn TripStore> = match std::fs::create_dir_all(&config.data_root) {
        Ok(()) => Arc::new(FileStore::new(config.data_root.clone())),
        Err(err) => {
            warn!("data root unavailable ({err}); trips will not persist");
            Arc::new(SeedStore)
        }
    };
    let trips = TripService::load(store).await?;

    let geocoder = Arc::new(NominatimGeocoder::new(config.geocoder_url.clone())?);
    let preview = PreviewService::spawn(
        geocoder,
        Duration::from_millis(config.preview_debounce_ms),
    );

    let state = AppState::new(config.clone(), trips, preview);
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,roadtrip=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
