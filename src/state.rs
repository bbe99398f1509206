use crate::{
    config::AppConfig,
    services::{preview::PreviewService, trips::TripService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub trips: TripService,
    pub preview: PreviewService,
}

impl AppState {
    pub fn new(config: AppConfig, trips: TripService, preview: PreviewService) -> Self {
        Self {
            config,
            trips,
            preview,
        }
    }
}
