use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;

use crate::{models::location::PreviewState, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/preview", post(preview_input))
        .route("/preview/state", get(preview_state))
}

#[derive(Deserialize)]
struct PreviewForm {
    #[serde(default)]
    start: String,
    #[serde(default)]
    end: String,
}

/// The page forwards every keystroke here; debouncing happens in the
/// preview service, not the client.
async fn preview_input(State(state): State<AppState>, Form(form): Form<PreviewForm>) -> StatusCode {
    state.preview.update(&form.start, &form.end);
    StatusCode::NO_CONTENT
}

async fn preview_state(State(state): State<AppState>) -> Json<PreviewState> {
    Json(state.preview.state())
}
