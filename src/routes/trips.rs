use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Form, Router,
};
use chrono::{DateTime, Local, Utc};
use serde::Deserialize;

use crate::{error::AppError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/trips", post(trip_create))
        .route("/trips/:id/favorite", post(trip_favorite))
        .route("/trips/:id/delete", post(trip_delete))
}

#[derive(Clone)]
struct TripRow {
    id: i64,
    name: String,
    notes: String,
    is_favorite: bool,
    created: String,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    trips: Vec<TripRow>,
}

async fn index(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = state
        .trips
        .trips()
        .await
        .into_iter()
        .map(|trip| TripRow {
            id: trip.id,
            name: trip.name,
            notes: trip.notes,
            is_favorite: trip.is_favorite,
            created: format_timestamp(trip.created_at),
        })
        .collect();
    Ok(AskamaTemplateResponse::into_response(IndexTemplate {
        trips: rows,
    }))
}

#[derive(Deserialize)]
struct TripForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    start: String,
    #[serde(default)]
    end: String,
    #[serde(default)]
    notes: String,
}

async fn trip_create(
    State(state): State<AppState>,
    Form(form): Form<TripForm>,
) -> Result<Redirect, AppError> {
    // A submission missing either endpoint is dropped without feedback;
    // the form has always behaved that way.
    state
        .trips
        .create(&form.name, &form.start, &form.end, &form.notes)
        .await?;
    Ok(Redirect::to("/"))
}

async fn trip_favorite(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    state.trips.toggle_favorite(id).await?;
    Ok(Redirect::to("/"))
}

async fn trip_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    state.trips.delete(id).await?;
    Ok(Redirect::to("/"))
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%b %e, %Y").to_string()
}
