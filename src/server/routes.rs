use axum::extract::{Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use super::error::AppError;
use super::render;
use super::AppState;
use crate::classifier::preprocess;
use crate::ranking;

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    /// Label whose content panel should be shown; defaults to the prediction
    pub label: Option<String>,
}

/// The single page. With no submission yet it shows the input area and a
/// hint; afterwards it recomputes the prediction for the stored image and
/// renders the full results layout.
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<Html<String>, AppError> {
    let bytes = {
        let session = state.session.lock().await;
        session.image().map(|b| b.to_vec())
    };

    let body = match bytes {
        None => format!("{}{}", render::input_form(), render::landing_hint()),
        Some(bytes) => {
            let results = results_body(&state, &bytes, params.label.as_deref())?;
            format!("{}{}", render::input_form(), results)
        }
    };

    Ok(Html(render::page(&body)))
}

fn results_body(
    state: &AppState,
    bytes: &[u8],
    requested_label: Option<&str>,
) -> Result<String, AppError> {
    let image = preprocess::decode_image(bytes)
        .map_err(|e| AppError::UndecodableImage(e.to_string()))?;
    let prediction = state.classifier.predict_image(&image)?;

    let labels = state.classifier.labels();
    let ranked = ranking::rank(labels, &prediction.probabilities);

    // An unknown ?label falls back to the prediction rather than erroring
    let selected = requested_label
        .filter(|requested| labels.iter().any(|known| known == requested))
        .unwrap_or(&prediction.label);
    let selection = state.registry.lookup(selected);

    Ok(render::results_section(
        &prediction.label,
        &ranked,
        labels,
        selected,
        &selection,
    ))
}

/// Accepts a multipart upload with an `image` field, runs inference once to
/// validate the submission, stores it in the session, and redirects back to
/// the page.
pub async fn classify(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut image_bytes: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?
    {
        if field.name() == Some("image") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Upload(e.to_string()))?;
            image_bytes = Some(bytes.to_vec());
        }
    }
    let bytes = image_bytes.ok_or(AppError::MissingImage)?;

    // Undecodable uploads are rejected here with a readable message instead
    // of being stored and failing on every page load
    let image = preprocess::decode_image(&bytes)
        .map_err(|e| AppError::UndecodableImage(e.to_string()))?;
    let prediction = state.classifier.predict_image(&image)?;
    log::info!(
        "Predicted '{}' for a {} byte submission",
        prediction.label,
        bytes.len()
    );

    state
        .session
        .lock()
        .await
        .record_submission(bytes, prediction.label);

    Ok(Redirect::to("/"))
}

/// Serves the stored submission so the page can show a preview.
pub async fn preview(State(state): State<AppState>) -> Response {
    let session = state.session.lock().await;
    match session.image() {
        Some(bytes) => {
            let mime = image::guess_format(bytes)
                .map(|format| format.to_mime_type())
                .unwrap_or("application/octet-stream");
            ([(header::CONTENT_TYPE, mime)], bytes.to_vec()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn health() -> &'static str {
    "ok"
}
