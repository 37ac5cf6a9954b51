use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use super::render;
use crate::classifier::ClassifierError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("The upload did not include an image field")]
    MissingImage,
    #[error("Could not read the uploaded image: {0}")]
    Upload(String),
    #[error("Could not decode the image: {0}")]
    UndecodableImage(String),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingImage | AppError::Upload(_) => StatusCode::BAD_REQUEST,
            AppError::UndecodableImage(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Classifier(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }
        let body = render::page(&render::error_banner(&self.to_string()));
        (status, Html(body)).into_response()
    }
}
