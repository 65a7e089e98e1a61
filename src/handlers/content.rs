// src/handlers/content.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::content::{
        BatchPreviewRequest, ContentRequest, ExcerptRequest, NormalizeResponse,
        PlainTextResponse, PreviewRequest, RenderResponse, resolve_max_words,
    },
    pipeline::{self, StructuredPreview},
};

/// Repairs encoding and quoting artifacts without touching markup.
pub async fn normalize(
    payload: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let html = pipeline::normalize(payload.content.as_deref());

    Ok(Json(NormalizeResponse { html }))
}

/// Produces HTML that is safe to inject as the full body of a page.
pub async fn render(
    payload: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let html = pipeline::render_html(payload.content.as_deref());
    if html.is_empty() {
        tracing::debug!("Rendered content is empty");
    }

    Ok(Json(RenderResponse {
        is_empty: html.is_empty(),
        html,
    }))
}

/// Flattens a content field into newline-structured plain text.
pub async fn plain_text(
    payload: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let text = pipeline::plain_text(payload.content.as_deref());

    Ok(Json(PlainTextResponse { text }))
}

/// Single-line, word-bounded excerpt (cards, meta descriptions).
pub async fn excerpt(
    State(config): State<Config>,
    payload: Result<Json<ExcerptRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let max_words = resolve_max_words(payload.max_words, payload.kind, config.preview_max_words);
    let result = pipeline::excerpt(payload.content.as_deref(), max_words);

    Ok(Json(result))
}

/// Paragraph-preserving preview with a "Continue to Read" flag.
pub async fn preview(
    State(config): State<Config>,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    Ok(Json(build(&payload, &config)))
}

/// Previews for a whole listing page in one round trip.
/// Results keep the order of `items`.
pub async fn batch_preview(
    State(config): State<Config>,
    payload: Result<Json<BatchPreviewRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    tracing::debug!("Building {} previews", payload.items.len());

    let previews: Vec<StructuredPreview> = payload
        .items
        .iter()
        .map(|item| build(item, &config))
        .collect();

    Ok(Json(previews))
}

fn build(request: &PreviewRequest, config: &Config) -> StructuredPreview {
    let options = request.options(config.preview_max_words);
    pipeline::build_preview_with(request.content.as_deref(), &options)
}
