//! Paste HTTP handlers.

use crate::client::client_key;
use crate::error::{HttpError, RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER};
use crate::render::{render_page, PageKind};
use crate::{AppError, AppState};
use axum::{
    body::Bytes,
    extract::{ConnectInfo, Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
};
use std::net::SocketAddr;

const LANDING_TITLE: &str = "Quick pasting service";

/// Render the empty landing page.
pub async fn index() -> Html<String> {
    Html(render_page(PageKind::Landing, LANDING_TITLE, b""))
}

/// Store the raw request body as a paste.
///
/// # Returns
/// `text/plain` body with the paste path (`/<id>`), plus rate-limit headers.
///
/// # Errors
/// Returns an error for empty or oversized bodies, exhausted admission
/// budgets, and store faults.
pub async fn submit_paste(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, HttpError> {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let client = client_key(&headers, peer, state.config.trust_proxy);

    // The dedup scan reads the whole store, so keep it off the async workers.
    let service = state.service.clone();
    let result = tokio::task::spawn_blocking(move || service.submit_admitted(&client, &body))
        .await
        .map_err(|err| AppError::StorageMessage(format!("Submit task failed: {}", err)))?;

    let limit = state.service.admission().max_requests();
    let (id, remaining) = match result {
        Ok(admitted) => admitted,
        Err(err @ AppError::RateLimited { .. }) => {
            let mut response = HttpError(err).into_response();
            response
                .headers_mut()
                .insert(RATE_LIMIT_LIMIT_HEADER, HeaderValue::from(limit));
            return Ok(response);
        }
        Err(err) => return Err(err.into()),
    };

    let mut response = (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("/{}", id),
    )
        .into_response();
    if limit > 0 {
        let headers = response.headers_mut();
        headers.insert(RATE_LIMIT_LIMIT_HEADER, HeaderValue::from(limit));
        headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from(remaining));
    }
    Ok(response)
}

/// Render a stored paste as an HTML page.
///
/// Unknown identifiers redirect to the landing page.
///
/// # Errors
/// Returns an error only for store faults.
pub async fn view_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, HttpError> {
    // Single-key point read; cheap enough to stay on the async worker.
    match state.service.fetch(&id) {
        Ok(content) => Ok(Html(render_page(PageKind::Paste, &id, &content)).into_response()),
        Err(AppError::NotFound) => Ok(Redirect::to("/").into_response()),
        Err(err) => Err(err.into()),
    }
}

/// Return a stored paste as raw text.
///
/// # Errors
/// Returns `404` for unknown identifiers and `500` for store faults.
pub async fn raw_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, HttpError> {
    // Point read, like `view_paste`.
    let content = state.service.fetch(&id)?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        content,
    )
        .into_response())
}
