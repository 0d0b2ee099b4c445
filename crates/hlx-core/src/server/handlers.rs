//! Request handlers for the upload server.

use axum::{
    body::{Body, Bytes},
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::render::{render_page, PageState};
use super::ServerState;
use crate::artifact::{ArtifactId, ARTIFACT_NAME};
use crate::extract::extract_from_capture;

/// Multipart form field carrying the capture file.
pub const UPLOAD_FIELD: &str = "harFile";

/// Download path for a request's artifact.
pub fn download_path(id: ArtifactId) -> String {
    format!("/downloads/{}/{}", id, ARTIFACT_NAME)
}

fn page(status: StatusCode, state: PageState<'_>) -> Response {
    (status, Html(render_page(&state))).into_response()
}

fn failed(status: StatusCode, reason: &str) -> Response {
    page(status, PageState::Failed { reason })
}

/// GET /
pub async fn index() -> Html<String> {
    Html(render_page(&PageState::Idle))
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// POST /upload
///
/// Stashes the capture in a fresh request directory, extracts links, and
/// persists the artifact. A capture without an entries list renders the
/// failure state with 422 and leaves nothing behind on disk.
pub async fn upload(
    State(state): State<Arc<ServerState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!("upload is not a multipart form: {}", rejection.body_text());
            return failed(
                rejection.status(),
                "the upload must be a multipart form with a harFile field",
            );
        }
    };
    let (file_name, bytes) = match read_capture_field(&mut multipart).await {
        Ok(Some(field)) => field,
        Ok(None) => {
            return failed(
                StatusCode::BAD_REQUEST,
                "no capture file was uploaded (expected form field harFile)",
            )
        }
        Err(e) => {
            warn!("unreadable upload: {}", e.body_text());
            return failed(e.status(), "the upload could not be read");
        }
    };
    info!(
        "upload received: {} ({} bytes)",
        file_name.as_deref().unwrap_or("<unnamed>"),
        bytes.len()
    );

    let slot = match state.store.begin_upload().await {
        Ok(slot) => slot,
        Err(e) => {
            error!("failed to allocate request dir: {:#}", e);
            return failed(StatusCode::INTERNAL_SERVER_ERROR, "no working storage available");
        }
    };
    if let Err(e) = slot.stash_upload(&bytes).await {
        error!("failed to stash upload {}: {:#}", slot.id(), e);
        if let Err(e) = slot.abandon().await {
            warn!("cleanup after failed stash: {:#}", e);
        }
        return failed(StatusCode::INTERNAL_SERVER_ERROR, "no working storage available");
    }

    let extraction = extract_from_capture(&bytes, &state.rule);
    if let Err(e) = slot.discard_upload().await {
        warn!("failed to discard upload {}: {:#}", slot.id(), e);
    }

    let extraction = match extraction {
        Ok(extraction) => extraction,
        Err(e) => {
            warn!("rejected upload {}: {}", slot.id(), e);
            if let Err(e) = slot.abandon().await {
                warn!("cleanup after rejected upload: {:#}", e);
            }
            return failed(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string());
        }
    };

    if let Err(e) = slot.persist(&extraction.result).await {
        error!("failed to persist artifact {}: {:#}", slot.id(), e);
        if let Err(e) = slot.abandon().await {
            warn!("cleanup after failed persist: {:#}", e);
        }
        return failed(StatusCode::INTERNAL_SERVER_ERROR, "the link list could not be saved");
    }

    let download_link = download_path(slot.id());
    info!(
        "upload {}: {} links from {} entries",
        slot.id(),
        extraction.result.count(),
        extraction.total_entries
    );
    page(
        StatusCode::OK,
        PageState::Extracted {
            links: extraction.result.urls(),
            download_link: &download_link,
            skipped_entries: extraction.skipped_entries,
        },
    )
}

/// First file under [`UPLOAD_FIELD`]; other fields are ignored.
async fn read_capture_field(
    multipart: &mut Multipart,
) -> Result<Option<(Option<String>, Bytes)>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            let file_name = field.file_name().map(str::to_owned);
            let data = field.bytes().await?;
            return Ok(Some((file_name, data)));
        }
    }
    Ok(None)
}

/// GET /downloads/:id/filtered_urls.txt
///
/// Streams the artifact to one client. The request directory is removed once
/// the whole file has been sent; an interrupted transfer leaves it in place
/// for another attempt.
pub async fn download(State(state): State<Arc<ServerState>>, Path(id): Path<String>) -> Response {
    let Ok(id) = id.parse::<ArtifactId>() else {
        return (StatusCode::BAD_REQUEST, "invalid download token").into_response();
    };

    match state.store.claim(id).await {
        Ok(Some(artifact)) => {
            let headers = [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"filtered_urls.txt\"",
                ),
            ];
            (StatusCode::OK, headers, Body::from_stream(artifact)).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "download not found or already taken").into_response(),
        Err(e) => {
            error!("failed to serve artifact {}: {:#}", id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "download failed").into_response()
        }
    }
}
