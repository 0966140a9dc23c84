//! Content API endpoint.
//!
//! Resolves a route plus optional `?variant=` to the document body and its
//! navigation context.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kb_index::{ContentResolver, IndexError, NavigationIndex, Node, Variant};
use md5::{Digest, Md5};
use serde::Deserialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Query parameters for GET /api/content/{path}.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ContentQuery {
    variant: Option<String>,
}

/// Handle GET /api/content/{path}.
pub(crate) async fn get_content(
    Path(path): Path<String>,
    Query(query): Query<ContentQuery>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let variant = query
        .variant
        .as_deref()
        .map(str::parse::<Variant>)
        .transpose()?;
    // One snapshot serves both the resolution and any child listing.
    let index = state.kb.index()?;
    let resolved = ContentResolver::new(&index, state.kb.source().as_ref())
        .resolve(&[path.as_str()], variant)
        .map_err(|err| with_children(&index, err))?;

    let etag = compute_etag(&state.version, resolved.generation, &resolved.content);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    Ok((
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "no-cache".to_owned()),
        ],
        Json(resolved),
    )
        .into_response())
}

/// Convert an index error, listing child routes when a category was requested.
fn with_children(index: &NavigationIndex, err: IndexError) -> ServerError {
    let mut err = ServerError::from(err);
    if let ServerError::NotATopic { path, children } = &mut err
        && let Some(idx) = index.lookup(path)
    {
        *children = index.children(idx).into_iter().map(Node::route).collect();
    }
    err
}

/// Compute `ETag` from version, index generation and content.
///
/// MD5 truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, generation: u64, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{generation}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
