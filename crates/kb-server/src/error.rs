//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kb_index::{IndexError, Variant};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// No node at the route.
    #[error("Not found: /{0}")]
    NotFound(String),

    /// Route addresses a category.
    #[error("Not a topic: /{path}")]
    NotATopic {
        /// Route of the category.
        path: String,
        /// Routes of the category's children.
        children: Vec<String>,
    },

    /// Topic lacks the requested variant.
    #[error("Variant {requested} is unavailable for /{path}")]
    VariantUnavailable {
        path: String,
        requested: Variant,
        fallback: Variant,
    },

    /// Unparseable `variant` query parameter.
    #[error("Unknown variant: {0:?}")]
    UnknownVariant(String),

    /// Index build or document read failure.
    #[error("{0}")]
    Index(IndexError),
}

impl From<IndexError> for ServerError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::NotFound(path) => Self::NotFound(path),
            IndexError::NotATopic(path) => Self::NotATopic {
                path,
                children: Vec::new(),
            },
            IndexError::VariantUnavailable {
                path,
                requested,
                fallback,
            } => Self::VariantUnavailable {
                path,
                requested,
                fallback,
            },
            IndexError::UnknownVariant(name) => Self::UnknownVariant(name),
            other => Self::Index(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::NotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Not found", "path": path}),
            ),
            Self::NotATopic { path, children } => (
                StatusCode::CONFLICT,
                json!({"error": "Not a topic", "path": path, "children": children}),
            ),
            Self::VariantUnavailable {
                path,
                requested,
                fallback,
            } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "Variant unavailable",
                    "path": path,
                    "requested": requested,
                    "fallback": fallback,
                }),
            ),
            Self::UnknownVariant(name) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Unknown variant", "variant": name}),
            ),
            Self::Index(e) => {
                tracing::error!(error = %e, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": e.to_string()}),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_from_index_error_maps_resolution_errors() {
        let err = ServerError::from(IndexError::NotATopic("go".to_owned()));

        assert!(matches!(err, ServerError::NotATopic { ref path, ref children } if path == "go" && children.is_empty()));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ServerError::NotFound("x".to_owned()), StatusCode::NOT_FOUND),
            (
                ServerError::NotATopic {
                    path: "go".to_owned(),
                    children: vec!["go/maps".to_owned()],
                },
                StatusCode::CONFLICT,
            ),
            (
                ServerError::VariantUnavailable {
                    path: "go/maps".to_owned(),
                    requested: Variant::QuestionsAndAnswers,
                    fallback: Variant::QuestionsOnly,
                },
                StatusCode::NOT_FOUND,
            ),
            (
                ServerError::UnknownVariant("solutions".to_owned()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServerError::Index(IndexError::NotFound("x".to_owned())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
