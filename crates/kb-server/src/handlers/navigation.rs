//! Navigation API endpoint.
//!
//! Returns the full navigation tree of the current index generation.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use kb_index::NavigationNode;
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Response for GET /api/navigation.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    /// Root category.
    root: NavigationNode,
    /// Generation the tree belongs to.
    generation: u64,
}

/// Handle GET /api/navigation.
pub(crate) async fn get_navigation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NavigationResponse>, ServerError> {
    let index = state.kb.index()?;

    Ok(Json(NavigationResponse {
        root: NavigationNode::clone(index.root()),
        generation: index.generation(),
    }))
}

#[cfg(test)]
mod tests {
    use kb_index::NodeKind;

    use super::*;

    #[test]
    fn test_navigation_response_serialization() {
        let response = NavigationResponse {
            root: NavigationNode {
                slug: String::new(),
                title: "Home".to_owned(),
                order: u64::MAX,
                kind: NodeKind::Category,
                path: Vec::new(),
                variants: kb_index::Variants::new(),
                children: Vec::new(),
            },
            generation: 3,
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["root"]["title"], "Home");
        assert_eq!(json["root"]["kind"], "category");
        assert_eq!(json["generation"], 3);
    }
}
