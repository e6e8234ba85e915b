//! Navigation API endpoint.
//!
//! Returns the documentation catalog in sidebar order.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tb_viewer::NavItem;

use crate::state::AppState;

/// Response for GET /api/navigation.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    items: Vec<NavigationItem>,
}

/// Sidebar link without the per-view active flag.
#[derive(Serialize)]
struct NavigationItem {
    id: String,
    title: String,
    path: String,
}

impl From<NavItem> for NavigationItem {
    fn from(item: NavItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            path: item.path,
        }
    }
}

/// Handle GET /api/navigation.
pub(crate) async fn get_navigation(State(state): State<Arc<AppState>>) -> Json<NavigationResponse> {
    let items = state
        .registry
        .nav_items(None)
        .into_iter()
        .map(NavigationItem::from)
        .collect();
    Json(NavigationResponse { items })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use tb_storage::MockStorage;
    use tb_viewer::{DocRegistry, DocumentDescriptor};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn test_get_navigation() {
        let registry = DocRegistry::new(
            "home",
            vec![
                DocumentDescriptor::new("home", "Documentation Home", None),
                DocumentDescriptor::new("setup", "Setup", Some("setup.md")),
            ],
        );
        let app = crate::router(Arc::new(MockStorage::new()), Arc::new(registry), "0.1.0");

        let response = app
            .oneshot(Request::get("/api/navigation").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"items": [
                {"id": "home", "title": "Documentation Home", "path": "/"},
                {"id": "setup", "title": "Setup", "path": "/setup"},
            ]})
        );
    }
}
