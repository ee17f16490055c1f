use super::assets::INDEX_HTML;
use crate::model::{Lane, ViewGraph};
use crate::navigation::{
    Expansion, NavigationError, NavigationOutcome, NavigationState, SharedController,
    select_shared,
};
use crate::output::{Breadcrumb, breadcrumbs};
use crate::style;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    pub controller: SharedController,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    #[serde(flatten)]
    pub state: NavigationState,
    pub last_error: Option<String>,
    pub breadcrumbs: usize,
}

/// A navigation failure mapped onto an HTTP status.
#[derive(Debug)]
pub struct ApiError(pub NavigationError);

impl From<NavigationError> for ApiError {
    fn from(e: NavigationError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            NavigationError::FocalLookup { .. } => StatusCode::BAD_GATEWAY,
            NavigationError::NotSelectable(_) | NavigationError::BreadcrumbOutOfRange { .. } => {
                StatusCode::NOT_FOUND
            }
            NavigationError::NoPlaceholder(_) | NavigationError::InFlight(_) => {
                StatusCode::CONFLICT
            }
            NavigationError::UnknownLane(_) => StatusCode::BAD_REQUEST,
        };
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/view", get(view_handler))
        .route("/api/state", get(state_handler))
        .route("/api/breadcrumbs", get(breadcrumbs_handler))
        .route("/api/select/{node_id}", post(select_handler))
        .route("/api/lanes/{lane}/more", post(load_more_handler))
        .route("/api/breadcrumbs/{index}", post(restore_handler))
        .layer(cors)
        .with_state(state)
}

/// Serve the navigator until the process is stopped.
pub async fn serve(
    controller: SharedController,
    port: u16,
    open_browser: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(Arc::new(AppState { controller }));

    let addr = format!("127.0.0.1:{}", port);
    let url = format!("http://{}", addr);

    style::header("Starting provnav server...");
    println!("Open in browser: {}", style::url(&url));
    println!("Press Ctrl+C to stop");

    if open_browser {
        if let Err(e) = open::that(&url) {
            style::warning(&format!("Could not open browser: {}", e));
        }
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn view_handler(State(state): State<Arc<AppState>>) -> Json<ViewGraph> {
    Json(state.controller.lock().await.current_view().clone())
}

async fn state_handler(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let controller = state.controller.lock().await;
    Json(StateResponse {
        state: controller.state().clone(),
        last_error: controller.last_error().map(str::to_string),
        breadcrumbs: controller.breadcrumbs().len(),
    })
}

async fn breadcrumbs_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Breadcrumb>> {
    Json(breadcrumbs(&*state.controller.lock().await))
}

async fn select_handler(
    State(state): State<Arc<AppState>>,
    Path(node_id): Path<String>,
) -> Result<Json<NavigationOutcome>, ApiError> {
    Ok(Json(select_shared(&state.controller, &node_id).await?))
}

async fn load_more_handler(
    State(state): State<Arc<AppState>>,
    Path(lane): Path<String>,
) -> Result<Json<Expansion>, ApiError> {
    let lane: Lane = lane.parse().map_err(NavigationError::from)?;
    Ok(Json(state.controller.lock().await.on_load_more(lane)?))
}

async fn restore_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<NavigationOutcome>, ApiError> {
    Ok(Json(
        state.controller.lock().await.on_breadcrumb_selected(index)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::NeighborhoodFetcher;
    use crate::fetch::mock::MockSource;
    use crate::layout::LayoutOptions;
    use crate::model::Direction;
    use crate::navigation::{NavigationController, NavigationOptions};
    use tokio::sync::Mutex;

    const INT: &str = "data.core.int.Int.";
    const CALC: &str = "process.calculation.calcjob.CalcJobNode.";

    async fn app_state() -> Arc<AppState> {
        let mut source = MockSource::new().with_node("f", CALC);
        for i in 1..=12 {
            source = source.with_link("f", Direction::Input, &format!("d{:02}", i), INT, "x");
        }
        let source = source.with_link("d01", Direction::Output, "f", CALC, "x");

        let mut controller = NavigationController::new(
            NeighborhoodFetcher::new(Arc::new(source)),
            LayoutOptions::default(),
            NavigationOptions::immediate(),
        );
        controller.open("f").await.unwrap();
        Arc::new(AppState {
            controller: Arc::new(Mutex::new(controller)),
        })
    }

    #[tokio::test]
    async fn test_select_and_restore() {
        let state = app_state().await;

        let Json(outcome) = select_handler(State(state.clone()), Path("d01".to_string()))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            NavigationOutcome::Committed {
                focal_id: "d01".to_string()
            }
        );

        let Json(crumbs) = breadcrumbs_handler(State(state.clone())).await;
        assert_eq!(crumbs.len(), 1);
        assert_eq!(crumbs[0].focal_id, "f");

        restore_handler(State(state.clone()), Path(0)).await.unwrap();
        let Json(view) = view_handler(State(state.clone())).await;
        assert_eq!(view.focal_id, "f");
        let Json(status) = state_handler(State(state)).await;
        assert_eq!(status.breadcrumbs, 1);
        assert!(status.last_error.is_none());
    }

    #[tokio::test]
    async fn test_load_more_lane() {
        let state = app_state().await;

        let Json(expansion) = load_more_handler(State(state.clone()), Path("input-data".to_string()))
            .await
            .unwrap();
        assert_eq!(expansion.added, 2);

        let err = load_more_handler(State(state.clone()), Path("input-data".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

        let err = load_more_handler(State(state), Path("sideways".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_load_more_during_navigation_conflicts() {
        let state = app_state().await;
        state.controller.lock().await.begin_navigation("d01");

        let err = load_more_handler(State(state.clone()), Path("input-data".to_string()))
            .await
            .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
        let Json(view) = view_handler(State(state)).await;
        assert_eq!(view.lane_nodes(Lane::InputData).len(), 10);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let state = app_state().await;

        let err = select_handler(State(state.clone()), Path("nope".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err = restore_handler(State(state), Path(4)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
