pub mod error;
pub mod feedback;
pub mod goals;
pub mod highlights;
pub mod notes;
pub mod sprint_tasks;

use crate::middleware::correlation::correlation_middleware;
use crate::{AppState, openapi};
use axum::Router;
use axum::middleware;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(highlights::router(state.clone()))
        .merge(notes::router(state.clone()))
        .merge(goals::router(state.clone()))
        .merge(sprint_tasks::router(state))
        .merge(openapi::router())
        .route_layer(middleware::from_fn(correlation_middleware));

    Router::new().nest("/api", api)
}
