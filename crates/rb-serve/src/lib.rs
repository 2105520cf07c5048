pub mod middleware;
pub mod openapi;
pub mod routes;

use axum::Router;
use rb_core::{RetroBoard, RetroError};
use rb_db::schema;
use rb_db::store::DbStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub db_path: String,
}

impl AppState {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServeOptions {
    pub permissive_cors: bool,
}

/// Opens a fresh connection per request; the board lives for one handler call.
pub fn build_board(state: &AppState) -> Result<RetroBoard<DbStore>, RetroError> {
    let conn = schema::open_and_migrate(&state.db_path).map_err(|err| RetroError::Storage {
        message: err.to_string(),
    })?;
    Ok(RetroBoard::new(DbStore::new(conn)))
}

pub fn app(state: AppState) -> Router {
    routes::router(state).layer(TraceLayer::new_for_http())
}

pub async fn serve(
    state: AppState,
    addr: std::net::SocketAddr,
    options: ServeOptions,
) -> Result<(), std::io::Error> {
    let mut router = app(state);
    if options.permissive_cors {
        router = router.layer(CorsLayer::permissive());
    }
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "retroboard listening");
    axum::serve(listener, router).await
}
