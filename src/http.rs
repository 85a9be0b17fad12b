//! HTTP transport
//!
//! JSON API over the storefront operations. Writes present the admin code in
//! the `x-admin-code` header; it is checked before the body is parsed.

use crate::admin::ADMIN_CODE_HEADER;
use crate::catalog::{Catalog, CatalogChange, Product};
use crate::cli::{AddArgs, ProductRef, SearchArgs};
use crate::error::AppError;
use crate::state::AppState;
use crate::tools;
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.message(),
                "retryable": self.is_retryable(),
            }
        });
        (status, Json(body)).into_response()
    }
}

/// Build the router with all routes configured
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/catalog", get(get_catalog))
        .route("/api/catalog/:category", get(get_category))
        .route("/api/search", get(search))
        .route("/api/products", post(create_product))
        .route("/api/products/:category/:id", delete(delete_product))
        .route("/api/products/:category/:id/order", get(order_product))
        .with_state(state)
}

/// Bind and serve until ctrl-c
pub async fn serve(state: AppState, bind: &str) -> anyhow::Result<()> {
    tokio::spawn(log_changes(state.store.subscribe()));

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Storefront listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}

/// Audit log of committed catalog changes; ends when the store is dropped
async fn log_changes(mut changes: broadcast::Receiver<CatalogChange>) {
    loop {
        match changes.recv().await {
            Ok(change) => info!(
                "Catalog {:?}: {}/{} ({})",
                change.kind, change.category, change.product.id, change.product.name
            ),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Change log fell behind, {} events skipped", skipped)
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn presented_code(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ADMIN_CODE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Run a blocking store mutation off the async workers
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("worker task failed: {}", e)))?
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_catalog(State(state): State<AppState>) -> Result<Json<Catalog>, AppError> {
    tools::catalog::execute_catalog(&state).map(Json)
}

async fn get_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>, AppError> {
    tools::catalog::execute_list(&state, &category).map(Json)
}

async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchArgs>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(args) = query
        .map_err(|e| AppError::Validation(format!("Invalid search query: {}", e.body_text())))?;
    let hits = tools::search::execute_search(&state, &args)?;
    Ok(Json(json!({
        "query": args.query,
        "count": hits.len(),
        "results": hits,
    })))
}

async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let code = presented_code(&headers);
    state.guard.check(code.as_deref())?;

    let args: AddArgs = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?;

    let product =
        run_blocking(move || tools::products::execute_add(&state, code.as_deref(), args)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn delete_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(target): Path<ProductRef>,
) -> Result<Json<Product>, AppError> {
    let code = presented_code(&headers);
    let product =
        run_blocking(move || tools::products::execute_remove(&state, code.as_deref(), &target))
            .await?;
    Ok(Json(product))
}

async fn order_product(
    State(state): State<AppState>,
    Path(target): Path<ProductRef>,
) -> Result<Json<tools::order::OrderLink>, AppError> {
    tools::order::execute_order(&state, &target).map(Json)
}
