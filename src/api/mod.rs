pub mod handlers;

pub use handlers::*;

use crate::service::InvoiceRenderer;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// 构建路由
pub fn router(renderer: Arc<InvoiceRenderer>) -> Router {
    let render_routes = Router::new()
        .route("/api/invoice/render", post(render_invoice))
        .route("/api/invoice/render/batch", post(render_batch))
        .route("/api/invoice/render/csv", post(render_csv))
        .with_state(renderer);

    Router::new()
        .route("/health", get(health_check))
        .merge(render_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
