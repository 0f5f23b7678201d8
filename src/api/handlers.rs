use crate::models::{RenderRequest, RenderedInvoice};
use crate::service::{lines_to_csv, InvoiceRenderer};
use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 请求体: 批量渲染
#[derive(Debug, Deserialize)]
pub struct BatchRenderRequest {
    pub requests: Vec<RenderRequest>,
}

/// 单张发票响应
#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub success: bool,
    pub message: String,
    pub invoice: Option<RenderedInvoice>,
}

/// 批量响应
#[derive(Debug, Serialize)]
pub struct BatchRenderResponse {
    pub success: bool,
    pub message: String,
    pub invoices: Option<Vec<RenderedInvoice>>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 渲染单张发票 / 技工单
pub async fn render_invoice(
    State(renderer): State<Arc<InvoiceRenderer>>,
    Json(req): Json<RenderRequest>,
) -> Response {
    let invoice = renderer.render_request(&req);
    tracing::info!(
        "Rendered invoice: {} products, {} lines, grand total {}",
        req.snapshot.products.len(),
        invoice.lines.len(),
        invoice.totals.grand_total
    );

    let response = RenderResponse {
        success: true,
        message: format!("Rendered {} product lines", invoice.lines.len()),
        invoice: Some(invoice),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// 批量渲染 (批量发送发票邮件)
pub async fn render_batch(
    State(renderer): State<Arc<InvoiceRenderer>>,
    Json(req): Json<BatchRenderRequest>,
) -> Response {
    let requests = req.requests;
    let count = requests.len();
    let result =
        tokio::task::spawn_blocking(move || renderer.render_batch(&requests)).await;

    match result {
        Ok(invoices) => {
            tracing::info!("Rendered batch of {} invoices", count);
            let response = BatchRenderResponse {
                success: true,
                message: format!("Successfully rendered {} invoices", count),
                invoices: Some(invoices),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!("Batch render failed: {}", e);
            let response = BatchRenderResponse {
                success: false,
                message: format!("Error: {}", e),
                invoices: None,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}

/// 渲染并导出 CSV
pub async fn render_csv(
    State(renderer): State<Arc<InvoiceRenderer>>,
    Json(req): Json<RenderRequest>,
) -> Response {
    let invoice = renderer.render_request(&req);
    match lines_to_csv(&invoice) {
        Ok(csv) => (StatusCode::OK, [(header::CONTENT_TYPE, "text/csv")], csv).into_response(),
        Err(e) => {
            tracing::error!("CSV export failed: {}", e);
            let response = RenderResponse {
                success: false,
                message: format!("Error: {}", e),
                invoice: None,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}
