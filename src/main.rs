use dental_invoice_rust::{api, AppConfig, InvoiceRenderer};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::from_env()?;
    info!("Starting server with config: {:?}", config);

    // 渲染管线无状态，所有请求共享一个实例
    let renderer = Arc::new(InvoiceRenderer::new(&config.engine));
    let app = api::router(renderer);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/invoice/render        - single invoice / lab slip");
    info!("  POST /api/invoice/render/batch  - batch render (parallel)");
    info!("  POST /api/invoice/render/csv    - line items as CSV");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
