use thiserror::Error;

/// 引擎对外错误
/// 计算本身不会失败，只有输入结构不对 (例如 products 不是数组) 或导出失败时才报错
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid case snapshot: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv output is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
