use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::product::{MergedProduct, ProductType, ToothSet};
use super::service::CommonService;
use super::totals::{InvoiceLine, InvoiceTotals};

/// 按临床类型分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeGroup {
    pub product_type: ProductType,
    /// 组内所有产品牙位的并集
    pub teeth: ToothSet,
    pub teeth_display: String,
    pub products: Vec<MergedProduct>,
}

/// 一次渲染的完整输出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedInvoice {
    pub groups: IndexMap<ProductType, TypeGroup>,
    pub common_services: IndexMap<String, CommonService>,
    pub lines: Vec<InvoiceLine>,
    pub totals: InvoiceTotals,
    pub invoice_notes: Option<String>,
    pub rendered_at: DateTime<Utc>,
}
