use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::product::ProductType;

/// 发票级折扣类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    Percentage,
    Fixed,
}

/// 发票级折扣 {type, value}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDiscount {
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    #[serde(default)]
    pub value: Option<f64>,
}

impl InvoiceDiscount {
    pub fn percentage(value: f64) -> Self {
        Self { kind: DiscountKind::Percentage, value: Some(value) }
    }

    pub fn fixed(value: f64) -> Self {
        Self { kind: DiscountKind::Fixed, value: Some(value) }
    }
}

/// 税额来源 (先匹配先生效)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxSource {
    ClientRate,
    InvoiceRate,
    TaxableServices,
    None,
}

/// 税率输入
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TaxRates {
    pub client_rate: Option<f64>,
    pub invoice_rate: Option<f64>,
}

/// 发票合计，每次渲染重新计算，不落库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: BigDecimal,
    pub discount_amount: BigDecimal,
    pub tax_amount: BigDecimal,
    pub grand_total: BigDecimal,
    pub tax_source: TaxSource,
}

/// 产品明细行 (供展示层直接渲染)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub product_id: String,
    pub name: Option<String>,
    pub product_type: Option<ProductType>,
    pub teeth_display: String,
    pub pontic_display: String,
    pub shade_summary: String,
    pub service_names: Vec<String>,
    pub notes: String,
    pub unit_price: BigDecimal,
    pub quantity: BigDecimal,
    pub discount_percent: BigDecimal,
    pub amount: BigDecimal,
}
