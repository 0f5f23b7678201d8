use serde::{Deserialize, Serialize};

use super::product::ToothNumber;
use super::service::{CommonServiceRef, ServiceDef};
use super::shade::{ShadeSlot, Shades};
use super::totals::InvoiceDiscount;

/// 病例快照 (数据层给出的原始结构)
/// products 缺失或不是数组时反序列化失败，这是唯一的调用方错误
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseSnapshot {
    pub products: Vec<CaseProduct>,
    #[serde(default)]
    pub common_services: Option<Vec<CommonServiceRef>>,
    #[serde(default)]
    pub invoice_notes: Option<String>,
    #[serde(default)]
    pub discount: Option<InvoiceDiscount>,
    #[serde(default)]
    pub tax_rate: Option<f64>,
    /// 客户级税率，优先于发票/服务税率
    #[serde(default)]
    pub client_tax_rate: Option<f64>,
}

/// 病例中的一条产品记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseProduct {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "teethProduct", alias = "teeth_product", default)]
    pub teeth_product: TeethProduct,
    #[serde(default)]
    pub discounted_price: RawDiscountedPrice,
    #[serde(default)]
    pub additional_services_id: Option<Vec<String>>,
    #[serde(default)]
    pub quantity: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeethProduct {
    #[serde(rename = "type", default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub tooth_number: Vec<ToothNumber>,
    #[serde(default)]
    pub pontic_teeth: Vec<ToothNumber>,
    #[serde(default)]
    pub occlusal_shade: Option<String>,
    #[serde(default)]
    pub body_shade: Option<String>,
    #[serde(default)]
    pub gingival_shade: Option<String>,
    #[serde(default)]
    pub stump_shade: Option<String>,
    #[serde(default)]
    pub manual_occlusal_shade: Option<String>,
    #[serde(default)]
    pub manual_body_shade: Option<String>,
    #[serde(default)]
    pub manual_gingival_shade: Option<String>,
    #[serde(default)]
    pub manual_stump_shade: Option<String>,
    #[serde(default)]
    pub custom_occlusal_shade: Option<String>,
    #[serde(default)]
    pub custom_body_shade: Option<String>,
    #[serde(default)]
    pub custom_gingival_shade: Option<String>,
    #[serde(default)]
    pub custom_stump_shade: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TeethProduct {
    /// 平铺的可选字段 -> 四个比色部位
    pub fn shades(&self) -> Shades {
        Shades {
            occlusal: ShadeSlot::new(
                self.occlusal_shade.clone(),
                self.manual_occlusal_shade.clone(),
                self.custom_occlusal_shade.clone(),
            ),
            body: ShadeSlot::new(
                self.body_shade.clone(),
                self.manual_body_shade.clone(),
                self.custom_body_shade.clone(),
            ),
            gingival: ShadeSlot::new(
                self.gingival_shade.clone(),
                self.manual_gingival_shade.clone(),
                self.custom_gingival_shade.clone(),
            ),
            stump: ShadeSlot::new(
                self.stump_shade.clone(),
                self.manual_stump_shade.clone(),
                self.custom_stump_shade.clone(),
            ),
        }
    }
}

/// 源价格字段，均可能缺失
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDiscountedPrice {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub final_price: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
}

/// 一次渲染请求：快照 + 服务目录 (目录顺序即处理顺序)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderRequest {
    pub snapshot: CaseSnapshot,
    #[serde(default)]
    pub catalog: Vec<ServiceDef>,
}
