use bigdecimal::{BigDecimal, One};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::to_decimal;
use super::shade::{ShadeKey, Shades};
use super::snapshot::{CaseProduct, RawDiscountedPrice};

/// FDI 牙位号 (11-48)，越界值原样保留
pub type ToothNumber = i32;

/// 牙位集合：保序 + 去重
pub type ToothSet = IndexSet<ToothNumber>;

/// 产品临床类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ProductType {
    Crown,
    Bridge,
    Removable,
    Implant,
    Veneer,
    InlayOnlay,
    Orthodontic,
    Other(String),
}

impl ProductType {
    /// 解析类型标签，空字符串视为缺失
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.is_empty() {
            return None;
        }
        let normalized: String = tag
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        Some(match normalized.as_str() {
            "crown" | "crowns" => ProductType::Crown,
            "bridge" | "bridges" => ProductType::Bridge,
            "removable" | "removables" => ProductType::Removable,
            "implant" | "implants" => ProductType::Implant,
            "veneer" | "veneers" => ProductType::Veneer,
            "inlayonlay" | "inlay" | "onlay" => ProductType::InlayOnlay,
            "orthodontic" | "orthodontics" => ProductType::Orthodontic,
            _ => ProductType::Other(tag.to_string()),
        })
    }

    pub fn label(&self) -> &str {
        match self {
            ProductType::Crown => "Crown",
            ProductType::Bridge => "Bridge",
            ProductType::Removable => "Removable",
            ProductType::Implant => "Implant",
            ProductType::Veneer => "Veneer",
            ProductType::InlayOnlay => "Inlay/Onlay",
            ProductType::Orthodontic => "Orthodontic",
            ProductType::Other(tag) => tag.as_str(),
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for ProductType {
    fn from(tag: String) -> Self {
        ProductType::parse(&tag).unwrap_or(ProductType::Other(tag))
    }
}

impl From<ProductType> for String {
    fn from(t: ProductType) -> Self {
        t.label().to_string()
    }
}

/// 折后价格四元组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountedPrice {
    pub price: BigDecimal,
    /// 折扣百分比；合并时取第一个定义了它的记录
    pub discount: Option<BigDecimal>,
    pub final_price: BigDecimal,
    pub total: BigDecimal,
}

impl DiscountedPrice {
    pub fn discount_or_zero(&self) -> BigDecimal {
        self.discount.clone().unwrap_or_default()
    }
}

impl From<&RawDiscountedPrice> for DiscountedPrice {
    fn from(raw: &RawDiscountedPrice) -> Self {
        Self {
            price: to_decimal(raw.price),
            discount: raw.discount.filter(|d| d.is_finite()).map(|d| to_decimal(Some(d))),
            final_price: to_decimal(raw.final_price),
            total: to_decimal(raw.total),
        }
    }
}

/// 单条牙位-产品分配 (一条 case product 记录)
#[derive(Debug, Clone, PartialEq)]
pub struct ToothAssignment {
    pub product_id: String,
    pub name: Option<String>,
    pub tooth_numbers: ToothSet,
    pub pontic_teeth: ToothSet,
    pub product_type: Option<ProductType>,
    pub shades: Shades,
    pub notes: String,
    pub discounted_price: DiscountedPrice,
    pub service_ids: Vec<String>,
    pub quantity: Option<BigDecimal>,
}

impl From<&CaseProduct> for ToothAssignment {
    fn from(p: &CaseProduct) -> Self {
        let tp = &p.teeth_product;
        Self {
            product_id: p.id.clone(),
            name: p.name.clone(),
            tooth_numbers: tp.tooth_number.iter().copied().collect(),
            pontic_teeth: tp.pontic_teeth.iter().copied().collect(),
            product_type: tp.product_type.as_deref().and_then(ProductType::parse),
            shades: tp.shades(),
            notes: tp.notes.clone().unwrap_or_default(),
            discounted_price: DiscountedPrice::from(&p.discounted_price),
            service_ids: p.additional_services_id.clone().unwrap_or_default(),
            quantity: p.quantity.filter(|q| q.is_finite()).map(|q| to_decimal(Some(q))),
        }
    }
}

/// 合并身份：(产品ID, 四个比色键, 附加服务ID)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MergeKey {
    pub product_id: String,
    pub shades: ShadeKey,
    pub service_ids: Vec<String>,
}

/// 合并后的产品行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedProduct {
    pub product_id: String,
    pub name: Option<String>,
    pub product_type: Option<ProductType>,
    pub tooth_numbers: ToothSet,
    pub pontic_teeth: ToothSet,
    pub shades: Shades,
    pub notes: String,
    pub discounted_price: DiscountedPrice,
    pub service_ids: Vec<String>,
    /// 数量，缺失时为 1
    pub quantity: BigDecimal,
    /// 合并进来的原始记录数
    pub source_count: usize,
}

impl MergedProduct {
    pub fn from_assignment(a: &ToothAssignment) -> Self {
        Self {
            product_id: a.product_id.clone(),
            name: a.name.clone(),
            product_type: a.product_type.clone(),
            tooth_numbers: a.tooth_numbers.clone(),
            pontic_teeth: a.pontic_teeth.clone(),
            shades: a.shades.clone(),
            notes: a.notes.clone(),
            discounted_price: a.discounted_price.clone(),
            service_ids: a.service_ids.clone(),
            quantity: a.quantity.clone().unwrap_or_else(BigDecimal::one),
            source_count: 1,
        }
    }

    /// 反向转换，用于对已合并结果再次合并
    pub fn to_assignment(&self) -> ToothAssignment {
        ToothAssignment {
            product_id: self.product_id.clone(),
            name: self.name.clone(),
            tooth_numbers: self.tooth_numbers.clone(),
            pontic_teeth: self.pontic_teeth.clone(),
            product_type: self.product_type.clone(),
            shades: self.shades.clone(),
            notes: self.notes.clone(),
            discounted_price: self.discounted_price.clone(),
            service_ids: self.service_ids.clone(),
            quantity: Some(self.quantity.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_type_tags_case_insensitively() {
        assert_eq!(ProductType::parse("crown"), Some(ProductType::Crown));
        assert_eq!(ProductType::parse(" Bridges "), Some(ProductType::Bridge));
        assert_eq!(ProductType::parse("Inlay/Onlay"), Some(ProductType::InlayOnlay));
        assert_eq!(
            ProductType::parse("Night Guard"),
            Some(ProductType::Other("Night Guard".into()))
        );
        assert_eq!(ProductType::parse(""), None);
    }

    #[test]
    fn type_serializes_as_label() {
        let json = serde_json::to_string(&ProductType::InlayOnlay).unwrap();
        assert_eq!(json, "\"Inlay/Onlay\"");
        let back: ProductType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProductType::InlayOnlay);
    }

    #[test]
    fn nan_discount_is_treated_as_undefined() {
        let raw = RawDiscountedPrice {
            price: Some(f64::NAN),
            discount: Some(f64::NAN),
            final_price: None,
            total: Some(100.0),
        };
        let dp = DiscountedPrice::from(&raw);
        assert_eq!(dp.price, BigDecimal::from(0));
        assert_eq!(dp.discount, None);
        assert_eq!(dp.total, BigDecimal::from(100));
    }
}
