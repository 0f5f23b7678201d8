use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::money::to_decimal;
use super::product::{ToothNumber, ToothSet};

pub type ServiceId = String;

/// 服务目录定义 (实验室统一附加服务，如抛光、加急)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceDef {
    pub id: ServiceId,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub is_taxable: Option<bool>,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub tax_rate: Option<f64>,
}

/// 病例上挂的通用服务引用
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommonServiceRef {
    #[serde(default)]
    pub services: Vec<ServiceId>,
    #[serde(default)]
    pub teeth: Vec<ToothNumber>,
}

/// 服务目录，保持目录顺序
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    services: IndexMap<ServiceId, ServiceDef>,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按给定顺序构建；重复 id 保留最后一个定义，位置取首次出现
    pub fn from_defs<I: IntoIterator<Item = ServiceDef>>(defs: I) -> Self {
        let mut services = IndexMap::new();
        for def in defs {
            services.insert(def.id.clone(), def);
        }
        Self { services }
    }

    pub fn get(&self, id: &str) -> Option<&ServiceDef> {
        self.services.get(id)
    }

    /// 目录顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &ServiceDef> {
        self.services.values()
    }
}

/// 聚合后的通用服务行 (按名称合并)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonService {
    pub service_id: ServiceId,
    pub name: String,
    pub unit_price: BigDecimal,
    pub is_taxable: bool,
    pub discount_percent: BigDecimal,
    /// 适用税率 (百分比)，仅在按服务计税时使用
    pub tax_rate: BigDecimal,
    pub teeth: ToothSet,
    /// 折后金额，见 ServiceAggregator
    pub amount: BigDecimal,
}

impl CommonService {
    /// 用目录定义覆盖价格/税/折扣字段 (后写覆盖)
    pub fn apply_def(&mut self, def: &ServiceDef) {
        self.service_id = def.id.clone();
        self.unit_price = to_decimal(def.price);
        self.is_taxable = def.is_taxable.unwrap_or(false);
        self.discount_percent = to_decimal(def.discount);
        self.tax_rate = to_decimal(def.tax_rate);
    }
}
