use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;

use crate::config::EngineConfig;
use crate::models::money::{percent_of, round_to};
use crate::models::{CommonService, CommonServiceRef, ServiceCatalog, ServiceId, ToothSet};

/// 通用服务聚合器
#[derive(Debug, Clone, Copy)]
pub struct ServiceAggregator {
    money_scale: i64,
}

impl Default for ServiceAggregator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl ServiceAggregator {
    pub fn new(config: &EngineConfig) -> Self {
        Self { money_scale: config.money_scale }
    }

    /// 聚合病例上的通用服务，按服务名称合并
    ///
    /// 处理顺序是目录顺序而不是病例顺序：同名服务的价格/税/折扣取目录中最后一个，
    /// 输出顺序为名称在目录中首次出现的顺序。目录里找不到的服务 id 直接跳过。
    pub fn aggregate(
        &self,
        case_services: &[CommonServiceRef],
        catalog: &ServiceCatalog,
    ) -> IndexMap<String, CommonService> {
        // 服务 id -> 牙位并集
        let mut referenced: IndexMap<&ServiceId, ToothSet> = IndexMap::new();
        for entry in case_services {
            for id in &entry.services {
                if catalog.get(id).is_none() {
                    tracing::debug!("common service {} not found in catalog, skipping", id);
                    continue;
                }
                referenced
                    .entry(id)
                    .or_default()
                    .extend(entry.teeth.iter().copied());
            }
        }

        let mut by_name: IndexMap<String, CommonService> = IndexMap::new();
        for def in catalog.iter() {
            let Some(teeth) = referenced.get(&def.id) else {
                continue;
            };
            let service = by_name.entry(def.name.clone()).or_insert_with(|| CommonService {
                service_id: def.id.clone(),
                name: def.name.clone(),
                unit_price: BigDecimal::zero(),
                is_taxable: false,
                discount_percent: BigDecimal::zero(),
                tax_rate: BigDecimal::zero(),
                teeth: ToothSet::new(),
                amount: BigDecimal::zero(),
            });
            service.teeth.extend(teeth.iter().copied());
            service.apply_def(def);
        }

        for service in by_name.values_mut() {
            service.amount = round_to(
                &service_amount(&service.unit_price, &service.discount_percent),
                self.money_scale,
            );
        }

        by_name
    }
}

/// 服务折后金额：discount > 0 时 price - price × discount/100，否则 price；不小于 0
pub fn service_amount(price: &BigDecimal, discount_percent: &BigDecimal) -> BigDecimal {
    let amount = if *discount_percent > BigDecimal::zero() {
        price - percent_of(price, discount_percent)
    } else {
        price.clone()
    };
    if amount < BigDecimal::zero() {
        BigDecimal::zero()
    } else {
        amount
    }
}
