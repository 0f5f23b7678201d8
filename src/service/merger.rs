use indexmap::IndexMap;

use crate::config::EngineConfig;
use crate::models::money::percent_of;
use crate::models::{MergeKey, MergedProduct, ToothAssignment};

/// 产品合并器
/// 仅牙位不同的记录合并为一行：牙位取并集，价格字段求和
#[derive(Debug, Clone, Copy)]
pub struct ProductMerger {
    include_custom_shade: bool,
    recompute_total: bool,
}

impl Default for ProductMerger {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl ProductMerger {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            include_custom_shade: config.custom_shade_in_merge_key,
            recompute_total: config.recompute_merged_total,
        }
    }

    /// 合并身份
    pub fn merge_key(&self, a: &ToothAssignment) -> MergeKey {
        let mut service_ids = a.service_ids.clone();
        service_ids.sort();
        service_ids.dedup();
        MergeKey {
            product_id: a.product_id.clone(),
            shades: a.shades.merge_key(self.include_custom_shade),
            service_ids,
        }
    }

    /// 合并分配记录，输出顺序 = 每个身份首次出现的顺序
    /// 不修改输入；非求和字段 (备注、比色显示、数量) 先到先得
    pub fn merge(&self, assignments: &[ToothAssignment]) -> Vec<MergedProduct> {
        let mut merged: IndexMap<MergeKey, MergedProduct> = IndexMap::new();

        for a in assignments {
            let key = self.merge_key(a);
            match merged.get_mut(&key) {
                Some(existing) => {
                    existing.tooth_numbers.extend(a.tooth_numbers.iter().copied());
                    existing.pontic_teeth.extend(a.pontic_teeth.iter().copied());

                    let price = &mut existing.discounted_price;
                    price.price += &a.discounted_price.price;
                    price.final_price += &a.discounted_price.final_price;
                    price.total += &a.discounted_price.total;
                    if price.discount.is_none() {
                        price.discount = a.discounted_price.discount.clone();
                    }
                    existing.source_count += 1;
                }
                None => {
                    merged.insert(key, MergedProduct::from_assignment(a));
                }
            }
        }

        let mut products: Vec<MergedProduct> = merged.into_values().collect();
        if self.recompute_total {
            for p in products.iter_mut().filter(|p| p.source_count > 1) {
                let price = &mut p.discounted_price;
                price.total = &price.price - percent_of(&price.price, &price.discount_or_zero());
            }
        }

        tracing::debug!(
            "merged {} assignments into {} product lines",
            assignments.len(),
            products.len()
        );
        products
    }

    /// 对已合并结果再合并 (结果与一次合并的身份和牙位一致)
    pub fn remerge(&self, merged: &[MergedProduct]) -> Vec<MergedProduct> {
        let assignments: Vec<ToothAssignment> =
            merged.iter().map(MergedProduct::to_assignment).collect();
        self.merge(&assignments)
    }
}
