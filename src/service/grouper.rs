use indexmap::IndexMap;

use super::tooth_range::format_range;
use crate::models::{MergedProduct, ProductType, ToothSet, TypeGroup};

/// 按临床类型分组，分组顺序 = 类型首次出现的顺序
///
/// 缺少类型的产品不进入任何分组；没有牙位的产品也不参与渲染。
/// 两者都只记 debug 日志，不视为错误。
pub fn group_by_type(merged: &[MergedProduct]) -> IndexMap<ProductType, TypeGroup> {
    let mut groups: IndexMap<ProductType, TypeGroup> = IndexMap::new();

    for product in merged {
        let Some(product_type) = product.product_type.clone() else {
            tracing::debug!("product {} has no type, dropped from grouping", product.product_id);
            continue;
        };
        if product.tooth_numbers.is_empty() {
            tracing::debug!("product {} has no teeth, not rendered", product.product_id);
            continue;
        }

        let group = groups.entry(product_type.clone()).or_insert_with(|| TypeGroup {
            product_type,
            teeth: ToothSet::new(),
            teeth_display: String::new(),
            products: Vec::new(),
        });
        group.teeth.extend(product.tooth_numbers.iter().copied());
        group.products.push(product.clone());
    }

    for group in groups.values_mut() {
        group.teeth_display = format_range(&group.teeth);
    }

    groups
}
