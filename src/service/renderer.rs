use chrono::Utc;
use rayon::prelude::*;

use super::grouper::group_by_type;
use super::merger::ProductMerger;
use super::price_calculator::PriceCalculator;
use super::service_aggregator::ServiceAggregator;
use super::tooth_range::format_range;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::models::{
    CaseSnapshot, CommonService, InvoiceLine, MergedProduct, RenderRequest, RenderedInvoice,
    ServiceCatalog, TaxRates, ToothAssignment,
};

/// 发票 / 技工单渲染管线
/// 快照 -> 合并 -> 分组 + 服务聚合 -> 计价
///
/// 不持有任何可变状态，可在多个线程间共享。
#[derive(Debug, Clone, Default)]
pub struct InvoiceRenderer {
    merger: ProductMerger,
    aggregator: ServiceAggregator,
    calculator: PriceCalculator,
}

impl InvoiceRenderer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            merger: ProductMerger::new(config),
            aggregator: ServiceAggregator::new(config),
            calculator: PriceCalculator::new(config),
        }
    }

    pub fn render(&self, snapshot: &CaseSnapshot, catalog: &ServiceCatalog) -> RenderedInvoice {
        let assignments: Vec<ToothAssignment> =
            snapshot.products.iter().map(ToothAssignment::from).collect();
        let merged = self.merger.merge(&assignments);
        let groups = group_by_type(&merged);

        let common_services = self.aggregator.aggregate(
            snapshot.common_services.as_deref().unwrap_or_default(),
            catalog,
        );
        let services: Vec<&CommonService> = common_services.values().collect();

        let totals = self.calculator.compute_totals(
            &merged,
            &services,
            snapshot.discount.as_ref(),
            TaxRates {
                client_rate: snapshot.client_tax_rate,
                invoice_rate: snapshot.tax_rate,
            },
        );

        let lines = merged.iter().map(|p| self.build_line(p, catalog)).collect();

        tracing::debug!(
            "rendered {} products -> {} lines, {} groups, {} common services, total {}",
            snapshot.products.len(),
            merged.len(),
            groups.len(),
            common_services.len(),
            totals.grand_total
        );

        RenderedInvoice {
            groups,
            common_services,
            lines,
            totals,
            invoice_notes: snapshot.invoice_notes.clone(),
            rendered_at: Utc::now(),
        }
    }

    pub fn render_request(&self, request: &RenderRequest) -> RenderedInvoice {
        let catalog = ServiceCatalog::from_defs(request.catalog.iter().cloned());
        self.render(&request.snapshot, &catalog)
    }

    /// 从 JSON 渲染；products 缺失或不是数组时返回 InvalidSnapshot
    pub fn render_json(&self, body: &str) -> Result<RenderedInvoice, EngineError> {
        let request: RenderRequest = serde_json::from_str(body)?;
        Ok(self.render_request(&request))
    }

    /// 批量渲染 (例如批量发送发票邮件)，各快照互不共享，结果保持输入顺序
    pub fn render_batch(&self, requests: &[RenderRequest]) -> Vec<RenderedInvoice> {
        requests
            .par_iter()
            .map(|request| self.render_request(request))
            .collect()
    }

    fn build_line(&self, product: &MergedProduct, catalog: &ServiceCatalog) -> InvoiceLine {
        let service_names = product
            .service_ids
            .iter()
            .filter_map(|id| match catalog.get(id) {
                Some(def) => Some(def.name.clone()),
                None => {
                    tracing::debug!(
                        "service {} on product {} not found in catalog",
                        id,
                        product.product_id
                    );
                    None
                }
            })
            .collect();

        InvoiceLine {
            product_id: product.product_id.clone(),
            name: product.name.clone(),
            product_type: product.product_type.clone(),
            teeth_display: format_range(&product.tooth_numbers),
            pontic_display: format_range(&product.pontic_teeth),
            shade_summary: product.shades.summary(),
            service_names,
            notes: product.notes.clone(),
            unit_price: product.discounted_price.price.clone(),
            quantity: product.quantity.clone(),
            discount_percent: product.discounted_price.discount_or_zero(),
            amount: self.calculator.line_amount(product),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use serde_json::json;

    #[test]
    fn empty_snapshot_renders_empty() {
        let out = InvoiceRenderer::default().render(&CaseSnapshot::default(), &ServiceCatalog::new());
        assert!(out.groups.is_empty());
        assert!(out.common_services.is_empty());
        assert!(out.lines.is_empty());
        assert_eq!(out.totals.grand_total, BigDecimal::from(0));
    }

    #[test]
    fn render_json_rejects_missing_products() {
        let err = InvoiceRenderer::default()
            .render_json(r#"{"snapshot": {"products": null}}"#)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidSnapshot(_)));
    }

    #[test]
    fn line_lists_known_service_names_only() {
        let request: RenderRequest = serde_json::from_value(json!({
            "snapshot": {
                "products": [{
                    "id": "P1",
                    "teethProduct": { "type": "Crown", "tooth_number": [11] },
                    "discounted_price": { "price": 100 },
                    "additional_services_id": ["S1", "MISSING"]
                }]
            },
            "catalog": [{ "id": "S1", "name": "Stain & Glaze" }]
        }))
        .unwrap();
        let out = InvoiceRenderer::default().render_request(&request);
        assert_eq!(out.lines[0].service_names, ["Stain & Glaze"]);
        assert_eq!(out.lines[0].teeth_display, "11");
    }

    #[test]
    fn batch_keeps_input_order() {
        let requests: Vec<RenderRequest> = (1..=8)
            .map(|i| {
                serde_json::from_value(json!({
                    "snapshot": {
                        "products": [{
                            "id": format!("P{}", i),
                            "teethProduct": { "type": "Crown", "tooth_number": [11] },
                            "discounted_price": { "price": i * 10 }
                        }]
                    }
                }))
                .unwrap()
            })
            .collect();
        let out = InvoiceRenderer::default().render_batch(&requests);
        let totals: Vec<BigDecimal> = out.iter().map(|r| r.totals.grand_total.clone()).collect();
        let expected: Vec<BigDecimal> = (1..=8).map(|i| BigDecimal::from(i * 10)).collect();
        assert_eq!(totals, expected);
    }
}
