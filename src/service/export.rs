use bigdecimal::BigDecimal;
use csv::Writer;

use super::tooth_range::format_range;
use crate::error::EngineError;
use crate::models::RenderedInvoice;

const HEADER: [&str; 9] = [
    "kind",
    "type",
    "id",
    "name",
    "teeth",
    "unit_price",
    "quantity",
    "discount_percent",
    "amount",
];

/// 导出发票明细为 CSV：先产品行，再通用服务行
pub fn lines_to_csv(invoice: &RenderedInvoice) -> Result<String, EngineError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for line in &invoice.lines {
        writer.write_record([
            "product".to_string(),
            line.product_type.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            line.product_id.clone(),
            line.name.clone().unwrap_or_default(),
            line.teeth_display.clone(),
            line.unit_price.to_string(),
            line.quantity.to_string(),
            line.discount_percent.to_string(),
            line.amount.to_string(),
        ])?;
    }

    let one = BigDecimal::from(1);
    for service in invoice.common_services.values() {
        writer.write_record([
            "service".to_string(),
            String::new(),
            service.service_id.clone(),
            service.name.clone(),
            format_range(&service.teeth),
            service.unit_price.to_string(),
            one.to_string(),
            service.discount_percent.to_string(),
            service.amount.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| EngineError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}
