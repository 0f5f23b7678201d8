use bigdecimal::BigDecimal;
use dental_invoice_rust::models::{ProductType, RenderRequest, ToothSet};
use dental_invoice_rust::{EngineConfig, InvoiceRenderer};
use serde_json::{json, Value};
use std::str::FromStr;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn request(value: Value) -> RenderRequest {
    serde_json::from_value(value).unwrap()
}

fn crown(id: &str, teeth: &[i32], body: &str, price: f64) -> Value {
    json!({
        "id": id,
        "teethProduct": { "type": "Crown", "tooth_number": teeth, "body_shade": body },
        "discounted_price": { "price": price, "discount": 0, "final_price": price, "total": price }
    })
}

#[test]
fn per_tooth_crowns_merge_into_one_line() {
    let req = request(json!({
        "snapshot": { "products": [crown("P1", &[14], "A2", 100.0), crown("P1", &[15], "A2", 100.0)] }
    }));
    let out = InvoiceRenderer::default().render_request(&req);

    let group = &out.groups[&ProductType::Crown];
    assert_eq!(group.products.len(), 1);
    let merged = &group.products[0];
    assert_eq!(merged.tooth_numbers, [14, 15].into_iter().collect::<ToothSet>());
    assert_eq!(merged.discounted_price.price, dec("200"));
    assert_eq!(merged.discounted_price.final_price, dec("200"));
    assert_eq!(merged.discounted_price.total, dec("200"));
    assert_eq!(out.lines[0].teeth_display, "14-15");
    assert_eq!(out.lines[0].shade_summary, "Body: A2");
}

#[test]
fn mixed_case_is_grouped_by_type_in_first_seen_order() {
    let req = request(json!({
        "snapshot": {
            "products": [
                {
                    "id": "IMP",
                    "teethProduct": { "type": "Implant", "tooth_number": [36] },
                    "discounted_price": { "price": 900 }
                },
                crown("P1", &[11], "A1", 250.0),
                {
                    "id": "BR",
                    "teethProduct": { "type": "Bridge", "tooth_number": [24, 26], "pontic_teeth": [25] },
                    "discounted_price": { "price": 600 }
                },
                crown("P1", &[21], "A1", 250.0),
                {
                    "id": "LOST",
                    "teethProduct": { "tooth_number": [48] },
                    "discounted_price": { "price": 10 }
                }
            ]
        }
    }));
    let out = InvoiceRenderer::default().render_request(&req);

    let order: Vec<_> = out.groups.keys().cloned().collect();
    assert_eq!(order, [ProductType::Implant, ProductType::Crown, ProductType::Bridge]);
    assert_eq!(out.groups[&ProductType::Crown].teeth_display, "11-21");
    assert_eq!(out.groups[&ProductType::Bridge].teeth_display, "24, 26");

    let bridge = out.lines.iter().find(|l| l.product_id == "BR").unwrap();
    assert_eq!(bridge.pontic_display, "25");

    // 无类型的产品不进分组，但仍然计价
    assert!(out.groups.values().all(|g| g.products.iter().all(|p| p.product_id != "LOST")));
    assert_eq!(out.totals.subtotal, dec("2010"));
}

#[test]
fn group_teeth_equal_union_of_product_teeth() {
    let req = request(json!({
        "snapshot": {
            "products": [
                crown("P1", &[16, 17], "A2", 1.0),
                crown("P2", &[17, 18], "A3", 1.0),
                crown("P1", &[46], "A3", 1.0)
            ]
        }
    }));
    let out = InvoiceRenderer::default().render_request(&req);
    for group in out.groups.values() {
        let union: ToothSet = group
            .products
            .iter()
            .flat_map(|p| p.tooth_numbers.iter().copied())
            .collect();
        assert_eq!(group.teeth, union);
    }
    assert_eq!(out.groups[&ProductType::Crown].teeth_display, "16-18, 46");
}

#[test]
fn fixed_discount_larger_than_subtotal_goes_negative() {
    let req = request(json!({
        "snapshot": {
            "products": [crown("P1", &[11], "A2", 300.0)],
            "discount": { "type": "fixed", "value": 500 }
        }
    }));
    let out = InvoiceRenderer::default().render_request(&req);
    assert_eq!(out.totals.subtotal, dec("300"));
    assert_eq!(out.totals.discount_amount, dec("500"));
    assert_eq!(out.totals.grand_total, dec("-200") + &out.totals.tax_amount);
    assert_eq!(out.totals.grand_total, dec("-200"));
}

#[test]
fn unknown_common_service_does_not_affect_totals() {
    let base = json!({
        "products": [crown("P1", &[11], "A2", 100.0)],
        "common_services": [{ "services": ["S1"], "teeth": [11] }]
    });
    let catalog = json!([{ "id": "S1", "name": "Rush", "price": 40, "is_taxable": false }]);

    let with_ghost = {
        let mut snap = base.clone();
        snap["common_services"] = json!([
            { "services": ["S1"], "teeth": [11] },
            { "services": ["GHOST"], "teeth": [21] }
        ]);
        snap
    };

    let renderer = InvoiceRenderer::default();
    let plain = renderer.render_request(&request(json!({ "snapshot": base, "catalog": catalog })));
    let ghost = renderer.render_request(&request(json!({ "snapshot": with_ghost, "catalog": catalog })));

    assert_eq!(ghost.common_services.keys().collect::<Vec<_>>(), ["Rush"]);
    assert_eq!(plain.totals, ghost.totals);
    assert_eq!(plain.totals.subtotal, dec("140"));
}

#[test]
fn malformed_numbers_never_produce_nan_totals() {
    let req = request(json!({
        "snapshot": {
            "products": [{
                "id": "P1",
                "teethProduct": { "type": "Crown", "tooth_number": [11] },
                "discounted_price": { "price": null, "discount": null },
                "quantity": null
            }],
            "discount": { "type": "percentage", "value": null },
            "tax_rate": null
        }
    }));
    let out = InvoiceRenderer::default().render_request(&req);
    assert_eq!(out.totals.subtotal, dec("0"));
    assert_eq!(out.totals.discount_amount, dec("0"));
    assert_eq!(out.totals.tax_amount, dec("0"));
    assert_eq!(out.totals.grand_total, dec("0"));
}

#[test]
fn client_tax_rate_overrides_invoice_rate() {
    let req = request(json!({
        "snapshot": {
            "products": [crown("P1", &[11], "A2", 100.0)],
            "discount": { "type": "percentage", "value": 10 },
            "tax_rate": 5,
            "client_tax_rate": 13
        }
    }));
    let out = InvoiceRenderer::default().render_request(&req);
    assert_eq!(out.totals.discount_amount, dec("10"));
    assert_eq!(out.totals.tax_amount, dec("11.70"));
    assert_eq!(out.totals.grand_total, dec("101.70"));
}

#[test]
fn custom_shade_key_option_splits_annotated_lines() {
    let mut annotated = crown("P1", &[12], "A2", 100.0);
    annotated["teethProduct"]["custom_body_shade"] = json!("incisal halo");
    let req = request(json!({
        "snapshot": { "products": [crown("P1", &[11], "A2", 100.0), annotated] }
    }));

    let default_out = InvoiceRenderer::default().render_request(&req);
    assert_eq!(default_out.lines.len(), 1);
    assert_eq!(default_out.lines[0].shade_summary, "Body: A2");

    let keyed = InvoiceRenderer::new(&EngineConfig {
        custom_shade_in_merge_key: true,
        ..Default::default()
    });
    let keyed_out = keyed.render_request(&req);
    assert_eq!(keyed_out.lines.len(), 2);
    assert_eq!(keyed_out.lines[1].shade_summary, "Body: A2 (incisal halo)");
}

#[test]
fn invalid_top_level_input_is_an_error() {
    let renderer = InvoiceRenderer::default();
    assert!(renderer.render_json(r#"{"snapshot": {"products": {}}}"#).is_err());
    assert!(renderer.render_json(r#"{"snapshot": {"products": []}}"#).is_ok());
}

#[test]
fn non_taxable_common_service_is_kept_out_of_the_tax_base() {
    let snapshot = json!({
        "products": [],
        "common_services": [{ "services": ["S1"], "teeth": [11] }],
        "tax_rate": 10
    });
    let renderer = InvoiceRenderer::default();

    let exempt = renderer.render_request(&request(json!({
        "snapshot": snapshot,
        "catalog": [{ "id": "S1", "name": "Model Work", "price": 100, "is_taxable": false }]
    })));
    assert_eq!(exempt.totals.tax_amount, dec("0"));
    assert_eq!(exempt.totals.grand_total, dec("100"));

    let taxable = renderer.render_request(&request(json!({
        "snapshot": snapshot,
        "catalog": [{ "id": "S1", "name": "Model Work", "price": 100, "is_taxable": true }]
    })));
    assert_eq!(taxable.totals.tax_amount, dec("10"));
    assert_eq!(taxable.totals.grand_total, dec("110"));
}
