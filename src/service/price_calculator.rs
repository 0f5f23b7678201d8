use bigdecimal::{BigDecimal, Zero};

use crate::config::EngineConfig;
use crate::models::money::{percent_of, round_to, to_decimal};
use crate::models::{
    CommonService, DiscountKind, InvoiceDiscount, InvoiceTotals, MergedProduct, TaxRates,
    TaxSource,
};

/// 价格计算器
/// 行金额 -> 小计 -> 发票折扣 -> 税 -> 总计
#[derive(Debug, Clone, Copy)]
pub struct PriceCalculator {
    money_scale: i64,
}

impl Default for PriceCalculator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl PriceCalculator {
    pub fn new(config: &EngineConfig) -> Self {
        Self { money_scale: config.money_scale }
    }

    fn round(&self, value: &BigDecimal) -> BigDecimal {
        round_to(value, self.money_scale)
    }

    /// 行金额 = 单价 × 数量 × (1 - 行折扣%/100)
    pub fn line_amount(&self, product: &MergedProduct) -> BigDecimal {
        let price = &product.discounted_price;
        let gross = &price.price * &product.quantity;
        let net = &gross - percent_of(&gross, &price.discount_or_zero());
        self.round(&net)
    }

    /// 发票合计
    ///
    /// 固定金额折扣不做上限截断，可能超过小计而得到负数。
    /// 税额来源按顺序取第一个可用的：客户税率、发票税率、应税服务各自税率，否则为 0。
    pub fn compute_totals(
        &self,
        lines: &[MergedProduct],
        services: &[&CommonService],
        discount: Option<&InvoiceDiscount>,
        rates: TaxRates,
    ) -> InvoiceTotals {
        let line_sum: BigDecimal = lines.iter().map(|p| self.line_amount(p)).sum();
        let service_sum: BigDecimal = services.iter().map(|s| s.amount.clone()).sum();
        let subtotal = line_sum + service_sum;

        let discount_amount = match discount {
            Some(d) => {
                let value = to_decimal(d.value);
                match d.kind {
                    DiscountKind::Percentage => self.round(&percent_of(&subtotal, &value)),
                    DiscountKind::Fixed => self.round(&value),
                }
            }
            None => BigDecimal::zero(),
        };

        let discounted = &subtotal - &discount_amount;
        let (tax_amount, tax_source) = self.compute_tax(&discounted, services, rates);
        let grand_total = &discounted + &tax_amount;

        InvoiceTotals {
            subtotal: self.round(&subtotal),
            discount_amount,
            tax_amount,
            grand_total: self.round(&grand_total),
            tax_source,
        }
    }

    /// 税额
    ///
    /// 按税率计税时，税基 = 折后小计 - 非应税服务金额；产品行始终计税。
    /// 没有客户/发票税率时，只对应税服务按其自身税率计税；都没有则为 0。
    fn compute_tax(
        &self,
        discounted: &BigDecimal,
        services: &[&CommonService],
        rates: TaxRates,
    ) -> (BigDecimal, TaxSource) {
        let finite = |r: Option<f64>| r.filter(|v| v.is_finite());

        let exempt: BigDecimal = services
            .iter()
            .filter(|s| !s.is_taxable)
            .map(|s| s.amount.clone())
            .sum();
        let rate_base = discounted - &exempt;

        if let Some(rate) = finite(rates.client_rate) {
            let tax = percent_of(&rate_base, &to_decimal(Some(rate)));
            return (self.round(&tax), TaxSource::ClientRate);
        }
        if let Some(rate) = finite(rates.invoice_rate) {
            let tax = percent_of(&rate_base, &to_decimal(Some(rate)));
            return (self.round(&tax), TaxSource::InvoiceRate);
        }

        let taxed: Vec<&&CommonService> = services
            .iter()
            .filter(|s| s.is_taxable && s.tax_rate > BigDecimal::zero())
            .collect();
        if taxed.is_empty() {
            return (BigDecimal::zero(), TaxSource::None);
        }
        let tax: BigDecimal = taxed
            .iter()
            .map(|s| percent_of(&s.amount, &s.tax_rate))
            .sum();
        (self.round(&tax), TaxSource::TaxableServices)
    }
}
