use bigdecimal::{BigDecimal, RoundingMode, Zero};
use std::str::FromStr;

/// 金额保留位数
pub const MONEY_SCALE: i64 = 2;

/// 源数据数值 -> BigDecimal
/// 缺失 / NaN / 无穷大一律按 0 处理，保证 NaN 不会进入合计
/// 经由最短十进制表示转换，避免 0.1 变成 0.1000000000000000055...
pub fn to_decimal(value: Option<f64>) -> BigDecimal {
    value
        .filter(|v| v.is_finite())
        .and_then(|v| BigDecimal::from_str(&v.to_string()).ok())
        .unwrap_or_else(BigDecimal::zero)
}

/// 四舍五入 (half-up) 到指定小数位
pub fn round_to(value: &BigDecimal, scale: i64) -> BigDecimal {
    value.with_scale_round(scale, RoundingMode::HalfUp)
}

/// 百分比 -> 比例，例如 15 -> 0.15
pub fn percent_of(value: &BigDecimal, percent: &BigDecimal) -> BigDecimal {
    value * percent / BigDecimal::from(100)
}
