use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::models::money::MONEY_SCALE;

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// 计算引擎选项
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 自由比色备注是否参与合并键 (默认不参与，只保留第一条的备注)
    pub custom_shade_in_merge_key: bool,
    /// 合并后按 price/discount 重算 total；false 时保留逐条求和的 total
    pub recompute_merged_total: bool,
    /// 金额小数位
    pub money_scale: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            custom_shade_in_merge_key: false,
            recompute_merged_total: true,
            money_scale: MONEY_SCALE,
        }
    }
}

impl AppConfig {
    /// 加载配置：默认值 -> config/default.toml (可选) -> DENTAL__ 前缀环境变量
    /// 例如 DENTAL__SERVER__PORT=9000, DENTAL__ENGINE__RECOMPUTE_MERGED_TOTAL=false
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();
        Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default(
                "engine.custom_shade_in_merge_key",
                defaults.engine.custom_shade_in_merge_key,
            )?
            .set_default(
                "engine.recompute_merged_total",
                defaults.engine.recompute_merged_total,
            )?
            .set_default("engine.money_scale", defaults.engine.money_scale)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                Environment::with_prefix("DENTAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_preserve_source_merge_behaviour() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert!(!cfg.engine.custom_shade_in_merge_key);
        assert!(cfg.engine.recompute_merged_total);
        assert_eq!(cfg.engine.money_scale, 2);
    }

    #[test]
    fn partial_engine_section_fills_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"custom_shade_in_merge_key": true}"#).unwrap();
        assert!(cfg.custom_shade_in_merge_key);
        assert!(cfg.recompute_merged_total);
    }
}
