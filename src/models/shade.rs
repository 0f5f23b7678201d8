use serde::{Deserialize, Serialize};

/// 单个比色值
/// Catalog: 比色板目录值; Manual: 手工覆盖; Custom: 自由备注
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ShadeValue {
    Catalog(String),
    Manual(String),
    Custom(String),
}

impl ShadeValue {
    /// 显示值
    pub fn resolve(&self) -> &str {
        match self {
            ShadeValue::Catalog(v) | ShadeValue::Manual(v) | ShadeValue::Custom(v) => v,
        }
    }
}

/// 一个比色部位 (occlusal / body / gingival / stump) 的三种来源
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadeSlot {
    pub catalog: Option<String>,
    pub manual: Option<String>,
    pub custom: Option<String>,
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ShadeSlot {
    pub fn new(catalog: Option<String>, manual: Option<String>, custom: Option<String>) -> Self {
        Self { catalog, manual, custom }
    }

    /// 主值：手工覆盖优先于目录值
    fn primary(&self) -> Option<ShadeValue> {
        if let Some(m) = non_blank(&self.manual) {
            return Some(ShadeValue::Manual(m.to_string()));
        }
        non_blank(&self.catalog).map(|c| ShadeValue::Catalog(c.to_string()))
    }

    /// 显示用的值：Manual > Catalog > Custom
    pub fn value(&self) -> Option<ShadeValue> {
        self.primary()
            .or_else(|| non_blank(&self.custom).map(|c| ShadeValue::Custom(c.to_string())))
    }

    /// 合并键中的部分
    /// 默认自由备注不参与合并键，include_custom 为 true 时参与
    pub fn merge_key(&self, include_custom: bool) -> (Option<String>, Option<String>) {
        let primary = self.primary().map(|v| v.resolve().to_string());
        let custom = if include_custom {
            non_blank(&self.custom).map(str::to_string)
        } else {
            None
        };
        (primary, custom)
    }

    /// 打印用字符串: "A2" / "A2 (incisal halo)" / "incisal halo"
    pub fn display(&self) -> Option<String> {
        match (self.primary(), non_blank(&self.custom)) {
            (Some(p), Some(c)) => Some(format!("{} ({})", p.resolve(), c)),
            (Some(p), None) => Some(p.resolve().to_string()),
            (None, Some(c)) => Some(c.to_string()),
            (None, None) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value().is_none()
    }
}

/// 四个部位的比色
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shades {
    pub occlusal: ShadeSlot,
    pub body: ShadeSlot,
    pub gingival: ShadeSlot,
    pub stump: ShadeSlot,
}

/// 比色在合并键中的序列化形式
pub type ShadeKey = [(Option<String>, Option<String>); 4];

impl Shades {
    pub fn merge_key(&self, include_custom: bool) -> ShadeKey {
        [
            self.occlusal.merge_key(include_custom),
            self.body.merge_key(include_custom),
            self.gingival.merge_key(include_custom),
            self.stump.merge_key(include_custom),
        ]
    }

    /// 用于单行显示，例如 "Body: A2, Stump: ND3"
    pub fn summary(&self) -> String {
        [
            ("Occlusal", &self.occlusal),
            ("Body", &self.body),
            ("Gingival", &self.gingival),
            ("Stump", &self.stump),
        ]
        .iter()
        .filter_map(|(label, slot)| slot.display().map(|d| format!("{}: {}", label, d)))
        .collect::<Vec<_>>()
        .join(", ")
    }
}
