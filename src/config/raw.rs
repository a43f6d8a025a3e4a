//! 解析器产出的原始值

use crate::config::ConfigFormat;
use crate::tree::ConfigValue;
use indexmap::IndexMap;
use serde::Serialize;

/// 尚未提升的原始解析结果，保留各解析器自己的值类型
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    /// dotenv 键值对
    Env(IndexMap<String, String>),
    /// JSON 值
    Json(serde_json::Value),
    /// TOML 根表
    Toml(toml::Table),
    /// YAML 值
    Yaml(serde_yaml::Value),
}

impl RawValue {
    /// 产出该值的格式
    pub fn format(&self) -> ConfigFormat {
        match self {
            RawValue::Env(_) => ConfigFormat::Env,
            RawValue::Json(_) => ConfigFormat::Json,
            RawValue::Toml(_) => ConfigFormat::Toml,
            RawValue::Yaml(_) => ConfigFormat::Yaml,
        }
    }

    /// 提升为配置树，原始值保持不变
    pub fn lift(&self) -> ConfigValue {
        ConfigValue::from(self.clone())
    }
}

impl From<RawValue> for ConfigValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Env(vars) => vars.into(),
            RawValue::Json(value) => value.into(),
            RawValue::Toml(table) => table.into(),
            RawValue::Yaml(value) => value.into(),
        }
    }
}
