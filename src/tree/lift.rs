//! 提升转换
//!
//! 把各解析器产出的原始值（以及普通 Rust 值）递归转换为 [`ConfigValue`]。

use super::value::{ConfigMap, ConfigValue};
use indexmap::IndexMap;
use std::collections::BTreeMap;

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ConfigValue {
                fn from(value: $ty) -> Self {
                    ConfigValue::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for ConfigValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => ConfigValue::Integer(i),
            Err(_) => ConfigValue::Float(value as f64),
        }
    }
}

impl From<f32> for ConfigValue {
    fn from(value: f32) -> Self {
        ConfigValue::Float(f64::from(value))
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<&String> for ConfigValue {
    fn from(value: &String) -> Self {
        ConfigValue::String(value.clone())
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConfigValue::Null, Into::into)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ConfigValue>, const N: usize> From<[T; N]> for ConfigValue {
    fn from(items: [T; N]) -> Self {
        ConfigValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ConfigValue>> FromIterator<T> for ConfigValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        ConfigValue::Sequence(iter.into_iter().map(Into::into).collect())
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(map: ConfigMap) -> Self {
        ConfigValue::Mapping(map)
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> From<IndexMap<K, V>> for ConfigValue {
    fn from(map: IndexMap<K, V>) -> Self {
        ConfigValue::Mapping(map.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> From<BTreeMap<K, V>> for ConfigValue {
    fn from(map: BTreeMap<K, V>) -> Self {
        ConfigValue::Mapping(map.into_iter().collect())
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => ConfigValue::Null,
            Value::Bool(b) => ConfigValue::Bool(b),
            Value::Number(n) => n
                .as_i64()
                .map(ConfigValue::Integer)
                .or_else(|| n.as_f64().map(ConfigValue::Float))
                .unwrap_or(ConfigValue::Null),
            Value::String(s) => ConfigValue::String(s),
            Value::Array(items) => items.into_iter().collect(),
            Value::Object(map) => ConfigValue::Mapping(map.into_iter().collect()),
        }
    }
}

impl From<toml::Value> for ConfigValue {
    fn from(value: toml::Value) -> Self {
        use toml::Value;

        match value {
            Value::String(s) => ConfigValue::String(s),
            Value::Integer(i) => ConfigValue::Integer(i),
            Value::Float(f) => ConfigValue::Float(f),
            Value::Boolean(b) => ConfigValue::Bool(b),
            // 日期时间没有对应的节点类型，保留 RFC 3339 文本
            Value::Datetime(dt) => ConfigValue::String(dt.to_string()),
            Value::Array(items) => items.into_iter().collect(),
            Value::Table(table) => table.into(),
        }
    }
}

impl From<toml::Table> for ConfigValue {
    fn from(table: toml::Table) -> Self {
        ConfigValue::Mapping(table.into_iter().collect())
    }
}

impl From<serde_yaml::Value> for ConfigValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;

        match value {
            Value::Null => ConfigValue::Null,
            Value::Bool(b) => ConfigValue::Bool(b),
            Value::Number(n) => n
                .as_i64()
                .map(ConfigValue::Integer)
                .or_else(|| n.as_f64().map(ConfigValue::Float))
                .unwrap_or(ConfigValue::Null),
            Value::String(s) => ConfigValue::String(s),
            Value::Sequence(items) => items.into_iter().collect(),
            Value::Mapping(map) => ConfigValue::Mapping(
                map.into_iter()
                    .map(|(key, value)| (yaml_key(key), value))
                    .collect(),
            ),
            Value::Tagged(tagged) => tagged.value.into(),
        }
    }
}

/// YAML 允许非字符串键，统一转成文本
fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => ConfigValue::from(other).to_string(),
    }
}
