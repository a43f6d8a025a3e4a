//! 统一配置树的节点类型
//!
//! 所有格式解析出的数据都会被提升为 [`ConfigValue`]。映射节点只有
//! [`ConfigMap`] 一种表示，因此树中任意深度（包括序列内部）的映射都
//! 支持同样的按键访问。

use crate::error::AccessError;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// 配置值的类型标签，用于错误信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Sequence,
    Mapping,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Null => write!(f, "null"),
            ValueKind::Bool => write!(f, "bool"),
            ValueKind::Integer => write!(f, "integer"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::String => write!(f, "string"),
            ValueKind::Sequence => write!(f, "sequence"),
            ValueKind::Mapping => write!(f, "mapping"),
        }
    }
}

/// 配置树节点
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// 空值
    #[default]
    Null,
    /// 布尔值
    Bool(bool),
    /// 整数
    Integer(i64),
    /// 浮点数
    Float(f64),
    /// 字符串
    String(String),
    /// 有序列表
    Sequence(Vec<ConfigValue>),
    /// 有序映射
    Mapping(ConfigMap),
}

impl ConfigValue {
    /// 将任意可转换的值提升为配置树
    ///
    /// 映射会变成 [`ConfigMap`]，序列中的每个元素也会被递归提升。
    /// 对已经是 `ConfigValue` 的值再次提升不会产生任何变化。
    pub fn lift<V: Into<ConfigValue>>(value: V) -> ConfigValue {
        value.into()
    }

    /// 创建空映射节点
    pub fn mapping() -> Self {
        ConfigValue::Mapping(ConfigMap::new())
    }

    /// 值的类型标签
    pub fn kind(&self) -> ValueKind {
        match self {
            ConfigValue::Null => ValueKind::Null,
            ConfigValue::Bool(_) => ValueKind::Bool,
            ConfigValue::Integer(_) => ValueKind::Integer,
            ConfigValue::Float(_) => ValueKind::Float,
            ConfigValue::String(_) => ValueKind::String,
            ConfigValue::Sequence(_) => ValueKind::Sequence,
            ConfigValue::Mapping(_) => ValueKind::Mapping,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// 只返回浮点节点，整数不会被转换
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<ConfigValue>> {
        match self {
            ConfigValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut ConfigMap> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// 按键读取映射中的值
    ///
    /// # 错误
    /// * `MissingVariable` - 键不存在
    /// * `TypeMismatch` - 当前节点不是映射
    pub fn get(&self, key: &str) -> Result<&ConfigValue, AccessError> {
        self.expect_mapping(key)?.get(key)
    }

    /// 按键获取可变引用
    pub fn get_mut(&mut self, key: &str) -> Result<&mut ConfigValue, AccessError> {
        self.expect_mapping_mut(key)?.get_mut(key)
    }

    /// 写入键值，写入前会提升新值
    ///
    /// 已有的键保持原位置，新键追加到末尾。返回被覆盖的旧值。
    pub fn set<K, V>(&mut self, key: K, value: V) -> Result<Option<ConfigValue>, AccessError>
    where
        K: Into<String>,
        V: Into<ConfigValue>,
    {
        let key = key.into();
        let map = self.expect_mapping_mut(&key)?;
        Ok(map.set(key, value))
    }

    /// 删除键，键不存在时返回错误
    pub fn delete(&mut self, key: &str) -> Result<ConfigValue, AccessError> {
        self.expect_mapping_mut(key)?.delete(key)
    }

    fn expect_mapping(&self, key: &str) -> Result<&ConfigMap, AccessError> {
        match self {
            ConfigValue::Mapping(map) => Ok(map),
            other => Err(AccessError::TypeMismatch {
                key: key.to_string(),
                found: other.kind(),
            }),
        }
    }

    fn expect_mapping_mut(&mut self, key: &str) -> Result<&mut ConfigMap, AccessError> {
        match self {
            ConfigValue::Mapping(map) => Ok(map),
            other => Err(AccessError::TypeMismatch {
                key: key.to_string(),
                found: other.kind(),
            }),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => write!(f, "null"),
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Integer(i) => write!(f, "{i}"),
            ConfigValue::Float(x) => write!(f, "{x:?}"),
            ConfigValue::String(s) => write!(f, "{s}"),
            ConfigValue::Sequence(_) | ConfigValue::Mapping(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{json}")
            }
        }
    }
}

/// 有序映射节点
///
/// 键唯一，迭代顺序就是插入顺序。覆盖已有的键不会改变其位置。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigMap {
    entries: IndexMap<String, ConfigValue>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// 按键读取
    pub fn get(&self, key: &str) -> Result<&ConfigValue, AccessError> {
        self.entries
            .get(key)
            .ok_or_else(|| AccessError::MissingVariable {
                key: key.to_string(),
            })
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut ConfigValue, AccessError> {
        self.entries
            .get_mut(key)
            .ok_or_else(|| AccessError::MissingVariable {
                key: key.to_string(),
            })
    }

    /// 写入键值并返回旧值
    pub fn set<K, V>(&mut self, key: K, value: V) -> Option<ConfigValue>
    where
        K: Into<String>,
        V: Into<ConfigValue>,
    {
        self.entries.insert(key.into(), ConfigValue::lift(value))
    }

    /// 删除键，其余键的相对顺序不变
    pub fn delete(&mut self, key: &str) -> Result<ConfigValue, AccessError> {
        self.entries
            .shift_remove(key)
            .ok_or_else(|| AccessError::MissingVariable {
                key: key.to_string(),
            })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ConfigValue> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, ConfigValue> {
        self.entries.iter_mut()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, ConfigValue> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, ConfigValue> {
        self.entries.values()
    }
}

impl<'a> IntoIterator for &'a ConfigMap {
    type Item = (&'a String, &'a ConfigValue);
    type IntoIter = indexmap::map::Iter<'a, String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for ConfigMap {
    type Item = (String, ConfigValue);
    type IntoIter = indexmap::map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigMap
where
    K: Into<String>,
    V: Into<ConfigValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ConfigMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for ConfigMap
where
    K: Into<String>,
    V: Into<ConfigValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> ConfigMap {
        [("ip", "10.0.0.1"), ("dc", "eqdc10")].into_iter().collect()
    }

    #[test]
    fn test_get_missing_key() {
        let map = sample_map();
        let err = map.get("port").unwrap_err();
        assert_eq!(
            err,
            AccessError::MissingVariable {
                key: "port".to_string()
            }
        );
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut map = sample_map();
        map.set("extra", 1);
        let old = map.set("ip", "10.0.0.9");

        assert_eq!(old, Some(ConfigValue::String("10.0.0.1".to_string())));
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["ip", "dc", "extra"]);
        assert_eq!(map.get("ip").unwrap().as_str(), Some("10.0.0.9"));
    }

    #[test]
    fn test_delete_is_strict() {
        let mut map = sample_map();
        assert!(map.delete("ip").is_ok());
        assert!(matches!(
            map.delete("ip"),
            Err(AccessError::MissingVariable { .. })
        ));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_delete_keeps_order_of_rest() {
        let mut map: ConfigMap = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        map.delete("a").unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn test_get_on_scalar_is_type_mismatch() {
        let value = ConfigValue::String("eqdc10".to_string());
        let err = value.get("dc").unwrap_err();
        assert_eq!(
            err,
            AccessError::TypeMismatch {
                key: "dc".to_string(),
                found: ValueKind::String,
            }
        );
    }

    #[test]
    fn test_set_lifts_nested_mapping() {
        let mut root = ConfigValue::mapping();
        let nested: ConfigMap = [("port", 8001)].into_iter().collect();
        root.set("servers", vec![ConfigValue::Mapping(nested)]).unwrap();

        let servers = root.get("servers").unwrap().as_sequence().unwrap();
        assert_eq!(servers[0].get("port").unwrap().as_i64(), Some(8001));
    }

    #[test]
    fn test_set_on_sequence_is_type_mismatch() {
        let mut value = ConfigValue::lift(vec![1, 2]);
        assert!(matches!(
            value.set("x", 1),
            Err(AccessError::TypeMismatch {
                found: ValueKind::Sequence,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_containers_are_values() {
        let value = ConfigValue::lift(ConfigMap::new());
        assert!(value.as_mapping().unwrap().is_empty());
        assert_eq!(value.to_string(), "{}");

        let value = ConfigValue::Sequence(Vec::new());
        assert_eq!(value.to_string(), "[]");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ConfigValue::String("TOML Example".into()).to_string(),
            "TOML Example"
        );
        assert_eq!(ConfigValue::Float(5.0).to_string(), "5.0");
        assert_eq!(ConfigValue::Null.to_string(), "null");

        let map: ConfigMap = [("ip", "10.0.0.1")].into_iter().collect();
        assert_eq!(ConfigValue::Mapping(map).to_string(), r#"{"ip":"10.0.0.1"}"#);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let map = sample_map();
        let first: Vec<_> = map.iter().map(|(k, _)| k.clone()).collect();
        let second: Vec<_> = (&map).into_iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(first, second);
    }
}
