//! 路径解析
//!
//! 支持 `"servers.alpha.ip"` 形式的点分路径，或预先拆分好的段列表。
//! 解析从左到右逐段进行，失败时错误只指出出错的那一段。

use super::value::{ConfigValue, ValueKind};
use crate::error::AccessError;
use std::fmt;
use std::str::FromStr;

/// 由映射键组成的有序路径
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ConfigPath {
    segments: Vec<String>,
}

impl ConfigPath {
    /// 指向根节点的空路径
    pub fn root() -> Self {
        Self::default()
    }

    /// 解析点分路径
    ///
    /// 空字符串表示根路径；`"a..b"`、`".a"`、`"a."` 含空段，返回 `InvalidPath`。
    pub fn parse(expr: &str) -> Result<Self, AccessError> {
        if expr.is_empty() {
            return Ok(Self::root());
        }

        let segments: Vec<String> = expr.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(AccessError::InvalidPath {
                path: expr.to_string(),
                reason: "路径中存在空段",
            });
        }

        Ok(Self { segments })
    }

    /// 从段列表构造路径，段内容不做拆分，可以包含 `.`
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// 追加一段
    pub fn push<S: Into<String>>(&mut self, segment: S) {
        self.segments.push(segment.into());
    }

    /// 拆分为父路径和最后一段
    pub fn split_last(&self) -> Option<(&[String], &str)> {
        self.segments
            .split_last()
            .map(|(last, parent)| (parent, last.as_str()))
    }
}

impl FromStr for ConfigPath {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// 可以转换为 [`ConfigPath`] 的类型
///
/// 字符串按点分语法解析，段列表原样使用。
pub trait IntoConfigPath {
    fn into_config_path(self) -> Result<ConfigPath, AccessError>;
}

impl IntoConfigPath for ConfigPath {
    fn into_config_path(self) -> Result<ConfigPath, AccessError> {
        Ok(self)
    }
}

impl IntoConfigPath for &ConfigPath {
    fn into_config_path(self) -> Result<ConfigPath, AccessError> {
        Ok(self.clone())
    }
}

impl IntoConfigPath for &str {
    fn into_config_path(self) -> Result<ConfigPath, AccessError> {
        ConfigPath::parse(self)
    }
}

impl IntoConfigPath for String {
    fn into_config_path(self) -> Result<ConfigPath, AccessError> {
        ConfigPath::parse(&self)
    }
}

impl IntoConfigPath for &String {
    fn into_config_path(self) -> Result<ConfigPath, AccessError> {
        ConfigPath::parse(self)
    }
}

impl IntoConfigPath for &[&str] {
    fn into_config_path(self) -> Result<ConfigPath, AccessError> {
        Ok(ConfigPath::from_segments(self.iter().copied()))
    }
}

impl IntoConfigPath for &[String] {
    fn into_config_path(self) -> Result<ConfigPath, AccessError> {
        Ok(ConfigPath::from_segments(self.iter().cloned()))
    }
}

impl<const N: usize> IntoConfigPath for [&str; N] {
    fn into_config_path(self) -> Result<ConfigPath, AccessError> {
        Ok(ConfigPath::from_segments(self))
    }
}

impl<const N: usize> IntoConfigPath for &[&str; N] {
    fn into_config_path(self) -> Result<ConfigPath, AccessError> {
        Ok(ConfigPath::from_segments(self.iter().copied()))
    }
}

impl IntoConfigPath for Vec<&str> {
    fn into_config_path(self) -> Result<ConfigPath, AccessError> {
        Ok(ConfigPath::from_segments(self))
    }
}

impl IntoConfigPath for Vec<String> {
    fn into_config_path(self) -> Result<ConfigPath, AccessError> {
        Ok(ConfigPath::from_segments(self))
    }
}

/// 路径解析器
///
/// 默认只沿映射键前进。开启 `sequence_indices` 后，数字段可以按位置进入序列。
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver {
    sequence_indices: bool,
}

impl PathResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 是否允许数字段索引序列
    pub fn with_sequence_indices(mut self, enabled: bool) -> Self {
        self.sequence_indices = enabled;
        self
    }

    /// 解析路径并返回目标节点
    ///
    /// # 参数
    /// * `root` - 根节点
    /// * `path` - 点分字符串或段列表
    ///
    /// # 返回
    /// * `Result<&ConfigValue, AccessError>` - 目标节点，或第一个失败段的错误
    pub fn resolve<'a, P: IntoConfigPath>(
        &self,
        root: &'a ConfigValue,
        path: P,
    ) -> Result<&'a ConfigValue, AccessError> {
        let path = path.into_config_path()?;
        path.segments()
            .iter()
            .try_fold(root, |node, segment| self.step(node, segment))
    }

    /// 解析路径并返回目标节点的可变引用
    pub fn resolve_mut<'a, P: IntoConfigPath>(
        &self,
        root: &'a mut ConfigValue,
        path: P,
    ) -> Result<&'a mut ConfigValue, AccessError> {
        let path = path.into_config_path()?;
        let mut node = root;
        for segment in path.segments() {
            node = self.step_mut(node, segment)?;
        }
        Ok(node)
    }

    /// 按路径写入，父路径必须已经存在
    pub fn set<P, V>(
        &self,
        root: &mut ConfigValue,
        path: P,
        value: V,
    ) -> Result<Option<ConfigValue>, AccessError>
    where
        P: IntoConfigPath,
        V: Into<ConfigValue>,
    {
        let path = path.into_config_path()?;
        let (parent, last) = split_for_write(&path)?;
        let target = self.resolve_mut(root, parent)?;

        match target {
            ConfigValue::Sequence(items) if self.sequence_indices => {
                let slot = sequence_slot(items, last)?;
                Ok(Some(std::mem::replace(slot, ConfigValue::lift(value))))
            }
            other => other.set(last, value),
        }
    }

    /// 按路径删除，目标不存在时返回 `MissingVariable`
    pub fn delete<P: IntoConfigPath>(
        &self,
        root: &mut ConfigValue,
        path: P,
    ) -> Result<ConfigValue, AccessError> {
        let path = path.into_config_path()?;
        let (parent, last) = split_for_write(&path)?;
        let target = self.resolve_mut(root, parent)?;

        match target {
            ConfigValue::Sequence(items) if self.sequence_indices => {
                let index = parse_index(items, last)?;
                Ok(items.remove(index))
            }
            other => other.delete(last),
        }
    }

    fn step<'a>(
        &self,
        node: &'a ConfigValue,
        segment: &str,
    ) -> Result<&'a ConfigValue, AccessError> {
        match node {
            ConfigValue::Mapping(map) => map.get(segment),
            ConfigValue::Sequence(items) if self.sequence_indices => {
                let index = parse_index(items, segment)?;
                Ok(&items[index])
            }
            other => Err(AccessError::TypeMismatch {
                key: segment.to_string(),
                found: other.kind(),
            }),
        }
    }

    fn step_mut<'a>(
        &self,
        node: &'a mut ConfigValue,
        segment: &str,
    ) -> Result<&'a mut ConfigValue, AccessError> {
        let found = node.kind();
        match node {
            ConfigValue::Mapping(map) => map.get_mut(segment),
            ConfigValue::Sequence(items) if self.sequence_indices => sequence_slot(items, segment),
            _ => Err(AccessError::TypeMismatch {
                key: segment.to_string(),
                found,
            }),
        }
    }
}

fn split_for_write(path: &ConfigPath) -> Result<(&[String], &str), AccessError> {
    path.split_last().ok_or_else(|| AccessError::InvalidPath {
        path: String::new(),
        reason: "写入或删除需要至少一段路径",
    })
}

/// 把段解析为序列下标，越界视为变量不存在
fn parse_index(items: &[ConfigValue], segment: &str) -> Result<usize, AccessError> {
    let index = segment
        .parse::<usize>()
        .map_err(|_| AccessError::TypeMismatch {
            key: segment.to_string(),
            found: ValueKind::Sequence,
        })?;

    if index < items.len() {
        Ok(index)
    } else {
        Err(AccessError::MissingVariable {
            key: segment.to_string(),
        })
    }
}

fn sequence_slot<'a>(
    items: &'a mut [ConfigValue],
    segment: &str,
) -> Result<&'a mut ConfigValue, AccessError> {
    let index = parse_index(items, segment)?;
    Ok(&mut items[index])
}

impl ConfigValue {
    /// 按路径读取（不索引序列）
    pub fn resolve<P: IntoConfigPath>(&self, path: P) -> Result<&ConfigValue, AccessError> {
        PathResolver::new().resolve(self, path)
    }

    /// 按路径获取可变引用（不索引序列）
    pub fn resolve_mut<P: IntoConfigPath>(
        &mut self,
        path: P,
    ) -> Result<&mut ConfigValue, AccessError> {
        PathResolver::new().resolve_mut(self, path)
    }

    /// 按路径写入，父路径必须存在
    pub fn set_path<P, V>(&mut self, path: P, value: V) -> Result<Option<ConfigValue>, AccessError>
    where
        P: IntoConfigPath,
        V: Into<ConfigValue>,
    {
        PathResolver::new().set(self, path, value)
    }

    /// 按路径删除
    pub fn delete_path<P: IntoConfigPath>(&mut self, path: P) -> Result<ConfigValue, AccessError> {
        PathResolver::new().delete(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tree() -> ConfigValue {
        ConfigValue::from(json!({
            "title": "TOML Example",
            "servers": {
                "alpha": {"ip": "10.0.0.1", "dc": "eqdc10"},
                "beta": {"ip": "10.0.0.2", "dc": "eqdc10"}
            },
            "clients": {"data": [["gamma", "delta"], [1, 2]]},
            "dotted.key": {"inner": true}
        }))
    }

    #[test]
    fn test_parse_dotted() {
        let path = ConfigPath::parse("servers.alpha.ip").unwrap();
        assert_eq!(path.segments(), &["servers", "alpha", "ip"]);
        assert_eq!(path.to_string(), "servers.alpha.ip");
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        for expr in ["a..b", ".a", "a.", "."] {
            assert!(
                matches!(
                    ConfigPath::parse(expr),
                    Err(AccessError::InvalidPath { .. })
                ),
                "{expr} 应该被拒绝"
            );
        }
    }

    #[test]
    fn test_empty_path_returns_root() {
        let tree = sample_tree();
        assert_eq!(tree.resolve("").unwrap(), &tree);
        assert_eq!(tree.resolve(ConfigPath::root()).unwrap(), &tree);
    }

    #[test]
    fn test_missing_segment_names_that_segment() {
        let tree = sample_tree();
        let err = tree.resolve("servers.gamma.ip").unwrap_err();
        assert_eq!(
            err,
            AccessError::MissingVariable {
                key: "gamma".to_string()
            }
        );
    }

    #[test]
    fn test_dotted_and_segments_agree() {
        let tree = sample_tree();
        let dotted = tree.resolve("servers.beta.dc").unwrap();
        let listed = tree.resolve(["servers", "beta", "dc"]).unwrap();
        let owned = tree
            .resolve(vec!["servers".to_string(), "beta".into(), "dc".into()])
            .unwrap();
        assert_eq!(dotted, listed);
        assert_eq!(dotted, owned);
    }

    #[test]
    fn test_segment_list_reaches_dotted_key() {
        let tree = sample_tree();
        let value = tree.resolve(["dotted.key", "inner"]).unwrap();
        assert_eq!(value.as_bool(), Some(true));
        assert!(tree.resolve("dotted.key.inner").is_err());
    }

    #[test]
    fn test_scalar_in_path_is_type_mismatch() {
        let tree = sample_tree();
        let err = tree.resolve("title.length").unwrap_err();
        assert_eq!(
            err,
            AccessError::TypeMismatch {
                key: "length".to_string(),
                found: ValueKind::String,
            }
        );
    }

    #[test]
    fn test_sequence_not_indexed_by_default() {
        let tree = sample_tree();
        let err = tree.resolve("clients.data.0").unwrap_err();
        assert!(matches!(
            err,
            AccessError::TypeMismatch {
                found: ValueKind::Sequence,
                ..
            }
        ));
    }

    #[test]
    fn test_sequence_indices_when_enabled() {
        let tree = sample_tree();
        let resolver = PathResolver::new().with_sequence_indices(true);

        let value = resolver.resolve(&tree, "clients.data.1.0").unwrap();
        assert_eq!(value.as_i64(), Some(1));

        let err = resolver.resolve(&tree, "clients.data.5").unwrap_err();
        assert_eq!(
            err,
            AccessError::MissingVariable {
                key: "5".to_string()
            }
        );
    }

    #[test]
    fn test_set_path_overwrites_and_appends() {
        let mut tree = sample_tree();
        let old = tree.set_path("servers.alpha.ip", "10.0.0.9").unwrap();
        assert_eq!(old, Some(ConfigValue::from("10.0.0.1")));

        tree.set_path("servers.alpha.port", 8080).unwrap();
        let keys: Vec<&str> = tree
            .resolve("servers.alpha")
            .unwrap()
            .as_mapping()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["ip", "dc", "port"]);
    }

    #[test]
    fn test_set_path_requires_parent() {
        let mut tree = sample_tree();
        let err = tree.set_path("servers.gamma.ip", "10.0.0.3").unwrap_err();
        assert_eq!(
            err,
            AccessError::MissingVariable {
                key: "gamma".to_string()
            }
        );
    }

    #[test]
    fn test_delete_path() {
        let mut tree = sample_tree();
        let removed = tree.delete_path("servers.beta").unwrap();
        assert_eq!(removed.get("ip").unwrap().as_str(), Some("10.0.0.2"));
        assert!(tree.resolve("servers.beta").is_err());
        assert!(matches!(
            tree.delete_path("servers.beta"),
            Err(AccessError::MissingVariable { .. })
        ));
    }

    #[test]
    fn test_write_with_empty_path_is_invalid() {
        let mut tree = sample_tree();
        assert!(matches!(
            tree.set_path("", 1),
            Err(AccessError::InvalidPath { .. })
        ));
        assert!(matches!(
            tree.delete_path(ConfigPath::root()),
            Err(AccessError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_indexed_writes() {
        let mut tree = sample_tree();
        let resolver = PathResolver::new().with_sequence_indices(true);

        resolver.set(&mut tree, "clients.data.0.1", "epsilon").unwrap();
        assert_eq!(
            resolver.resolve(&tree, "clients.data.0.1").unwrap().as_str(),
            Some("epsilon")
        );

        let removed = resolver.delete(&mut tree, "clients.data.0").unwrap();
        assert_eq!(removed, ConfigValue::lift(["gamma", "epsilon"]));
        assert_eq!(
            tree.resolve("clients.data").unwrap().as_sequence().unwrap().len(),
            1
        );
    }

    #[test]
    fn test_resolve_mut_then_set() {
        let mut tree = sample_tree();
        tree.resolve_mut("servers.alpha").unwrap().set("dc", "eqdc20").unwrap();
        assert_eq!(
            tree.resolve("servers.alpha.dc").unwrap().as_str(),
            Some("eqdc20")
        );
    }

    #[test]
    fn test_resolve_mut_through_scalar_or_sequence_is_type_mismatch() {
        let mut tree = sample_tree();

        assert_eq!(
            tree.resolve_mut("title.length").unwrap_err(),
            AccessError::TypeMismatch {
                key: "length".to_string(),
                found: ValueKind::String
            }
        );
        assert_eq!(
            tree.resolve_mut("clients.data.0").unwrap_err(),
            AccessError::TypeMismatch {
                key: "0".to_string(),
                found: ValueKind::Sequence
            }
        );

        let resolver = PathResolver::new().with_sequence_indices(true);
        let slot = resolver.resolve_mut(&mut tree, "clients.data.0.1").unwrap();
        *slot = ConfigValue::from("epsilon");
        assert_eq!(
            resolver
                .resolve(&tree, "clients.data.0.1")
                .unwrap()
                .as_str(),
            Some("epsilon")
        );
    }
}
