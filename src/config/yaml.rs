//! YAML 文档解析
//!
//! `serde_yaml::Value` 自带的反序列化会拒绝重复键。这里用自定义
//! visitor 构造同样的值：重复键以最后一次为准，位置保持首次出现处，
//! 与 JSON、TOML、dotenv 的行为一致。

use serde::de::{
    self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Number, Value};
use std::fmt;

/// 解析YAML文本
pub(crate) fn from_str(content: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str::<LenientValue>(content).map(|LenientValue(value)| value)
}

/// 允许重复键的 YAML 值
struct LenientValue(Value);

impl<'de> Deserialize<'de> for LenientValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LenientVisitor).map(LenientValue)
    }
}

struct LenientVisitor;

impl<'de> Visitor<'de> for LenientVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any YAML value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        LenientValue::deserialize(deserializer).map(|LenientValue(value)| value)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(Number::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(Number::from(v)))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Value, E> {
        Ok(Value::Number(Number::from(v as f64)))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Value, E> {
        Ok(Value::Number(Number::from(v as f64)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(Number::from(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(LenientValue(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut mapping = Mapping::new();
        while let Some((LenientValue(key), LenientValue(value))) = map.next_entry()? {
            // 重复键覆盖旧值，键的位置不变
            mapping.insert(key, value);
        }
        Ok(Value::Mapping(mapping))
    }

    fn visit_enum<A>(self, data: A) -> Result<Value, A::Error>
    where
        A: EnumAccess<'de>,
    {
        // 带自定义标签的节点
        let (tag, contents): (String, _) = data.variant()?;
        let LenientValue(value) = contents.newtype_variant()?;
        Ok(Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tag),
            value,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_keys_last_wins() {
        let value = from_str("title: first\nother: x\ntitle: second\n").unwrap();
        let mapping = value.as_mapping().unwrap();

        let keys: Vec<&str> = mapping.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, ["title", "other"]);
        assert_eq!(mapping.get("title").and_then(Value::as_str), Some("second"));
    }

    #[test]
    fn test_nested_duplicate_keys() {
        let content = "servers:\n  - ip: 10.0.0.1\n    ip: 10.0.0.9\n";
        let value = from_str(content).unwrap();
        let ip = &value["servers"][0]["ip"];
        assert_eq!(ip.as_str(), Some("10.0.0.9"));
    }

    #[test]
    fn test_scalars_and_tags() {
        let content = "port: 8001\nratio: 0.5\nenabled: true\nmissing: ~\nname: !custom alpha\n";
        let value = from_str(content).unwrap();

        assert_eq!(value["port"].as_i64(), Some(8001));
        assert_eq!(value["ratio"].as_f64(), Some(0.5));
        assert_eq!(value["enabled"].as_bool(), Some(true));
        assert!(value["missing"].is_null());
        match &value["name"] {
            Value::Tagged(tagged) => assert_eq!(tagged.value.as_str(), Some("alpha")),
            other => panic!("应该得到带标签的值: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        assert!(from_str("title: [unclosed\n").is_err());
    }
}
