//! 配置加载器实现
//!
//! 提供按格式分发的文件读取与解析功能

use crate::config::{ConfigFormat, RawValue};
use crate::error::{DecodeError, LoadError};
use indexmap::IndexMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// 原始值加载器trait，定义配置加载接口
pub trait RawLoader {
    /// 读取配置文件文本
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    /// * `format` - 配置格式，用于错误信息
    ///
    /// # 返回
    /// * `Result<String, LoadError>` - 文件内容，文件不存在时为 `MissingConfig`
    fn read(&self, path: &Path, format: ConfigFormat) -> Result<String, LoadError> {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::MissingConfig {
                format,
                path: path.to_path_buf(),
            },
            _ => LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })
    }

    /// 解析配置文本
    ///
    /// # 参数
    /// * `content` - 配置文件内容
    /// * `format` - 配置格式
    ///
    /// # 返回
    /// * `Result<RawValue, LoadError>` - 原始解析结果或解析器错误
    fn decode(&self, content: &str, format: ConfigFormat) -> Result<RawValue, LoadError>;

    /// 从文件加载配置
    fn load(&self, path: &Path, format: ConfigFormat) -> Result<RawValue, LoadError> {
        let content = self.read(path, format)?;
        self.decode(&content, format)
    }
}

/// 基于文件系统的加载器
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl FileLoader {
    /// 创建新的加载器
    pub fn new() -> Self {
        Self
    }

    fn decode_env(content: &str) -> Result<RawValue, DecodeError> {
        // 重复的键以最后一次为准，位置保持首次出现处
        let mut vars = IndexMap::new();
        for item in dotenvy::from_read_iter(content.as_bytes()) {
            let (key, value) = item?;
            vars.insert(key, value);
        }
        Ok(RawValue::Env(vars))
    }

    fn decode_json(content: &str) -> Result<RawValue, DecodeError> {
        Ok(RawValue::Json(serde_json::from_str(content)?))
    }

    fn decode_toml(content: &str) -> Result<RawValue, DecodeError> {
        Ok(RawValue::Toml(toml::from_str(content)?))
    }

    fn decode_yaml(content: &str) -> Result<RawValue, DecodeError> {
        Ok(RawValue::Yaml(super::yaml::from_str(content)?))
    }
}

impl RawLoader for FileLoader {
    fn decode(&self, content: &str, format: ConfigFormat) -> Result<RawValue, LoadError> {
        let raw = match format {
            ConfigFormat::Env => Self::decode_env(content),
            ConfigFormat::Json => Self::decode_json(content),
            ConfigFormat::Toml => Self::decode_toml(content),
            ConfigFormat::Yaml => Self::decode_yaml(content),
        }?;

        log::debug!("成功解析 {format} 配置内容");
        Ok(raw)
    }

    fn load(&self, path: &Path, format: ConfigFormat) -> Result<RawValue, LoadError> {
        let content = self.read(path, format)?;
        let raw = self.decode(&content, format)?;

        log::info!("成功加载配置文件: {}", path.display());
        Ok(raw)
    }
}

/// 获取默认配置文件路径
///
/// 当前目录存在 `config.toml` 时使用它，否则使用用户配置目录下的
/// `konfik/config.toml`。
pub fn get_default_config_path() -> PathBuf {
    let local = PathBuf::from("config.toml");
    if local.exists() {
        return local;
    }

    dirs::config_dir()
        .map(|config_dir| config_dir.join("konfik").join("config.toml"))
        .unwrap_or(local)
}
