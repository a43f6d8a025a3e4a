//! 配置格式识别
//!
//! 格式只由文件名最后一个 `.` 之后的扩展名决定，区分大小写。

use crate::error::LoadError;
use std::fmt;
use std::path::Path;

/// 支持的配置格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    /// dotenv 键值对，所有值都是字符串
    Env,
    /// JSON
    Json,
    /// TOML
    Toml,
    /// YAML（`.yaml` 或 `.yml`）
    Yaml,
}

impl ConfigFormat {
    /// 支持的扩展名
    pub const SUPPORTED_EXTENSIONS: [&'static str; 5] = ["env", "json", "toml", "yaml", "yml"];

    /// 根据扩展名匹配格式
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "env" => Some(ConfigFormat::Env),
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }

    /// 根据文件路径识别格式，不会访问文件系统
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回
    /// * `Result<ConfigFormat, LoadError>` - 识别出的格式，或 `UnsupportedFormat`
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = Self::extension_of(path);
        Self::from_extension(&extension).ok_or(LoadError::UnsupportedFormat { extension })
    }

    /// 文件名中最后一个 `.` 之后的部分
    ///
    /// 与 [`Path::extension`] 不同，`.env` 这样以点开头的文件名也会得到 `env`。
    /// 没有 `.` 时返回空字符串。
    pub fn extension_of(path: &Path) -> String {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());

        name.rsplit_once('.')
            .map(|(_, extension)| extension.to_string())
            .unwrap_or_default()
    }

    /// 格式标签（小写）
    pub fn tag(&self) -> &'static str {
        match self {
            ConfigFormat::Env => "env",
            ConfigFormat::Json => "json",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Env => write!(f, "DOTENV"),
            ConfigFormat::Json => write!(f, "JSON"),
            ConfigFormat::Toml => write!(f, "TOML"),
            ConfigFormat::Yaml => write!(f, "YAML"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("/etc/app/settings.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("sub/.env")).unwrap(),
            ConfigFormat::Env
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("a.b.json")).unwrap(),
            ConfigFormat::Json
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let err = ConfigFormat::from_path(Path::new("config.ini")).unwrap_err();
        match err {
            LoadError::UnsupportedFormat { extension } => assert_eq!(extension, "ini"),
            other => panic!("意外的错误: {other:?}"),
        }
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        assert!(ConfigFormat::from_path(Path::new("CONFIG.TOML")).is_err());
    }

    #[test]
    fn test_no_extension() {
        assert_eq!(ConfigFormat::extension_of(Path::new("dir.d/config")), "");
        assert!(ConfigFormat::from_path(Path::new("config")).is_err());
    }

    #[test]
    fn test_display_and_tag() {
        assert_eq!(ConfigFormat::Env.to_string(), "DOTENV");
        assert_eq!(ConfigFormat::Yaml.tag(), "yaml");
        for extension in ConfigFormat::SUPPORTED_EXTENSIONS {
            assert!(ConfigFormat::from_extension(extension).is_some());
        }
    }
}
