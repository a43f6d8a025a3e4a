//! 错误处理模块
//!
//! 定义应用程序的统一错误类型。加载期错误（[`LoadError`]）与访问期错误
//! （[`AccessError`]）是两个互不相交的类型，调用方无需检查字符串即可区分。

use crate::config::ConfigFormat;
use crate::tree::ValueKind;
use std::path::PathBuf;
use thiserror::Error;

/// Konfik 的主要错误类型
#[derive(Error, Debug)]
pub enum KonfikError {
    /// 加载配置文件时的错误
    #[error("加载错误: {0}")]
    Load(#[from] LoadError),

    /// 访问配置变量时的错误
    #[error("访问错误: {0}")]
    Access(#[from] AccessError),

    /// 渲染输出时的错误
    #[error("渲染错误: {0}")]
    Render(#[from] RenderError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 加载期错误，出现时配置对象不会被创建
#[derive(Error, Debug)]
pub enum LoadError {
    /// 配置文件不存在
    #[error("{format} 配置文件不存在: {}", path.display())]
    MissingConfig { format: ConfigFormat, path: PathBuf },

    /// 不支持的文件扩展名
    #[error("不支持的配置类型: '{extension}'")]
    UnsupportedFormat { extension: String },

    /// 文件内容无法按声明的格式解析
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// 读取文件失败（文件不存在以外的原因）
    #[error("读取配置文件失败 {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 解析器错误，保留底层解析器给出的行列信息
#[derive(Error, Debug)]
pub enum DecodeError {
    /// TOML解析失败
    #[error("TOML解析失败: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON解析失败
    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML解析失败
    #[error("YAML解析失败: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// DOTENV解析失败
    #[error("DOTENV解析失败: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

/// 访问期错误，只影响单次调用，配置树仍然可用
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// 请求的键或路径段不存在
    #[error("变量不存在: '{key}'")]
    MissingVariable { key: String },

    /// 在非映射值上按键访问
    #[error("无法在 {found} 类型的值上访问 '{key}'")]
    TypeMismatch { key: String, found: ValueKind },

    /// 路径表达式不合法
    #[error("非法路径 '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },
}

impl AccessError {
    /// 出错的键名（路径错误没有对应的键）
    pub fn key(&self) -> Option<&str> {
        match self {
            AccessError::MissingVariable { key } | AccessError::TypeMismatch { key, .. } => {
                Some(key)
            }
            AccessError::InvalidPath { .. } => None,
        }
    }
}

/// 渲染错误类型
#[derive(Error, Debug)]
pub enum RenderError {
    /// JSON序列化失败
    #[error("JSON序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML序列化失败
    #[error("YAML序列化失败: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// 高亮规则编译失败
    #[error("高亮规则编译失败: {0}")]
    Pattern(#[from] regex::Error),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, KonfikError>;
