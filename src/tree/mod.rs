//! 配置树模块
//!
//! 提供统一的配置值类型、提升转换和路径解析功能

mod lift;
pub mod path;
pub mod value;

// 重新导出主要类型
pub use path::{ConfigPath, IntoConfigPath, PathResolver};
pub use value::{ConfigMap, ConfigValue, ValueKind};
