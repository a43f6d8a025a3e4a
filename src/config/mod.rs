//! 配置管理模块
//!
//! 提供格式识别、配置文件加载以及配置门面

pub mod format;
pub mod konfik;
pub mod loader;
pub mod raw;
mod yaml;

// 重新导出主要类型
pub use format::ConfigFormat;
pub use konfik::Konfik;
pub use loader::{get_default_config_path, FileLoader, RawLoader};
pub use raw::RawValue;
