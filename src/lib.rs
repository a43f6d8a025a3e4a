//! Konfik - 多格式配置读取库
//!
//! 把 TOML、JSON、YAML 和 dotenv 文件读入统一的配置树，支持：
//! - 按扩展名识别格式
//! - 点分路径或段列表访问变量
//! - 原地修改和删除变量
//! - 保留原始解析结果以便原样展示
//!
//! ```no_run
//! use konfik::Konfik;
//!
//! let konfik = Konfik::new("config.toml")?;
//! let ip = konfik.resolve("servers.alpha.ip")?;
//! println!("{ip}");
//! # Ok::<(), konfik::KonfikError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod tree;

// 重新导出主要类型
pub use config::{ConfigFormat, FileLoader, Konfik, RawLoader, RawValue};
pub use error::{AccessError, DecodeError, KonfikError, LoadError, RenderError, Result};
pub use tree::{ConfigMap, ConfigPath, ConfigValue, IntoConfigPath, PathResolver, ValueKind};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
