//! 配置门面
//!
//! [`Konfik`] 负责一个配置源的完整生命周期：识别格式、加载、提升，
//! 并对外提供按路径的读写操作。

use crate::config::loader::{get_default_config_path, FileLoader, RawLoader};
use crate::config::{ConfigFormat, RawValue};
use crate::error::{AccessError, LoadError};
use crate::tree::{ConfigValue, IntoConfigPath, PathResolver};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 已加载的配置
///
/// 构造成功即处于已加载状态，路径和格式不再变化；配置树本身可以原地修改。
/// 需要重新加载时请创建新实例。
#[derive(Debug, Clone)]
pub struct Konfik {
    /// 配置文件路径
    path: PathBuf,
    /// 由扩展名识别的格式
    format: ConfigFormat,
    /// 原始解析结果
    raw: RawValue,
    /// 提升后的配置树
    config: ConfigValue,
}

impl Konfik {
    /// 从文件加载配置
    ///
    /// # 参数
    /// * `path` - 配置文件路径，扩展名决定格式
    ///
    /// # 返回
    /// * `Result<Konfik, LoadError>` - 加载的配置或加载期错误
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Self::with_loader(path, &FileLoader::new())
    }

    /// 从默认路径加载配置
    pub fn from_default_path() -> Result<Self, LoadError> {
        Self::new(get_default_config_path())
    }

    /// 使用指定的加载器加载配置
    ///
    /// 不支持的扩展名会在访问文件之前被拒绝。
    pub fn with_loader<P, L>(path: P, loader: &L) -> Result<Self, LoadError>
    where
        P: AsRef<Path>,
        L: RawLoader + ?Sized,
    {
        let path = path.as_ref().to_path_buf();
        let format = ConfigFormat::from_path(&path)?;

        debug!("加载 {} 配置: {}", format, path.display());
        let raw = loader.load(&path, format)?;
        let config = raw.lift();

        info!("配置已加载: {} ({})", path.display(), format.tag());

        Ok(Self {
            path,
            format,
            raw,
            config,
        })
    }

    /// 配置文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 配置格式
    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    /// 原始解析结果，用于原样展示
    pub fn raw(&self) -> &RawValue {
        &self.raw
    }

    /// 提升后的配置树
    pub fn config(&self) -> &ConfigValue {
        &self.config
    }

    /// 配置树的可变引用
    pub fn config_mut(&mut self) -> &mut ConfigValue {
        &mut self.config
    }

    /// 按路径读取变量
    ///
    /// # 参数
    /// * `path` - 点分字符串（如 `"servers.alpha.ip"`）或段列表
    ///
    /// # 返回
    /// * `Result<&ConfigValue, AccessError>` - 变量值，或第一个失败段的错误
    pub fn resolve<P: IntoConfigPath>(&self, path: P) -> Result<&ConfigValue, AccessError> {
        self.config.resolve(path)
    }

    /// 使用指定解析器读取变量
    pub fn resolve_with<P: IntoConfigPath>(
        &self,
        resolver: &PathResolver,
        path: P,
    ) -> Result<&ConfigValue, AccessError> {
        resolver.resolve(&self.config, path)
    }

    /// 按路径获取可变引用
    pub fn resolve_mut<P: IntoConfigPath>(
        &mut self,
        path: P,
    ) -> Result<&mut ConfigValue, AccessError> {
        self.config.resolve_mut(path)
    }

    /// 按路径写入变量，返回被覆盖的旧值
    ///
    /// 只修改内存中的配置树，不会写回文件，也不会修改原始解析结果。
    pub fn set<P, V>(&mut self, path: P, value: V) -> Result<Option<ConfigValue>, AccessError>
    where
        P: IntoConfigPath,
        V: Into<ConfigValue>,
    {
        self.config.set_path(path, value)
    }

    /// 按路径删除变量
    pub fn delete<P: IntoConfigPath>(&mut self, path: P) -> Result<ConfigValue, AccessError> {
        self.config.delete_path(path)
    }

    /// 重新读取配置文件的原始文本
    pub fn literal(&self) -> Result<String, LoadError> {
        FileLoader::new().read(&self.path, self.format)
    }
}
