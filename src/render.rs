//! 输出渲染模块
//!
//! 把配置值渲染为文本、JSON 或 YAML，并提供配置文件原文的高亮显示。
//! 渲染只读取数据，不会修改配置树。

use crate::config::ConfigFormat;
use crate::error::RenderError;
use crate::tree::ConfigValue;
use clap::ValueEnum;
use console::style;
use regex::Regex;
use serde::Serialize;

/// 输出格式枚举
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 文本格式（标量原样输出，容器输出为JSON）
    #[default]
    Text,
    /// JSON格式
    Json,
    /// YAML格式
    Yaml,
}

/// 渲染任意可序列化的值
///
/// 文本格式与JSON格式一样输出带缩进的JSON。
pub fn render<T>(value: &T, format: OutputFormat) -> Result<String, RenderError>
where
    T: Serialize + ?Sized,
{
    match format {
        OutputFormat::Text | OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?.trim_end().to_string()),
    }
}

/// 渲染单个配置值
///
/// 文本格式下标量直接输出（字符串不带引号），容器输出为带缩进的JSON。
pub fn render_value(value: &ConfigValue, format: OutputFormat) -> Result<String, RenderError> {
    match (format, value) {
        (OutputFormat::Text, ConfigValue::Sequence(_) | ConfigValue::Mapping(_)) => {
            render(value, OutputFormat::Json)
        }
        (OutputFormat::Text, scalar) => Ok(scalar.to_string()),
        _ => render(value, format),
    }
}

/// 配置文件原文高亮器
///
/// 按行处理：注释变暗，TOML 表头加粗，键名着色。终端不支持颜色时
/// `console` 会输出纯文本。
#[derive(Debug, Clone)]
pub struct LiteralHighlighter {
    comment: Option<Regex>,
    section: Option<Regex>,
    key: Regex,
}

impl LiteralHighlighter {
    /// 为指定格式创建高亮器
    pub fn new(format: ConfigFormat) -> Result<Self, RenderError> {
        let (comment, section, key) = match format {
            ConfigFormat::Toml => (
                Some(r"^\s*#"),
                Some(r"^\s*\[\[?[^\]]+\]\]?\s*(#.*)?$"),
                r#"^(\s*)([A-Za-z0-9_.\-"' ]+?)(\s*=)"#,
            ),
            ConfigFormat::Env => (
                Some(r"^\s*#"),
                None,
                r"^(\s*(?:export\s+)?)([A-Za-z_][A-Za-z0-9_.]*)(\s*=)",
            ),
            ConfigFormat::Yaml => (
                Some(r"^\s*#"),
                None,
                r"^(\s*(?:-\s+)?)([^\s#:\-][^:#]*?)(:)(?:\s|$)",
            ),
            ConfigFormat::Json => (None, None, r#"^(\s*)("(?:[^"\\]|\\.)*")(\s*:)"#),
        };

        Ok(Self {
            comment: comment.map(Regex::new).transpose()?,
            section: section.map(Regex::new).transpose()?,
            key: Regex::new(key)?,
        })
    }

    /// 高亮整段文本，保留原有的换行
    pub fn highlight(&self, content: &str) -> String {
        content
            .split_inclusive('\n')
            .map(|line| {
                let (body, newline) = match line.strip_suffix('\n') {
                    Some(body) => (body, "\n"),
                    None => (line, ""),
                };
                format!("{}{}", self.highlight_line(body), newline)
            })
            .collect()
    }

    fn highlight_line(&self, line: &str) -> String {
        if self.comment.as_ref().is_some_and(|re| re.is_match(line)) {
            return style(line).dim().to_string();
        }

        if self.section.as_ref().is_some_and(|re| re.is_match(line)) {
            return style(line).bold().to_string();
        }

        match self.key.captures(line) {
            Some(caps) => {
                let prefix = caps.get(1).map_or("", |m| m.as_str());
                let Some(key) = caps.get(2) else {
                    return line.to_string();
                };
                format!(
                    "{}{}{}",
                    prefix,
                    style(key.as_str()).cyan(),
                    &line[key.end()..]
                )
            }
            None => line.to_string(),
        }
    }
}
