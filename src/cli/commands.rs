//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑。命令结果写入传入的输出流，便于测试。

use crate::cli::args::{Args, Commands};
use crate::config::Konfik;
use crate::error::{AccessError, Result};
use crate::render::{render, render_value, LiteralHighlighter, OutputFormat};
use crate::tree::{ConfigValue, PathResolver};
use std::io::Write;
use tracing::debug;

/// 命令处理器trait
pub trait Command {
    /// 执行命令
    fn execute(&self, args: &Args, out: &mut dyn Write) -> Result<()>;
}

/// 根据子命令选择处理器
pub fn command_for(command: &Commands) -> Box<dyn Command> {
    match command {
        Commands::Show { .. } => Box::new(ShowCommand),
        Commands::ShowLiteral { .. } => Box::new(ShowLiteralCommand),
        Commands::Var { .. } => Box::new(VarCommand),
        Commands::Keys { .. } => Box::new(KeysCommand),
        Commands::Version { .. } => Box::new(VersionCommand),
    }
}

/// 按参数加载配置
fn load_config(args: &Args) -> Result<Konfik> {
    let path = args.get_config_path();
    debug!("使用配置文件: {}", path.display());
    Ok(Konfik::new(path)?)
}

/// 输出完整配置命令
///
/// 输出提升后的配置树而不是原始解析结果：TOML 日期时间在原始值中
/// 序列化为内部结构，配置树中已是 RFC 3339 文本。
pub struct ShowCommand;

impl Command for ShowCommand {
    fn execute(&self, args: &Args, out: &mut dyn Write) -> Result<()> {
        if let Commands::Show { format } = &args.command {
            let konfik = load_config(args)?;
            writeln!(out, "{}", render(konfik.config(), *format)?)?;
        }
        Ok(())
    }
}

/// 原样输出配置文件命令
pub struct ShowLiteralCommand;

impl Command for ShowLiteralCommand {
    fn execute(&self, args: &Args, out: &mut dyn Write) -> Result<()> {
        if let Commands::ShowLiteral { plain } = &args.command {
            let konfik = load_config(args)?;
            let content = konfik.literal()?;

            if *plain {
                write!(out, "{content}")?;
            } else {
                let highlighter = LiteralHighlighter::new(konfik.format())?;
                write!(out, "{}", highlighter.highlight(&content))?;
            }
        }
        Ok(())
    }
}

/// 输出配置变量命令
pub struct VarCommand;

impl Command for VarCommand {
    fn execute(&self, args: &Args, out: &mut dyn Write) -> Result<()> {
        if let Commands::Var {
            query,
            format,
            index,
        } = &args.command
        {
            let konfik = load_config(args)?;
            let resolver = PathResolver::new().with_sequence_indices(*index);
            let value = konfik.resolve_with(&resolver, query.as_str())?;

            if args.is_verbose() {
                writeln!(out, "{} ({})", query, value.kind())?;
            }
            writeln!(out, "{}", render_value(value, *format)?)?;
        }
        Ok(())
    }
}

/// 列出键命令
pub struct KeysCommand;

impl Command for KeysCommand {
    fn execute(&self, args: &Args, out: &mut dyn Write) -> Result<()> {
        if let Commands::Keys { query } = &args.command {
            let konfik = load_config(args)?;
            let query = query.as_deref().unwrap_or("");
            let value = konfik.resolve(query)?;

            let map = match value {
                ConfigValue::Mapping(map) => map,
                other => {
                    return Err(AccessError::TypeMismatch {
                        key: query.to_string(),
                        found: other.kind(),
                    }
                    .into())
                }
            };

            for (key, child) in map {
                if args.is_verbose() {
                    writeln!(out, "{key}\t{}", child.kind())?;
                } else {
                    writeln!(out, "{key}")?;
                }
            }
        }
        Ok(())
    }
}

/// 版本命令
pub struct VersionCommand;

impl Command for VersionCommand {
    fn execute(&self, args: &Args, out: &mut dyn Write) -> Result<()> {
        if let Commands::Version { format } = &args.command {
            match format {
                OutputFormat::Text => {
                    writeln!(out, "{} v{}", crate::APP_NAME, crate::VERSION)?;
                    writeln!(out, "{}", crate::APP_DESCRIPTION)?;
                }
                _ => {
                    let version_info = serde_json::json!({
                        "name": crate::APP_NAME,
                        "version": crate::VERSION,
                        "description": crate::APP_DESCRIPTION
                    });
                    writeln!(out, "{}", render(&version_info, *format)?)?;
                }
            }
        }
        Ok(())
    }
}
