//! Konfik 主程序入口
//!
//! 读取配置文件并输出配置内容或单个变量

use anyhow::{Context, Result};
use konfik::cli::args::Args;
use konfik::cli::commands::command_for;
use konfik::logging::{LogConfig, LoggingSystem};
use std::io::Write;
use tracing::{debug, error};

fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse_args();

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.log_level.clone().into(),
        with_location: args.is_verbose(),
        ..Default::default()
    };

    let _logging_system = LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    debug!("Konfik v{} 启动", konfik::VERSION);

    // 执行命令
    if let Err(e) = execute_command(&args) {
        error!("命令执行失败: {}", e);
        eprintln!("错误: {e}");
        std::process::exit(1);
    }

    Ok(())
}

/// 执行CLI命令
fn execute_command(args: &Args) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    command_for(&args.command).execute(args, &mut out)?;
    out.flush().context("写入标准输出失败")?;

    Ok(())
}
