use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use siteplan_config::{AppConfig, ConfigError};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

mod commands;

/// 根据测量边界与城市分区生成场地图
#[derive(Debug, Parser)]
#[command(name = "siteplan", version)]
struct Cli {
    /// 配置文件路径，默认读取 `SITEPLAN_CONFIG` 或 `./config/default.toml`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 渲染测量文档（.json / .toml）
    Render(commands::RenderArgs),
    /// 列出已配置的城市分区
    Cities,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match load_configuration(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config);
    info!("启动 siteplan");

    let result = match &cli.command {
        Command::Render(args) => commands::render(&config, args),
        Command::Cities => commands::list_cities(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "执行失败");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// 显式指定的配置文件必须可用；自动发现的配置失败时回退到内建默认值。
/// 此时日志尚未初始化，警告直接写到 stderr。
fn load_configuration(override_path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = override_path {
        return AppConfig::from_file(path)
            .with_context(|| format!("cannot load config {}", path.display()));
    }
    match AppConfig::discover() {
        Ok(cfg) => Ok(cfg),
        Err(err) => {
            match &err {
                ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
                    eprintln!(
                        "warning: cannot load config {}, using built-in defaults: {err}",
                        path.display()
                    );
                }
                ConfigError::Context { .. } => {
                    eprintln!("warning: {err}, using built-in defaults");
                }
            }
            Ok(AppConfig::default())
        }
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(config.logging.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout 留给出图结果
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}
