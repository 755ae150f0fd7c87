use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::CutoffDate;

/// 应用程序配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 搜索相关配置
    pub search: SearchConfig,
    /// 日志相关配置
    pub logging: LoggingConfig,
}

/// 搜索配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 默认截止日期 (YYYY-MM-DD)
    pub cutoff_date: Option<String>,
    /// 默认排除子串
    pub exclude_pattern: Option<String>,
    /// 只比较文件，不比较目录
    pub files_only: bool,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 是否写入调试日志
    pub debug_log: bool,
    /// 是否写入错误日志
    pub error_log: bool,
    /// 日志文件目录
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            debug_log: false,
            error_log: false,
            log_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", config_path.display()))?;

        Ok(config)
    }

    /// 指定了配置文件则加载，否则使用默认配置
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if let Some(date) = &self.search.cutoff_date {
            CutoffDate::parse(date).context("配置文件中的 cutoff_date 无效")?;
        }

        if self.logging.log_dir.as_os_str().is_empty() {
            anyhow::bail!("log_dir 不能为空");
        }

        Ok(())
    }
}
