use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

/// 日志记录器trait
pub trait LoggerTrait {
    fn is_enabled(&self) -> bool;
    fn log_message(&self, message: &str) -> Result<()>;
    fn log_entry(&self, path: &Path, time: Option<DateTime<Local>>, status: &str) -> Result<()>;
    fn finalize(&self, directories: u64, entries: u64, candidates: u64, duration: std::time::Duration) -> Result<()>;
}

/// 调试日志记录器（记录配置、遍历过程和每个条目的处理结果）
pub struct Logger {
    log_file: Arc<Mutex<Option<File>>>,
    log_path: PathBuf,
    enabled: bool,
}

impl Logger {
    /// 创建新的日志记录器，日志文件写入 log_dir
    pub fn new(enabled: bool, log_dir: &Path) -> Result<Self> {
        if !enabled {
            return Ok(Self {
                log_file: Arc::new(Mutex::new(None)),
                log_path: PathBuf::new(),
                enabled: false,
            });
        }

        // 获取当前时间作为文件名的一部分
        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");

        let log_path = log_dir.join(format!("debug_{}.log", timestamp));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("无法创建日志文件: {}", log_path.display()))?;

        // 写入UTF-8 BOM以确保文件被正确识别为UTF-8
        let mut file_clone = file.try_clone()?;
        file_clone.write_all(&[0xEF, 0xBB, 0xBF])?;

        writeln!(file_clone, "# find-latest 调试日志")?;
        writeln!(file_clone, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file_clone, "# --------------------------------------------")?;
        writeln!(file_clone, "# 路径 | 有效时间 | 状态")?;

        Ok(Self {
            log_file: Arc::new(Mutex::new(Some(file))),
            log_path,
            enabled: true,
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

impl LoggerTrait for Logger {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log_message(&self, message: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let now = Local::now();
        let timestamp = now.format("%Y-%m-%d %H:%M:%S%.3f");

        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "[{}] {}", timestamp, message)?;
                file.flush()?;
            }
        }

        Ok(())
    }

    fn log_entry(&self, path: &Path, time: Option<DateTime<Local>>, status: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let now = Local::now();
        let timestamp = now.format("%Y-%m-%d %H:%M:%S%.3f");
        let effective = time
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());

        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "[{}] 条目: {} | 有效时间: {} | 状态: {}",
                    timestamp,
                    path.display(),
                    effective,
                    status
                )?;
                file.flush()?;
            }
        }

        Ok(())
    }

    fn finalize(&self, directories: u64, entries: u64, candidates: u64, duration: std::time::Duration) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let now = Local::now();

        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "# --------------------------------------------")?;
                writeln!(file, "# 完成时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
                writeln!(file, "# 总用时: {:.3}秒", duration.as_secs_f64())?;
                writeln!(file, "# 遍历目录数: {}", directories)?;
                writeln!(file, "# 检查条目数: {}", entries)?;
                writeln!(file, "# 候选条目数: {}", candidates)?;
                writeln!(file, "# ============================================")?;
                file.flush()?;
            }
        }

        Ok(())
    }
}
