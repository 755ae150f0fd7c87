use std::collections::TryReserveError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// 当前找到的最新条目
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    path: PathBuf,
    time: DateTime<Local>,
}

/// 最新条目累加器
///
/// 只有严格更新的时间才会替换当前结果，时间相同时先遇到的条目保留。
/// 由于目录枚举顺序取决于文件系统，时间相同时最终保留哪一个是不确定的。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BestMatch {
    best: Option<Candidate>,
}

impl BestMatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// 提交一个候选条目，返回是否替换了当前结果
    ///
    /// 新路径的内存先申请成功才会替换，申请失败时保留原结果。
    pub fn offer(&mut self, path: &Path, time: DateTime<Local>) -> Result<bool, TryReserveError> {
        if let Some(current) = &self.best {
            if time <= current.time {
                return Ok(false);
            }
        }

        let mut owned = OsString::new();
        owned.try_reserve_exact(path.as_os_str().len())?;
        owned.push(path.as_os_str());

        self.best = Some(Candidate {
            path: PathBuf::from(owned),
            time,
        });
        Ok(true)
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_none()
    }

    pub fn path(&self) -> Option<&Path> {
        self.best.as_ref().map(|c| c.path.as_path())
    }

    pub fn time(&self) -> Option<DateTime<Local>> {
        self.best.as_ref().map(|c| c.time)
    }
}
