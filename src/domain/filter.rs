use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};

use super::error::ConfigError;
use super::fs::EntryMetadata;

/// 截止日期：某天的本地时间零点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutoffDate {
    date: NaiveDate,
    instant: DateTime<Local>,
}

impl CutoffDate {
    /// 解析严格的 YYYY-MM-DD 格式
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidDate(input.to_string());

        let bytes = input.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !well_formed {
            return Err(invalid());
        }

        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid())?;
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;

        // 夏令时切换可能让零点重复或不存在
        let instant = Local
            .from_local_datetime(&midnight)
            .earliest()
            .or_else(|| {
                Local
                    .from_local_datetime(&(midnight + Duration::hours(1)))
                    .earliest()
            })
            .ok_or_else(invalid)?;

        Ok(Self { date, instant })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn instant(&self) -> DateTime<Local> {
        self.instant
    }
}

/// 文件时间是否不早于截止日期
pub fn is_after_cutoff(file_time: DateTime<Local>, cutoff: &CutoffDate) -> bool {
    file_time >= cutoff.instant
}

/// 名称中是否包含排除子串（按字面匹配，不支持通配符或正则）
pub fn is_excluded(name: &str, pattern: &str) -> bool {
    name.contains(pattern)
}

/// 条目不能成为候选的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterReason {
    BeforeCutoff,
    Excluded,
    Directory,
}

impl FilterReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterReason::BeforeCutoff => "已跳过(早于截止日期)",
            FilterReason::Excluded => "已跳过(名称排除)",
            FilterReason::Directory => "已跳过(目录)",
        }
    }
}

/// 候选筛选条件，只决定是否参与比较，不影响遍历
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub cutoff: Option<CutoffDate>,
    pub exclude: Option<String>,
    pub files_only: bool,
}

impl EntryFilter {
    /// 创建新的过滤器，空的排除模式视为不排除
    pub fn new(cutoff: Option<CutoffDate>, exclude: Option<String>, files_only: bool) -> Self {
        Self {
            cutoff,
            exclude: exclude.filter(|pattern| !pattern.is_empty()),
            files_only,
        }
    }

    /// 返回 None 表示条目是候选
    pub fn evaluate(&self, name: &str, metadata: &EntryMetadata) -> Option<FilterReason> {
        if let Some(cutoff) = &self.cutoff {
            if !is_after_cutoff(metadata.effective_time(), cutoff) {
                return Some(FilterReason::BeforeCutoff);
            }
        }

        if let Some(pattern) = &self.exclude {
            if is_excluded(name, pattern) {
                return Some(FilterReason::Excluded);
            }
        }

        if self.files_only && metadata.is_dir {
            return Some(FilterReason::Directory);
        }

        None
    }
}
