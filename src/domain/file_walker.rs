use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::best_match::BestMatch;
use super::error::WalkError;
use super::filter::{EntryFilter, FilterReason};
use super::fs::{EntryMetadata, FileSystem};

// 使用infrastructure层的日志
use crate::infrastructure::{ErrorLogger, LoggerTrait};

/// 单个条目的评估结果
#[derive(Debug)]
pub enum EntryOutcome {
    /// 通过全部过滤条件
    Candidate(FileRecord),
    /// 未通过过滤条件，目录仍会被遍历
    Filtered(FileRecord, FilterReason),
    /// 无法获取元数据
    Failed(WalkError),
}

/// 遍历时为每个条目生成的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub is_dir: bool,
    pub changed: DateTime<Local>,
    pub modified: DateTime<Local>,
}

impl FileRecord {
    fn new(path: PathBuf, metadata: &EntryMetadata) -> Self {
        Self {
            path,
            is_dir: metadata.is_dir,
            changed: metadata.changed,
            modified: metadata.modified,
        }
    }

    pub fn effective_time(&self) -> DateTime<Local> {
        self.changed.max(self.modified)
    }
}

/// 遍历统计
#[derive(Debug, Default)]
pub struct WalkStats {
    pub directories: u64,
    pub entries: u64,
    pub candidates: u64,
    pub filtered: u64,
    pub failures: Vec<WalkError>,
}

/// 尚未处理完的目录
struct Frame {
    dir: PathBuf,
    names: std::vec::IntoIter<OsString>,
}

/// 深度优先遍历目录树，把候选条目交给累加器
///
/// 使用显式的目录栈代替递归，访问顺序与递归实现相同：
/// 子目录在其后续兄弟条目之前被完整遍历。
pub struct TreeWalker<'a, F: FileSystem> {
    fs: &'a F,
    filter: &'a EntryFilter,
    verbose: bool,
    logger: &'a dyn LoggerTrait,
    errors: &'a ErrorLogger,
}

impl<'a, F: FileSystem> TreeWalker<'a, F> {
    pub fn new(
        fs: &'a F,
        filter: &'a EntryFilter,
        verbose: bool,
        logger: &'a dyn LoggerTrait,
        errors: &'a ErrorLogger,
    ) -> Self {
        Self {
            fs,
            filter,
            verbose,
            logger,
            errors,
        }
    }

    /// 遍历 root 下的全部条目，子树中的错误不会中断遍历
    pub fn walk(&self, root: &Path, best: &mut BestMatch) -> WalkStats {
        let mut stats = WalkStats::default();
        let mut stack = Vec::new();

        if self.logger.is_enabled() {
            let _ = self.logger.log_message(&format!("开始遍历: {}", root.display()));
        }

        if let Some(frame) = self.open(root, &mut stats) {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            let Some(name) = frame.names.next() else {
                stack.pop();
                continue;
            };

            if name == "." || name == ".." {
                continue;
            }

            let path = frame.dir.join(&name);
            stats.entries += 1;

            let subdir = match self.evaluate(&name, path) {
                EntryOutcome::Candidate(record) => {
                    stats.candidates += 1;
                    self.accept(&record, best, &mut stats);
                    record.is_dir.then_some(record.path)
                }
                EntryOutcome::Filtered(record, reason) => {
                    stats.filtered += 1;
                    if self.logger.is_enabled() {
                        let _ = self.logger.log_entry(
                            &record.path,
                            Some(record.effective_time()),
                            reason.as_str(),
                        );
                    }
                    record.is_dir.then_some(record.path)
                }
                EntryOutcome::Failed(err) => {
                    self.report(err, &mut stats);
                    None
                }
            };

            // 过滤条件只决定候选资格，目录总是继续遍历
            if let Some(dir) = subdir {
                if self.verbose {
                    println!("entering {}", dir.display());
                }
                if let Some(frame) = self.open(&dir, &mut stats) {
                    stack.push(frame);
                }
            }
        }

        stats
    }

    /// 获取元数据并应用过滤条件
    pub fn evaluate(&self, name: &OsStr, path: PathBuf) -> EntryOutcome {
        let metadata = match self.fs.metadata(&path) {
            Ok(metadata) => metadata,
            Err(source) => return EntryOutcome::Failed(WalkError::Metadata { path, source }),
        };

        let record = FileRecord::new(path, &metadata);
        match self.filter.evaluate(&name.to_string_lossy(), &metadata) {
            None => EntryOutcome::Candidate(record),
            Some(reason) => EntryOutcome::Filtered(record, reason),
        }
    }

    fn open(&self, dir: &Path, stats: &mut WalkStats) -> Option<Frame> {
        match self.fs.list_dir(dir) {
            Ok(names) => {
                stats.directories += 1;
                Some(Frame {
                    dir: dir.to_path_buf(),
                    names: names.into_iter(),
                })
            }
            Err(source) => {
                self.report(
                    WalkError::OpenDir {
                        path: dir.to_path_buf(),
                        source,
                    },
                    stats,
                );
                None
            }
        }
    }

    fn accept(&self, record: &FileRecord, best: &mut BestMatch, stats: &mut WalkStats) {
        let time = record.effective_time();
        let status = match best.offer(&record.path, time) {
            Ok(true) => "当前最新",
            Ok(false) => "候选",
            Err(source) => {
                self.report(
                    WalkError::Allocation {
                        path: record.path.clone(),
                        source,
                    },
                    stats,
                );
                return;
            }
        };

        if self.logger.is_enabled() {
            let _ = self.logger.log_entry(&record.path, Some(time), status);
        }
    }

    /// 可恢复错误：输出诊断并继续
    fn report(&self, err: WalkError, stats: &mut WalkStats) {
        eprintln!("Error: {}", err);
        if self.logger.is_enabled() {
            let _ = self.logger.log_entry(err.path(), None, &format!("错误: {}", err));
        }
        let _ = self.errors.log_walk_error(&err);
        stats.failures.push(err);
    }
}
