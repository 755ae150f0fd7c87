use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 遍历过程中的可恢复错误，只影响单个条目或单个子树
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("Cannot open {}: {source}", path.display())]
    OpenDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot get the file information of {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot allocate memory for {}: {source}", path.display())]
    Allocation {
        path: PathBuf,
        #[source]
        source: TryReserveError,
    },
}

impl WalkError {
    /// 出错的路径
    pub fn path(&self) -> &std::path::Path {
        match self {
            WalkError::OpenDir { path, .. }
            | WalkError::Metadata { path, .. }
            | WalkError::Allocation { path, .. } => path,
        }
    }
}

/// 配置错误，在开始遍历之前报告，属于致命错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("path is required")]
    EmptyPath,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
