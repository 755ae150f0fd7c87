// 三层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{BestMatch, CutoffDate, EntryFilter, FileSystem, LocalFileSystem, TreeWalker, WalkStats};
pub use application::{Config, WalkOptions};
pub use infrastructure::{Logger, LoggerTrait, ErrorLogger, ErrorType};
pub use presentation::{WalkSummary, print_best_match};
