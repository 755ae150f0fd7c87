pub mod best_match;
pub mod error;
pub mod file_walker;
pub mod filter;
pub mod fs;

pub use best_match::BestMatch;
pub use error::{ConfigError, WalkError};
pub use file_walker::{EntryOutcome, FileRecord, TreeWalker, WalkStats};
pub use filter::{is_after_cutoff, is_excluded, CutoffDate, EntryFilter, FilterReason};
pub use fs::{EntryMetadata, FileSystem, LocalFileSystem};
