pub mod config;
pub mod options;

pub use config::Config;
pub use options::{CliOverrides, WalkOptions};
