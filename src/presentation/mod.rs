pub mod display;

pub use display::{format_timestamp, print_best_match, render_best_match, WalkSummary};
