use std::io::{self, Write};
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::domain::{BestMatch, WalkStats};

/// 格式化持续时间
pub fn format_duration(duration: std::time::Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 本地时间，YYYY-MM-DD HH:MM:SS
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn render_best_match(best: &BestMatch) -> String {
    match (best.path(), best.time()) {
        (Some(path), Some(time)) => {
            format!("File: {} Date: {}", path.display(), format_timestamp(&time))
        }
        _ => "No file found".to_string(),
    }
}

/// 输出最终结果
pub fn print_best_match(best: &BestMatch) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", render_best_match(best))?;
    Ok(())
}

/// 遍历摘要
pub struct WalkSummary {
    pub start_time: Instant,
    pub directories: u64,
    pub entries: u64,
    pub candidates: u64,
    pub errors: usize,
}

impl WalkSummary {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            directories: 0,
            entries: 0,
            candidates: 0,
            errors: 0,
        }
    }

    pub fn record(&mut self, stats: &WalkStats) {
        self.directories = stats.directories;
        self.entries = stats.entries;
        self.candidates = stats.candidates;
        self.errors = stats.failures.len();
    }

    pub fn print(&self) -> Result<()> {
        let duration = self.start_time.elapsed();

        println!("\n遍历摘要:");
        println!("----------------------------");
        println!("总用时: {}", format_duration(duration));
        println!("遍历目录: {}", self.directories);
        println!("检查条目: {}", self.entries);
        println!("候选条目: {}", self.candidates);
        println!("错误数: {}", self.errors);

        Ok(())
    }
}

impl Default for WalkSummary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.500s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }

    #[test]
    fn test_render_best_match() {
        let time = Local.with_ymd_and_hms(2024, 6, 1, 8, 30, 5).earliest().unwrap();
        let mut best = BestMatch::new();
        assert_eq!(render_best_match(&best), "No file found");

        best.offer(Path::new("b/c.txt"), time).unwrap();
        assert_eq!(render_best_match(&best), "File: b/c.txt Date: 2024-06-01 08:30:05");
    }

    #[test]
    fn test_summary_records_stats() {
        let mut summary = WalkSummary::new();
        let stats = WalkStats {
            directories: 3,
            entries: 10,
            candidates: 7,
            ..WalkStats::default()
        };
        summary.record(&stats);
        assert_eq!(summary.directories, 3);
        assert_eq!(summary.candidates, 7);
        assert_eq!(summary.errors, 0);
    }
}
