use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use find_latest::application::{CliOverrides, Config, WalkOptions};
use find_latest::domain::{BestMatch, LocalFileSystem, TreeWalker};
use find_latest::infrastructure::{ErrorLogger, Logger, LoggerTrait};
use find_latest::presentation::{format_timestamp, print_best_match, WalkSummary};

/// 在目录树中查找最近修改的文件
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// 要搜索的目录路径
    #[clap(short, long, required = true)]
    path: PathBuf,

    /// 排除早于该日期的条目 (格式 YYYY-MM-DD)
    #[clap(short = 'b', long = "before", value_name = "DATE")]
    before: Option<String>,

    /// 排除名称中包含该子串的条目
    #[clap(short, long, value_name = "PATTERN")]
    exclude: Option<String>,

    /// 进入子目录时输出进度
    #[clap(short, long)]
    verbose: bool,

    /// 只比较文件，目录仍会被遍历
    #[clap(long)]
    files_only: bool,

    /// 启用调试日志，日志文件写入配置的 log_dir
    #[clap(long)]
    log: bool,

    /// TOML 配置文件路径
    #[clap(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 配置错误在遍历前报告
    let config = Config::load(args.config.as_deref())?;
    let options = WalkOptions::resolve(
        CliOverrides {
            path: args.path,
            before: args.before,
            exclude: args.exclude,
            verbose: args.verbose,
            files_only: args.files_only,
            log: args.log,
        },
        &config,
    )?;

    let logger = Logger::new(options.debug_log, &options.log_dir)?;
    let error_logger = ErrorLogger::new(options.error_log, &options.log_dir)?;

    if logger.is_enabled() {
        eprintln!("日志文件已创建: {}", logger.log_path().display());
        logger.log_message(&format!("目标目录: {}", options.root.display()))?;
        if let Some(cutoff) = &options.filter.cutoff {
            logger.log_message(&format!("截止日期: {}", cutoff.date()))?;
        }
        if let Some(pattern) = &options.filter.exclude {
            logger.log_message(&format!("排除子串: {}", pattern))?;
        }
        logger.log_message(&format!("只比较文件: {}", options.filter.files_only))?;
    }

    let mut summary = WalkSummary::new();
    let mut best = BestMatch::new();

    let fs = LocalFileSystem;
    let walker = TreeWalker::new(
        &fs,
        &options.filter,
        options.verbose,
        &logger,
        &error_logger,
    );
    let stats = walker.walk(&options.root, &mut best);
    summary.record(&stats);

    print_best_match(&best)?;

    if options.verbose {
        summary.print()?;
    }

    if logger.is_enabled() {
        if let (Some(path), Some(time)) = (best.path(), best.time()) {
            logger.log_message(&format!("最新条目: {} ({})", path.display(), format_timestamp(&time)))?;
        }
        logger.finalize(
            stats.directories,
            stats.entries,
            stats.candidates,
            summary.start_time.elapsed(),
        )?;
    }

    error_logger.finalize()?;
    error_logger.print_error_summary();

    Ok(())
}
