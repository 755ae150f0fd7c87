use std::path::PathBuf;

use crate::domain::{ConfigError, CutoffDate, EntryFilter};

use super::config::Config;

/// 命令行中给出的值，优先于配置文件
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub path: PathBuf,
    pub before: Option<String>,
    pub exclude: Option<String>,
    pub verbose: bool,
    pub files_only: bool,
    pub log: bool,
}

/// 校验后的遍历参数，遍历期间不变
#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub root: PathBuf,
    pub filter: EntryFilter,
    pub verbose: bool,
    pub debug_log: bool,
    pub error_log: bool,
    pub log_dir: PathBuf,
}

impl WalkOptions {
    /// 合并命令行与配置文件，所有配置错误都在遍历前报告
    pub fn resolve(cli: CliOverrides, config: &Config) -> Result<Self, ConfigError> {
        if cli.path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }

        let cutoff = cli
            .before
            .or_else(|| config.search.cutoff_date.clone())
            .map(|date| CutoffDate::parse(&date))
            .transpose()?;

        let exclude = cli.exclude.or_else(|| config.search.exclude_pattern.clone());

        if config.logging.log_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidConfig("log_dir 不能为空".to_string()));
        }

        Ok(Self {
            root: cli.path,
            filter: EntryFilter::new(cutoff, exclude, cli.files_only || config.search.files_only),
            verbose: cli.verbose,
            debug_log: cli.log || config.logging.debug_log,
            error_log: config.logging.error_log,
            log_dir: config.logging.log_dir.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(path: &str) -> CliOverrides {
        CliOverrides {
            path: PathBuf::from(path),
            ..CliOverrides::default()
        }
    }

    #[test]
    fn test_resolve_minimal() {
        let options = WalkOptions::resolve(cli("/data"), &Config::default()).unwrap();
        assert_eq!(options.root, PathBuf::from("/data"));
        assert!(options.filter.cutoff.is_none());
        assert!(options.filter.exclude.is_none());
        assert!(!options.verbose);
        assert!(!options.debug_log);
    }

    #[test]
    fn test_empty_path_rejected() {
        assert_eq!(
            WalkOptions::resolve(cli(""), &Config::default()).unwrap_err(),
            ConfigError::EmptyPath
        );
    }

    #[test]
    fn test_malformed_date_rejected_before_walk() {
        let mut overrides = cli("/data");
        overrides.before = Some("01-07-2024".to_string());
        assert_eq!(
            WalkOptions::resolve(overrides, &Config::default()).unwrap_err(),
            ConfigError::InvalidDate("01-07-2024".to_string())
        );
    }

    #[test]
    fn test_cli_wins_over_config() {
        let mut config = Config::default();
        config.search.cutoff_date = Some("2020-01-01".to_string());
        config.search.exclude_pattern = Some(".bak".to_string());

        let mut overrides = cli("/data");
        overrides.before = Some("2024-07-01".to_string());
        overrides.exclude = Some(".tmp".to_string());

        let options = WalkOptions::resolve(overrides, &config).unwrap();
        assert_eq!(options.filter.cutoff, Some(CutoffDate::parse("2024-07-01").unwrap()));
        assert_eq!(options.filter.exclude.as_deref(), Some(".tmp"));

        let options = WalkOptions::resolve(cli("/data"), &config).unwrap();
        assert_eq!(options.filter.cutoff, Some(CutoffDate::parse("2020-01-01").unwrap()));
        assert_eq!(options.filter.exclude.as_deref(), Some(".bak"));
    }

    #[test]
    fn test_empty_exclude_means_no_exclusion() {
        let mut overrides = cli("/data");
        overrides.exclude = Some(String::new());
        let options = WalkOptions::resolve(overrides, &Config::default()).unwrap();
        assert!(options.filter.exclude.is_none());
    }

    #[test]
    fn test_logging_flags() {
        let mut config = Config::default();
        config.logging.error_log = true;

        let mut overrides = cli("/data");
        overrides.log = true;
        let options = WalkOptions::resolve(overrides, &config).unwrap();
        assert!(options.debug_log);
        assert!(options.error_log);
    }
}
