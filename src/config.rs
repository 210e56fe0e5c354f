//! Runtime configuration for the vanity key generator.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Minisign Vanity Key Generator
///
/// Generates minisign keys until the public key matches every given
/// regular expression.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Regular expressions the public key must match (all of them)
    #[arg(required = true, value_name = "REGEXP")]
    pub patterns: Vec<String>,

    /// Overwrite existing minisign.key and minisign.pub files
    #[arg(long, default_value = "false")]
    pub overwrite: bool,

    /// Directory to write minisign.key and minisign.pub into
    #[arg(short = 'd', long, default_value = ".")]
    pub dir: PathBuf,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval)
    }

    /// Validates the configuration.
    ///
    /// Patterns are compiled separately, when the pattern set is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.patterns.is_empty() {
            return Err(ConfigError::Invalid("at least one pattern is required".into()));
        }

        if self.workers == Some(0) {
            return Err(ConfigError::Invalid("--workers must be at least 1".into()));
        }

        if self.report_interval == 0 {
            return Err(ConfigError::Invalid(
                "--report-interval must be at least 1 second".into(),
            ));
        }

        if !self.dir.is_dir() {
            return Err(ConfigError::Invalid(format!(
                "output directory {} does not exist",
                self.dir.display()
            )));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_config(patterns: &[&str]) -> Config {
        Config {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            overwrite: false,
            dir: PathBuf::from("."),
            workers: None,
            report_interval: 5,
        }
    }

    #[test]
    fn test_valid_config() {
        let config = make_test_config(&["^RWQ"]);
        assert!(config.validate().is_ok());
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = make_test_config(&["^RWQ"]);
        config.workers = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = make_test_config(&["^RWQ"]);
        config.report_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_dir_rejected() {
        let mut config = make_test_config(&["^RWQ"]);
        config.dir = PathBuf::from("/definitely/not/a/real/dir");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_args() {
        let config =
            Config::try_parse_from(["minisign-vanity", "-w", "3", "--overwrite", "^RW", "cafe"])
                .unwrap();
        assert_eq!(config.patterns, vec!["^RW", "cafe"]);
        assert_eq!(config.worker_count(), 3);
        assert!(config.overwrite);
        assert_eq!(config.report_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_patterns_required() {
        assert!(Config::try_parse_from(["minisign-vanity"]).is_err());
    }
}
