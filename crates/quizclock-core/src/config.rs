//! quizclock configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::ExamConfig;

/// Top-level quizclock configuration (`quizclock.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Countdown length in seconds.
    #[serde(default = "default_total_time")]
    pub total_time_secs: u64,
    /// Questions drawn per attempt.
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    /// Default pool file or directory. The built-in pool is used when unset.
    #[serde(default)]
    pub pool: Option<PathBuf>,
}

fn default_total_time() -> u64 {
    120
}
fn default_question_count() -> usize {
    5
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            total_time_secs: default_total_time(),
            question_count: default_question_count(),
            pool: None,
        }
    }
}

impl QuizConfig {
    /// Exam settings, with optional command-line overrides applied.
    pub fn exam_config(&self, count: Option<usize>, time_secs: Option<u64>) -> ExamConfig {
        ExamConfig {
            total_time_secs: time_secs.unwrap_or(self.total_time_secs),
            question_count: count.unwrap_or(self.question_count),
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizclock.toml` in the current directory
/// 2. `~/.config/quizclock/config.toml`
///
/// Environment variable overrides: `QUIZCLOCK_TOTAL_TIME`, `QUIZCLOCK_QUESTION_COUNT`.
pub fn load_config() -> Result<QuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizclock.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => parse_config_file(path)?,
        None => QuizConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    check_limits(&config)?;

    Ok(config)
}

fn check_limits(config: &QuizConfig) -> Result<()> {
    anyhow::ensure!(
        config.total_time_secs >= 1,
        "total_time_secs must be at least 1"
    );
    anyhow::ensure!(
        config.question_count >= 1,
        "question_count must be at least 1"
    );
    Ok(())
}

fn parse_config_file(path: &Path) -> Result<QuizConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let mut config = toml::from_str::<QuizConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;

    // A relative pool path is relative to the config file.
    if let (Some(pool), Some(dir)) = (&config.pool, path.parent()) {
        if pool.is_relative() && !dir.as_os_str().is_empty() {
            config.pool = Some(dir.join(pool));
        }
    }

    tracing::debug!("loaded config from {}", path.display());
    Ok(config)
}

fn apply_env_overrides(
    config: &mut QuizConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(value) = lookup("QUIZCLOCK_TOTAL_TIME") {
        config.total_time_secs = value
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZCLOCK_TOTAL_TIME: '{value}'"))?;
    }
    if let Some(value) = lookup("QUIZCLOCK_QUESTION_COUNT") {
        config.question_count = value
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZCLOCK_QUESTION_COUNT: '{value}'"))?;
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizclock"))
}
