//! TOML question pool parser.
//!
//! Loads question pools from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Question, QuestionPool};

/// The pool used when no pool file is given.
pub const BUILTIN_POOL_TOML: &str = include_str!("../pools/javascript-basics.toml");

/// Intermediate TOML structure for parsing pool files.
#[derive(Debug, Deserialize)]
struct TomlPoolFile {
    pool: TomlPoolHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlPoolHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: u32,
    prompt: String,
    choices: Vec<String>,
    answer: usize,
}

/// Parse a single TOML file into a `QuestionPool`.
pub fn parse_pool(path: &Path) -> Result<QuestionPool> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question pool: {}", path.display()))?;

    parse_pool_str(&content, path)
}

/// Parse a TOML string into a `QuestionPool`.
pub fn parse_pool_str(content: &str, source_path: &Path) -> Result<QuestionPool> {
    let parsed: TomlPoolFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            id: q.id,
            prompt: q.prompt.trim().to_string(),
            choices: q.choices,
            answer: q.answer,
        })
        .collect();

    Ok(QuestionPool {
        id: parsed.pool.id,
        name: parsed.pool.name,
        description: parsed.pool.description,
        questions,
    })
}

/// The built-in JavaScript warm-up pool.
pub fn builtin_pool() -> Result<QuestionPool> {
    parse_pool_str(BUILTIN_POOL_TOML, Path::new("<builtin>"))
}

/// Recursively load all `.toml` pool files from a directory.
pub fn load_pool_directory(dir: &Path) -> Result<Vec<QuestionPool>> {
    let mut pools = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            pools.extend(load_pool_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_pool(&path) {
                Ok(pool) => pools.push(pool),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(pools)
}

/// Load a pool file, or every pool in a directory.
pub fn load_pools(path: &Path) -> Result<Vec<QuestionPool>> {
    if path.is_dir() {
        load_pool_directory(path)
    } else {
        Ok(vec![parse_pool(path)?])
    }
}

/// A warning from pool validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<u32>,
    /// Warning message.
    pub message: String,
}

/// Validate a question pool for common issues.
pub fn validate_pool(pool: &QuestionPool) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if pool.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "pool has no questions".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for question in &pool.questions {
        if !seen_ids.insert(question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id),
                message: format!("duplicate question ID: {}", question.id),
            });
        }
    }

    for question in &pool.questions {
        if question.prompt.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id),
                message: "prompt is empty".into(),
            });
        }

        if question.choices.len() < 2 {
            warnings.push(ValidationWarning {
                question_id: Some(question.id),
                message: format!("only {} choice(s), need at least 2", question.choices.len()),
            });
        }

        if question.answer >= question.choices.len() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id),
                message: format!(
                    "answer index {} is out of range ({} choices)",
                    question.answer,
                    question.choices.len()
                ),
            });
        }
    }

    warnings
}
