//! Core domain types for hcstat
//!
//! This module contains the fundamental types used throughout the hcstat crates.
//! These types provide strong typing for model names, challenge identifiers,
//! token counts and the on-disk model answer records.

use crate::error::{HcstatError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::path::{Path, PathBuf};

/// File name suffix of a persisted model answer
pub const MODEL_ANSWER_SUFFIX: &str = "_model_answer.json";

/// Strongly-typed model name wrapper
///
/// # Examples
/// ```
/// use hcstat_core::types::ModelName;
///
/// let model = ModelName::new("gemini-2.0-flash");
/// assert_eq!(model.as_str(), "gemini-2.0-flash");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelName(String);

impl ModelName {
    /// Create a new ModelName from any string-like type
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of one challenge instance
///
/// A challenge is the directory holding one or more model answer files, so
/// the identifier is the parent directory of each record.
///
/// # Examples
/// ```
/// use hcstat_core::types::ChallengeId;
/// use std::path::Path;
///
/// let id = ChallengeId::from_record_path(Path::new("runs/0001/a_model_answer.json"));
/// assert_eq!(id.as_path(), Path::new("runs/0001"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChallengeId(PathBuf);

impl ChallengeId {
    /// Create a ChallengeId from a challenge directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self(dir.into())
    }

    /// Derive the owning challenge of a record file
    pub fn from_record_path(path: &Path) -> Self {
        Self(path.parent().map(Path::to_path_buf).unwrap_or_default())
    }

    /// Get the challenge directory
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Token counts of one model invocation
///
/// # Examples
/// ```
/// use hcstat_core::types::TokenCounts;
///
/// let tokens = TokenCounts::new(100, 50);
/// assert_eq!(tokens.total(), 150);
///
/// let combined = tokens + TokenCounts::new(50, 25);
/// assert_eq!(combined.input_tokens, 150);
/// ```
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenCounts {
    /// Prompt tokens sent to the model
    pub input_tokens: u64,
    /// Candidate tokens generated by the model
    pub output_tokens: u64,
}

impl TokenCounts {
    /// Create new TokenCounts
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Calculate total tokens
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

impl Add for TokenCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            input_tokens: self.input_tokens + other.input_tokens,
            output_tokens: self.output_tokens + other.output_tokens,
        }
    }
}

impl AddAssign for TokenCounts {
    fn add_assign(&mut self, other: Self) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// Raw model answer file schema
///
/// Model answers are `GenerateContentResponse` documents. They are written
/// either with the SDK's snake_case field names or with the REST API's
/// camelCase names, so both spellings are accepted. Only the fields needed
/// for costing are kept; everything else in the document is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelAnswer {
    #[serde(default, alias = "modelVersion")]
    pub model_version: Option<String>,
    #[serde(default, alias = "usageMetadata")]
    pub usage_metadata: Option<UsageMetadata>,
}

/// Usage block of a model answer
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UsageMetadata {
    #[serde(default, alias = "promptTokenCount")]
    pub prompt_token_count: Option<u64>,
    #[serde(default, alias = "candidatesTokenCount")]
    pub candidates_token_count: Option<u64>,
}

/// One persisted model invocation, ready for costing
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecord {
    /// Record file this usage was read from
    pub path: PathBuf,
    /// Challenge the record belongs to
    pub challenge: ChallengeId,
    /// Model that produced the answer
    pub model: ModelName,
    /// Prompt and candidate token counts
    pub tokens: TokenCounts,
}

impl UsageRecord {
    /// Parse a model answer document read from `path`
    ///
    /// # Errors
    ///
    /// Returns [`HcstatError::Parse`] when the document is not valid JSON or
    /// lacks the model version or either token count.
    pub fn from_slice(path: &Path, bytes: &[u8]) -> Result<Self> {
        let answer: ModelAnswer =
            serde_json::from_slice(bytes).map_err(|e| HcstatError::parse(path, e))?;
        Self::from_answer(path, answer)
    }

    /// Validate a decoded model answer into a usage record
    pub fn from_answer(path: &Path, answer: ModelAnswer) -> Result<Self> {
        let model = answer
            .model_version
            .ok_or_else(|| HcstatError::parse(path, "missing model_version"))?;
        let usage = answer
            .usage_metadata
            .ok_or_else(|| HcstatError::parse(path, "missing usage_metadata"))?;
        let input_tokens = usage
            .prompt_token_count
            .ok_or_else(|| HcstatError::parse(path, "missing prompt_token_count"))?;
        let output_tokens = usage
            .candidates_token_count
            .ok_or_else(|| HcstatError::parse(path, "missing candidates_token_count"))?;

        Ok(Self {
            path: path.to_path_buf(),
            challenge: ChallengeId::from_record_path(path),
            model: ModelName::new(model),
            tokens: TokenCounts::new(input_tokens, output_tokens),
        })
    }
}

/// Whether `path` names a model answer record
pub fn is_model_answer_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(MODEL_ANSWER_SUFFIX))
}
