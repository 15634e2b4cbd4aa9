//! Common test utilities and helpers for hcstat tests
//!
//! Builds temporary challenge directory trees filled with model answer
//! records, the layout the aggregator scans.

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Models with a built-in price
pub const FLASH: &str = "gemini-2.0-flash";
#[allow(dead_code)]
pub const FLASH_LITE: &str = "gemini-2.0-flash-lite";
#[allow(dead_code)]
pub const PRO_PREVIEW: &str = "gemini-2.5-pro-preview-03-25";

/// Builder for a temporary tree of challenge directories
pub struct ChallengeTree {
    dir: TempDir,
    next_id: usize,
}

impl ChallengeTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            next_id: 0,
        }
    }

    /// Root of the tree
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    fn next_file(&mut self, challenge: &str) -> PathBuf {
        let dir = self.root().join(challenge);
        fs::create_dir_all(&dir).unwrap();
        self.next_id += 1;
        dir.join(format!("shot-{:03}_model_answer.json", self.next_id))
    }

    /// Add a record in the snake_case layout of an SDK dump
    pub fn record(&mut self, challenge: &str, model: &str, input: u64, output: u64) -> &mut Self {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": "```json\n{}\n```"}], "role": "model"}}],
            "model_version": model,
            "usage_metadata": {
                "prompt_token_count": input,
                "candidates_token_count": output,
                "total_token_count": input + output
            }
        });
        self.raw(challenge, &body.to_string())
    }

    /// Add a record in the camelCase layout of a REST response
    #[allow(dead_code)]
    pub fn rest_record(&mut self, challenge: &str, model: &str, input: u64, output: u64) -> &mut Self {
        let body = json!({
            "modelVersion": model,
            "usageMetadata": {"promptTokenCount": input, "candidatesTokenCount": output}
        });
        self.raw(challenge, &body.to_string())
    }

    /// Add a record file with arbitrary content
    pub fn raw(&mut self, challenge: &str, content: &str) -> &mut Self {
        let path = self.next_file(challenge);
        fs::write(path, content).unwrap();
        self
    }

    /// Add a file that is not a record
    #[allow(dead_code)]
    pub fn other_file(&mut self, relative: &str, content: &str) -> &mut Self {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        self
    }
}
