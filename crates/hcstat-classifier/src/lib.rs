//! Grid image challenge classifier for hcstat
//!
//! This crate sends a challenge screenshot to a Gemini model and returns the
//! 3x3 grid cells it selects. Every call can persist the raw model response
//! as a `*_model_answer.json` record, which is what hcstat later costs.

pub mod challenge;
pub mod classifier;
pub mod gemini;
pub mod json_block;
pub mod retry;

pub use challenge::{GridCoordinate, ImageBinaryChallenge};
pub use classifier::{ChallengeSolver, DEFAULT_MODEL, ImageClassifier, RequestOptions};
pub use gemini::GeminiClient;
pub use retry::RetryPolicy;
