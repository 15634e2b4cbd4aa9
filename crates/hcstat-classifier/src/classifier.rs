//! Image challenge classifier
//!
//! Sends a screenshot of a 3x3 selection challenge to a Gemini model and
//! decodes the selected cells. Calls are retried with a fixed delay, and the
//! raw response of each call can be written next to the challenge as a
//! `*_model_answer.json` record for later costing.

use crate::challenge::ImageBinaryChallenge;
use crate::gemini::{
    Content, GeminiClient, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ModelResponse, Part, ThinkingConfig,
};
use crate::json_block::extract_first_json_block;
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hcstat_core::error::{HcstatError, Result};
use hcstat_core::types::MODEL_ANSWER_SUFFIX;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-04-17";

/// Models that accept a thinking budget
pub const THINKING_BUDGET_MODELS: &[&str] = &["gemini-2.5-flash-preview-04-17"];

/// Models that cannot be constrained to a response schema
const UNCONSTRAINED_MODELS: &[&str] = &["gemini-2.0-flash-thinking-exp-01-21"];

const SYSTEM_INSTRUCTION: &str = r#"
Solve the challenge, use [0,0] ~ [2,2] to locate 9grid, output the coordinates of the correct answer as json.

Follow the following format to return a coordinates wrapped with a json code block:
```json
{
  "challenge_prompt": "please click on the largest animal",
  "coordinates": [
    {"box_2d": [0,0]},
    {"box_2d": [1,2]},
    {"box_2d": [2,1]}
  ]
}
```
"#;

const USER_PROMPT: &str = "Solve the challenge, use [0,0] ~ [2,2] to locate 9grid, output the coordinates of the correct answer as JSON.";

/// Anything that can solve a grid image challenge
#[async_trait]
pub trait ChallengeSolver: Send + Sync {
    /// Solve the challenge shown in `image` using `model`
    async fn solve(&self, image: &Path, model: &str) -> Result<ImageBinaryChallenge>;
}

/// Request options that change the shape of a call
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOptions {
    /// Ask for constrained JSON output
    pub constraint_response_schema: bool,
    /// Thinking budget for models in [`THINKING_BUDGET_MODELS`]
    pub thinking_budget: Option<i32>,
}

/// Gemini backed [`ChallengeSolver`]
pub struct ImageClassifier {
    client: GeminiClient,
    model: String,
    options: RequestOptions,
    retry: RetryPolicy,
    answer_dir: Option<PathBuf>,
}

impl ImageClassifier {
    /// Create a classifier using [`DEFAULT_MODEL`]
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            options: RequestOptions::default(),
            retry: RetryPolicy::default(),
            answer_dir: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_response_schema(mut self, enabled: bool) -> Self {
        self.options.constraint_response_schema = enabled;
        self
    }

    pub fn with_thinking_budget(mut self, budget: Option<i32>) -> Self {
        self.options.thinking_budget = budget;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Persist every raw response as a model answer record in `dir`
    pub fn with_answer_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.answer_dir = Some(dir.into());
        self
    }

    /// Configured model
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Solve `image` with the configured model
    pub async fn invoke(&self, image: &Path) -> Result<ImageBinaryChallenge> {
        self.invoke_with_model(image, &self.model).await
    }

    /// Solve `image` with `model`, retrying failed attempts
    pub async fn invoke_with_model(
        &self,
        image: &Path,
        model: &str,
    ) -> Result<ImageBinaryChallenge> {
        let bytes = tokio::fs::read(image).await?;
        let mime_type = image_mime_type(image)?;
        let request = build_request(&bytes, mime_type, model, self.options);
        let structured = uses_response_schema(model, self.options);
        if let Some(dir) = &self.answer_dir {
            prepare_answer_dir(dir).await?;
        }

        self.retry
            .run(|| self.invoke_once(image, model, &request, structured))
            .await
    }

    async fn invoke_once(
        &self,
        image: &Path,
        model: &str,
        request: &GenerateContentRequest,
        structured: bool,
    ) -> Result<ImageBinaryChallenge> {
        let response = self.client.generate_content(model, request).await?;

        if let Some(dir) = &self.answer_dir {
            save_model_answer(dir, image, &response).await;
        }

        let answer = parse_answer(&response.content, structured)?;
        info!(
            "{} selected {} cells for \"{}\"",
            model,
            answer.coordinates.len(),
            answer.challenge_prompt
        );
        Ok(answer)
    }
}

#[async_trait]
impl ChallengeSolver for ImageClassifier {
    async fn solve(&self, image: &Path, model: &str) -> Result<ImageBinaryChallenge> {
        self.invoke_with_model(image, model).await
    }
}

fn uses_response_schema(model: &str, options: RequestOptions) -> bool {
    options.constraint_response_schema && !UNCONSTRAINED_MODELS.contains(&model)
}

/// Build the `generateContent` request for one screenshot
pub fn build_request(
    image: &[u8],
    mime_type: &str,
    model: &str,
    options: RequestOptions,
) -> GenerateContentRequest {
    let mut parts = vec![Part::inline_data(mime_type, STANDARD.encode(image))];
    let mut generation_config = GenerationConfig {
        temperature: 0.0,
        ..GenerationConfig::default()
    };

    if THINKING_BUDGET_MODELS.contains(&model) {
        generation_config.thinking_config =
            options.thinking_budget.map(|budget| ThinkingConfig {
                include_thoughts: true,
                thinking_budget: budget,
            });
    }

    if uses_response_schema(model, options) {
        parts.push(Part::text(USER_PROMPT));
        generation_config.response_mime_type = Some("application/json".to_string());
        generation_config.response_schema = Some(ImageBinaryChallenge::response_schema());
    }

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        system_instruction: Some(Content {
            role: None,
            parts: vec![Part::text(SYSTEM_INSTRUCTION)],
        }),
        generation_config,
    }
}

/// Decode the grid answer from a model response
///
/// Structured responses are parsed directly; free text, or structured text
/// that fails to parse, goes through [`extract_first_json_block`].
pub fn parse_answer(
    response: &GenerateContentResponse,
    structured: bool,
) -> Result<ImageBinaryChallenge> {
    let text = response
        .text()
        .ok_or_else(|| HcstatError::InvalidAnswer("response contains no text".to_string()))?;

    let parsed = if structured {
        serde_json::from_str::<serde_json::Value>(&text).ok()
    } else {
        None
    };
    if let Some(value) = parsed {
        return ImageBinaryChallenge::from_value(value);
    }

    let value = extract_first_json_block(&text)
        .ok_or_else(|| HcstatError::InvalidAnswer(format!("no JSON found in: {text}")))?;
    ImageBinaryChallenge::from_value(value)
}

/// Create the answer directory, failing if `dir` exists as something else
async fn prepare_answer_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    if !tokio::fs::metadata(dir).await?.is_dir() {
        return Err(HcstatError::InvalidArgument(format!(
            "answer directory is not a directory: {}",
            dir.display()
        )));
    }
    Ok(())
}

/// Persist a response that has already been billed
///
/// A failed write is logged and does not fail the call.
async fn save_model_answer(
    dir: &Path,
    image: &Path,
    response: &ModelResponse,
) -> Option<PathBuf> {
    match write_model_answer(dir, image, response).await {
        Ok(path) => {
            debug!("Saved model answer to {}", path.display());
            Some(path)
        }
        Err(e) => {
            warn!("Failed to save model answer in {}: {}", dir.display(), e);
            None
        }
    }
}

/// Write a raw response as `<image stem>_model_answer.json` inside `dir`
pub async fn write_model_answer(
    dir: &Path,
    image: &Path,
    response: &ModelResponse,
) -> Result<PathBuf> {
    let stem = image
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            HcstatError::InvalidArgument(format!("invalid image name: {}", image.display()))
        })?;

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{stem}{MODEL_ANSWER_SUFFIX}"));
    let json = serde_json::to_vec_pretty(&response.body)?;
    tokio::fs::write(&path, json).await?;
    Ok(path)
}

/// MIME type of a challenge screenshot, from its extension
pub fn image_mime_type(image: &Path) -> Result<&'static str> {
    let ext = image
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => Ok("image/png"),
        Some("jpg" | "jpeg") => Ok("image/jpeg"),
        Some("webp") => Ok("image/webp"),
        Some("gif") => Ok("image/gif"),
        _ => Err(HcstatError::InvalidArgument(format!(
            "unsupported image type: {}",
            image.display()
        ))),
    }
}
