//! Hugging Face Inference API generator.
//!
//! Tries each configured model once, in order, and returns the first JSON
//! body any of them produces. No backoff is applied between candidates.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument, warn};

use flashnotes_core::error::{Attempt, AttemptError, FallthroughPolicy, GenerationError};
use flashnotes_core::model::truncate_chars;
use flashnotes_core::traits::{build_prompt, RawGeneration, TextGenerator};

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 512;
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Candidate models, best first.
pub const DEFAULT_MODELS: &[&str] = &[
    "google/flan-t5-base",
    "google/flan-t5-small",
    "bigscience/mt0-small",
    "bigscience/T0pp",
];

/// Error bodies are cut to this many characters in logs and errors.
const ERROR_BODY_LIMIT: usize = 300;

/// Settings for [`HuggingFaceGenerator`].
#[derive(Clone)]
pub struct HuggingFaceSettings {
    pub base_url: String,
    /// Bearer token. Requests are sent unauthenticated when absent.
    pub api_token: Option<String>,
    pub models: Vec<String>,
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub timeout_secs: u64,
    pub fallthrough: FallthroughPolicy,
}

impl Default for HuggingFaceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            fallthrough: FallthroughPolicy::default(),
        }
    }
}

/// Hugging Face text generation over a ranked list of models.
pub struct HuggingFaceGenerator {
    settings: HuggingFaceSettings,
    client: reqwest::Client,
}

impl HuggingFaceGenerator {
    pub fn new(settings: HuggingFaceSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { settings, client })
    }

    /// The candidate models in the order they are tried.
    pub fn models(&self) -> &[String] {
        &self.settings.models
    }

    #[instrument(skip(self, prompt))]
    async fn call_model(&self, model: &str, prompt: &str) -> Result<serde_json::Value, AttemptError> {
        let endpoint = format!(
            "{}/models/{}?wait_for_model=true",
            self.settings.base_url.trim_end_matches('/'),
            model
        );
        let body = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_new_tokens: self.settings.max_new_tokens,
                temperature: self.settings.temperature,
            },
        };

        let mut request = self.client.post(&endpoint).json(&body);
        if let Some(token) = &self.settings.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = truncate_chars(&text, ERROR_BODY_LIMIT).to_string();
            warn!(status = status.as_u16(), body = %message, "inference endpoint returned an error");
            return Err(AttemptError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<serde_json::Value>().await.map_err(|e| {
            if e.is_timeout() {
                AttemptError::Timeout(self.settings.timeout_secs)
            } else {
                AttemptError::Decode(e.to_string())
            }
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> AttemptError {
        if e.is_timeout() {
            AttemptError::Timeout(self.settings.timeout_secs)
        } else if e.is_connect() {
            AttemptError::Network(format!(
                "inference endpoint not reachable at {}: {e}",
                self.settings.base_url
            ))
        } else {
            AttemptError::Network(e.to_string())
        }
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f64,
}

#[async_trait]
impl TextGenerator for HuggingFaceGenerator {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn generate(&self, notes: &str) -> Result<RawGeneration, GenerationError> {
        let prompt = build_prompt(notes);
        let mut attempts = Vec::new();

        for model in &self.settings.models {
            match self.call_model(model, &prompt).await {
                Ok(body) => {
                    info!(model = %model, failed_before = attempts.len(), "inference succeeded");
                    return Ok(RawGeneration {
                        model: model.clone(),
                        body,
                    });
                }
                Err(error) => {
                    warn!(model = %model, "candidate model failed: {error}");
                    if !self.settings.fallthrough.should_continue(&error) {
                        return Err(GenerationError::Aborted {
                            model: model.clone(),
                            error,
                        });
                    }
                    attempts.push(Attempt {
                        model: model.clone(),
                        error,
                    });
                }
            }
        }

        Err(GenerationError::Exhausted { attempts })
    }
}
