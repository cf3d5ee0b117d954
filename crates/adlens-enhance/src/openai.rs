//! OpenAI-backed enhancer
//!
//! Calls the chat completions endpoint with a prompt requesting the five
//! insight fields as JSON, and prices the call from the usage block the API
//! reports. Timeouts surface as [`adlens_core::Error::Timeout`] and follow
//! the same failure path as transport errors.

use adlens_core::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::enhancer::{EnhancementContext, Enhancer, EnhancerReply, RawInsights};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Rough token estimate per whitespace-delimited word
const TOKENS_PER_WORD: f64 = 1.3;
/// Expected completion size for the small JSON response
const ESTIMATED_OUTPUT_TOKENS: f64 = 50.0;
/// Prompt overhead beyond the ad text itself
const PROMPT_OVERHEAD_TOKENS: f64 = 120.0;

/// Per-1K-token pricing in USD: (input, output)
fn pricing(model: &str) -> (f64, f64) {
    match model {
        "gpt-4o-mini" => (0.000150, 0.000600),
        "gpt-4o" => (0.0050, 0.0150),
        "gpt-3.5-turbo" => (0.0005, 0.0015),
        _ => (0.001, 0.001),
    }
}

/// Enhancer backed by the OpenAI chat completions API
pub struct OpenAiEnhancer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiEnhancer {
    /// Create an enhancer using the default model and a 10s timeout
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Create an enhancer with a custom call timeout
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::enhancement(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL (self-hosted gateways, tests)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn prompt(text: &str, context: Option<&EnhancementContext>) -> String {
        let industry_context = context
            .and_then(|ctx| ctx.industry.as_deref())
            .map(|industry| format!(" for a {industry} business"))
            .unwrap_or_default();

        format!(
            r#"Analyze this ad copy{industry_context} and return emotional insights in JSON format:

"{text}"

Return exactly this JSON structure:
{{
    "emotional_tone": "[confident/playful/urgent/trustworthy/serious/friendly]",
    "target_audience": "[young_professionals/families/entrepreneurs/students/seniors/etc]",
    "emotional_intensity": [1-10 scale],
    "brand_personality": "[premium/budget/authoritative/casual/innovative/traditional]",
    "persuasion_approach": "[logical/emotional/social/urgency-based]"
}}"#
        )
    }
}

#[async_trait]
impl Enhancer for OpenAiEnhancer {
    async fn invoke(
        &self,
        text: &str,
        context: Option<&EnhancementContext>,
    ) -> Result<EnhancerReply> {
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": Self::prompt(text, context)}],
            "max_tokens": 100,
            "temperature": 0.1,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout
                } else {
                    Error::enhancement(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::enhancement(format!(
                "provider returned {status}: {detail}"
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| Error::enhancement(format!("malformed completion payload: {e}")))?;

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.trim())
            .ok_or_else(|| Error::enhancement("completion carried no choices"))?;

        let insights: RawInsights = serde_json::from_str(strip_code_fences(content))
            .map_err(|e| Error::enhancement(format!("malformed insight payload: {e}")))?;

        let (input_price, output_price) = pricing(&self.model);
        let cost = completion.usage.prompt_tokens as f64 / 1000.0 * input_price
            + completion.usage.completion_tokens as f64 / 1000.0 * output_price;

        tracing::debug!(
            model = %self.model,
            prompt_tokens = completion.usage.prompt_tokens,
            completion_tokens = completion.usage.completion_tokens,
            cost,
            "enhancement call completed"
        );

        Ok(EnhancerReply { insights, cost })
    }

    fn estimate_cost(&self, text: &str) -> f64 {
        let input_tokens =
            text.split_whitespace().count() as f64 * TOKENS_PER_WORD + PROMPT_OVERHEAD_TOKENS;
        let (input_price, output_price) = pricing(&self.model);
        input_tokens / 1000.0 * input_price + ESTIMATED_OUTPUT_TOKENS / 1000.0 * output_price
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Models sometimes wrap the JSON answer in a markdown fence
fn strip_code_fences(content: &str) -> &str {
    content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: ChatUsage,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize, Default)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_cost_scales_with_text_length() {
        let enhancer = OpenAiEnhancer::new("test-key").unwrap();

        let short = enhancer.estimate_cost("Save now");
        let long = enhancer.estimate_cost(&"word ".repeat(500));
        assert!(short > 0.0);
        assert!(long > short);
    }

    #[test]
    fn test_prompt_includes_industry_context() {
        let context = EnhancementContext::industry("retail");
        let prompt = OpenAiEnhancer::prompt("Big sale", Some(&context));
        assert!(prompt.contains("for a retail business"));
        assert!(prompt.contains("Big sale"));

        let bare = OpenAiEnhancer::prompt("Big sale", None);
        assert!(!bare.contains("for a"));
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_completion_deserialization() {
        let payload = r#"{
            "choices": [{"message": {"content": "{\"emotional_tone\": \"urgent\"}"}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 40}
        }"#;

        let completion: ChatCompletion = serde_json::from_str(payload).unwrap();
        assert_eq!(completion.usage.prompt_tokens, 120);
        assert_eq!(completion.choices.len(), 1);
    }
}
