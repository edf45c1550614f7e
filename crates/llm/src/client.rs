use oneiro_core::ResponseMode;

use crate::error::GatewayError;
use crate::wire::{ChatMessage, ChatRequest, ChatResponse, ResponseFormat};

/// Default model requested from the provider.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Sampling temperature for interpretations.
const GENERATION_TEMPERATURE: f32 = 0.7;
/// Output budget for narrative prose (the "under 300 words" contract).
const NARRATIVE_MAX_TOKENS: u32 = 500;
/// Output budget for the structured JSON record.
const STRUCTURED_MAX_TOKENS: u32 = 800;

/// Client for the generative-text provider.
pub struct LlmClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) model: String,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Creates a new gateway client with the given API key and base URL.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(api_key: String, base_url: String) -> Result<Self, GatewayError> {
        let model = std::env::var("ONEIRO_LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| GatewayError::ClientInit(e.to_string()))?;
        Ok(Self { client, api_key, base_url, model })
    }

    /// Sets a custom model for this client.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single-turn prompt and return the raw text payload.
    ///
    /// No conversation history is forwarded; each call is independent.
    /// No automatic retries — a failed call is reported to the caller.
    ///
    /// # Errors
    /// `RateLimited` on 429, `HttpStatus` on other non-success statuses,
    /// `HttpRequest` on transport failures, `JsonParse`/`EmptyResponse`
    /// on a malformed envelope.
    pub async fn generate(
        &self,
        prompt: &str,
        mode: ResponseMode,
    ) -> Result<String, GatewayError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage { role: "user".to_owned(), content: prompt.to_owned() }],
            temperature: GENERATION_TEMPERATURE,
            max_tokens: match mode {
                ResponseMode::Narrative => NARRATIVE_MAX_TOKENS,
                ResponseMode::Structured => STRUCTURED_MAX_TOKENS,
            },
            response_format: (mode == ResponseMode::Structured)
                .then(|| ResponseFormat { format_type: "json_object".to_owned() }),
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body =
                response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());
            if status.as_u16() == 429 {
                return Err(GatewayError::RateLimited(body));
            }
            return Err(GatewayError::HttpStatus { code: status.as_u16(), body });
        }

        let body = response.text().await?;
        let chat_response: ChatResponse =
            serde_json::from_str(&body).map_err(|e| GatewayError::JsonParse {
                context: format!("chat completion response (body: {})", excerpt(&body, 200)),
                source: e,
            })?;

        let first_choice = chat_response.choices.first().ok_or(GatewayError::EmptyResponse)?;
        Ok(first_choice.message.content.clone())
    }
}

/// Truncates a string to the given maximum length at a char boundary.
fn excerpt(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end = end.saturating_sub(1);
    }
    s.get(..end).unwrap_or("")
}
