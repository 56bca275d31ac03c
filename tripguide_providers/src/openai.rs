use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};
use tripguide_core::{
    ChatMessage, CompletionError, CompletionOptions, LLMProvider, LLMResponse, Usage,
};

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    pub fn new(api_key: String) -> Self {
        info!("Creating OpenAIProvider");
        Self {
            client: Client::new(),
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn try_send(&self, request: &serde_json::Value) -> Result<LLMResponse, CompletionError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(CompletionError::from_status(
                status.as_u16(),
                error_message(&body),
            ));
        }

        parse_completion(&body)
    }
}

/// Pull `error.message` out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn parse_completion(body: &str) -> Result<LLMResponse, CompletionError> {
    let response: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

    let content = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| CompletionError::MalformedResponse("missing content".to_string()))?
        .to_string();

    let usage = response["usage"].as_object().map(|u| Usage {
        prompt_tokens: u32::try_from(u["prompt_tokens"].as_u64().unwrap_or(0)).unwrap_or(0),
        completion_tokens: u32::try_from(u["completion_tokens"].as_u64().unwrap_or(0))
            .unwrap_or(0),
        total_tokens: u32::try_from(u["total_tokens"].as_u64().unwrap_or(0)).unwrap_or(0),
    });

    Ok(LLMResponse { content, usage })
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<LLMResponse, CompletionError> {
        let request = json!({
            "model": options.model,
            "messages": messages,
            "temperature": options.temperature,
            "max_tokens": options.max_tokens,
        });

        info!(
            "Sending request to OpenAI API: model={}, messages={}",
            options.model,
            messages.len()
        );

        let response = self.try_send(&request).await?;

        if let Some(usage) = response.usage {
            debug!(
                "Tokens: {} prompt + {} completion = {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }
        info!("Received response from OpenAI API");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion_body(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 9,
                "completion_tokens": 12,
                "total_tokens": 21
            }
        })
    }

    fn provider_for(server: &MockServer) -> OpenAIProvider {
        OpenAIProvider::new("sk-proj-test".to_string()).with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_chat_sends_generation_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-proj-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "temperature": 0.5,
                "max_tokens": 400,
                "messages": [
                    { "role": "system", "content": "guide" },
                    { "role": "user", "content": "Plan a day in Lisbon" }
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_body("### About the city")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let messages = vec![
            ChatMessage::system("guide"),
            ChatMessage::user("Plan a day in Lisbon"),
        ];
        let response = match provider
            .chat(&messages, &CompletionOptions::default())
            .await
        {
            Ok(response) => response,
            Err(e) => panic!("expected a completion, got {e}"),
        };
        assert_eq!(response.content, "### About the city");
        assert_eq!(
            response.usage,
            Some(Usage {
                prompt_tokens: 9,
                completion_tokens: 12,
                total_tokens: 21
            })
        );
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let result = provider
            .chat(&[ChatMessage::user("hi")], &CompletionOptions::default())
            .await;

        match result {
            Err(CompletionError::Authentication { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("expected authentication error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_quota_maps_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let result = provider
            .chat(&[ChatMessage::user("hi")], &CompletionOptions::default())
            .await;

        assert!(matches!(result, Err(CompletionError::RateLimited(ref m)) if m == "quota exceeded"));
    }

    #[tokio::test]
    async fn test_missing_content_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let result = provider
            .chat(&[ChatMessage::user("hi")], &CompletionOptions::default())
            .await;

        assert!(matches!(result, Err(CompletionError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let provider = OpenAIProvider::new("sk-proj-test".to_string())
            .with_base_url("http://127.0.0.1:9".to_string());
        let result = provider
            .chat(&[ChatMessage::user("hi")], &CompletionOptions::default())
            .await;

        assert!(matches!(result, Err(CompletionError::Network(_))));
    }

    #[test]
    fn test_non_json_error_body_is_kept_verbatim() {
        assert_eq!(error_message("  upstream timeout \n"), "upstream timeout");
        assert_eq!(
            error_message(r#"{"error":{"message":"You exceeded your current quota"}}"#),
            "You exceeded your current quota"
        );
    }
}
