//! OpenAI chat and image completion.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{join_url, read_json, transport_error};
use crate::common::error::{AppError, AppResult};
use crate::config::settings::OpenAiSettings;

pub const PROVIDER: &str = "openai";

const IMAGE_SIZE: &str = "1024x1024";

#[derive(Debug, Clone, Default)]
pub struct ChatPrompt {
    pub system: Option<String>,
    pub user: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl ChatPrompt {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            user: text.into(),
            ..Self::default()
        }
    }

    pub fn with_system(mut self, text: impl Into<String>) -> Self {
        self.system = Some(text.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    n: u8,
    size: &'static str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    pub fn new(http: Client, settings: &OpenAiSettings) -> Self {
        Self {
            http,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
        }
    }

    /// Runs one chat completion and returns the trimmed text of the first choice.
    ///
    /// An empty string means the model answered with no content.
    pub async fn complete(&self, prompt: &ChatPrompt) -> AppResult<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &prompt.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &prompt.user,
        });

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: prompt.temperature,
            max_tokens: prompt.max_tokens,
        };

        debug!("Requesting chat completion from {}", self.model);
        let response = self
            .http
            .post(join_url(&self.base_url, "/v1/chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error(PROVIDER))?;

        let parsed: ChatResponse = read_json(PROVIDER, response).await?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::contract(PROVIDER, "completion has no choices"))?;

        Ok(choice.message.content.unwrap_or_default().trim().to_string())
    }

    /// Generates a single square image and returns its URL.
    pub async fn generate_image(&self, prompt: &str) -> AppResult<String> {
        let request = ImageRequest {
            prompt,
            n: 1,
            size: IMAGE_SIZE,
        };

        let response = self
            .http
            .post(join_url(&self.base_url, "/v1/images/generations"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error(PROVIDER))?;

        let parsed: ImageResponse = read_json(PROVIDER, response).await?;
        let url = parsed
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::contract(PROVIDER, "image response has no url"))?;

        info!("Image generated");
        Ok(url)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub(crate) fn client(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new(
            Client::new(),
            &OpenAiSettings {
                api_key: "sk-test".into(),
                base_url: server.uri(),
                model: "gpt-3.5-turbo".into(),
            },
        )
    }

    pub(crate) fn chat_reply(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        }))
    }

    #[tokio::test]
    async fn complete_sends_messages_and_trims_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-3.5-turbo",
                "temperature": 0.5,
                "messages": [
                    { "role": "system", "content": "be brief" },
                    { "role": "user", "content": "hi" }
                ]
            })))
            .respond_with(chat_reply("  hello there \n"))
            .expect(1)
            .mount(&server)
            .await;

        let prompt = ChatPrompt::user("hi")
            .with_system("be brief")
            .with_temperature(0.5);
        let text = client(&server).complete(&prompt).await.unwrap();

        assert_eq!(text, "hello there");
    }

    #[tokio::test]
    async fn complete_without_choices_violates_contract() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let err = client(&server)
            .complete(&ChatPrompt::user("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ProviderContractViolation { provider: "openai", .. }));
    }

    #[tokio::test]
    async fn http_errors_become_provider_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "Your request was rejected by the safety system." }
            })))
            .mount(&server)
            .await;

        let err = client(&server).generate_image("anything").await.unwrap_err();

        match err {
            AppError::Provider { provider, status, message } => {
                assert_eq!(provider, "openai");
                assert_eq!(status, 400);
                assert!(message.contains("safety system"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_image_returns_first_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .and(body_partial_json(json!({ "prompt": "a cat", "n": 1, "size": "1024x1024" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "created": 1,
                "data": [{ "url": "https://img.example/cat.png" }]
            })))
            .mount(&server)
            .await;

        let url = client(&server).generate_image("a cat").await.unwrap();

        assert_eq!(url, "https://img.example/cat.png");
    }
}
