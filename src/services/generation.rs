//! 生成服务
//!
//! 将固定的提示词与用户输入拼接后发送给 Gemini，返回原始文本。
//! 不校验返回格式，也不做重试。

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::config::GenerationConfig;

/// 固定提示词，用户输入直接拼接在末尾
pub const AFFIRMATION_PROMPT: &str = r#"
You are a compassionate, uplifting affirmation assistant. Your role is to provide personalized daily affirmations based on how the user is feeling today.
Guidelines:
1. Always respond with kindness and empathy
2. Keep affirmations positive, present-tense, and personal (use "I" or "You")
3. Make them specific to the user's current emotional state
4. Provide 3 short affirmations (1 sentence each) that are easy to remember
5. Format the response clearly with each affirmation on a new line with a 🌟 emoji
Example for someone feeling anxious:
🌟 I am safe and in control of my breathing
🌟 My challenges help me grow stronger each day
🌟 I release worries and embrace peace in this moment
Now respond to the following user input:
"#;

/// 拼接提示词
pub fn build_prompt(user_text: &str) -> String {
    format!("{AFFIRMATION_PROMPT}{user_text}")
}

/// 生成失败
#[derive(Error, Debug)]
pub enum GenerationError {
    /// 网络或传输错误
    #[error("request failed: {0}")]
    Transport(String),

    /// 服务返回非成功状态
    #[error("{status}: {message}")]
    Api { status: u16, message: String },

    /// 响应中没有文本
    #[error("the model returned no text")]
    EmptyResponse,

    /// 响应无法解析
    #[error("failed to parse response: {0}")]
    Parse(String),
}

/// 文本生成模型 trait
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// 发送完整提示词，返回模型输出的文本
    async fn generate_content(&self, prompt: &str) -> Result<String, GenerationError>;

    /// 模型名称
    fn model_name(&self) -> &str;
}

/// Gemini REST 客户端
pub struct GeminiModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiModel {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// 按配置创建客户端，API 密钥从环境变量读取
    pub fn from_config(config: &GenerationConfig) -> Self {
        let api_key = config.api_key();
        if api_key.is_empty() {
            warn!(
                "{} is not set; generation requests will fail",
                config.api_key_env
            );
        }
        Self::new(api_key, &config.model, &config.base_url)
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn generate_content(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!("Calling {} ({} prompt bytes)", self.model, prompt.len());

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.without_url().to_string()))?;

        extract_text(parsed)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
    let parts = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .unwrap_or_default();

    let text: String = parts.into_iter().filter_map(|part| part.text).collect();
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}

fn map_http_error(status: StatusCode, body: String) -> GenerationError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    GenerationError::Api {
        status: status.as_u16(),
        message,
    }
}

/// 生成客户端：拼接提示词并调用一次模型
#[derive(Clone)]
pub struct GenerationClient {
    model: Arc<dyn LanguageModel>,
}

impl GenerationClient {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// 返回模型的原始输出，不做修改；空输出视为 [`GenerationError::EmptyResponse`]
    pub async fn generate(&self, user_text: &str) -> Result<String, GenerationError> {
        let text = self.model.generate_content(&build_prompt(user_text)).await?;
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("model", &self.model.model_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gemini_reply(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })
    }

    #[test]
    fn test_prompt_template_shape() {
        assert!(AFFIRMATION_PROMPT.starts_with("\nYou are a compassionate"));
        assert!(AFFIRMATION_PROMPT.ends_with("Now respond to the following user input:\n"));
        assert!(AFFIRMATION_PROMPT.contains("Provide 3 short affirmations"));
        assert_eq!(AFFIRMATION_PROMPT.matches('🌟').count(), 4);
    }

    #[test]
    fn test_build_prompt_appends_input() {
        let prompt = build_prompt("anxious");
        assert!(prompt.ends_with("Now respond to the following user input:\nanxious"));
        assert_eq!(prompt.len(), AFFIRMATION_PROMPT.len() + "anxious".len());
    }

    #[tokio::test]
    async fn test_gemini_success_returns_raw_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": build_prompt("tired")}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("🌟 A\n🌟 B\n🌟 C")))
            .expect(1)
            .mount(&server)
            .await;

        let model = GeminiModel::new("test-key", "gemini-1.5-flash", server.uri());
        let client = GenerationClient::new(Arc::new(model));

        let text = client.generate("tired").await.unwrap();
        assert_eq!(text, "🌟 A\n🌟 B\n🌟 C");
    }

    #[tokio::test]
    async fn test_gemini_concatenates_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "🌟 A\n"}, {"text": "🌟 B"}]}}]
            })))
            .mount(&server)
            .await;

        let model = GeminiModel::new("k", "m", format!("{}/", server.uri()));
        assert_eq!(model.generate_content("p").await.unwrap(), "🌟 A\n🌟 B");
    }

    #[tokio::test]
    async fn test_gemini_api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let model = GeminiModel::new("", "gemini-1.5-flash", server.uri());
        let err = model.generate_content("p").await.unwrap_err();

        match err {
            GenerationError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "INVALID_ARGUMENT: API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_gemini_plain_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let model = GeminiModel::new("k", "m", server.uri());
        let err = model.generate_content("p").await.unwrap_err();
        assert_eq!(err.to_string(), "503: overloaded");
    }

    #[tokio::test]
    async fn test_gemini_without_candidates_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let model = GeminiModel::new("k", "m", server.uri());
        assert!(matches!(
            model.generate_content("p").await,
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_gemini_blank_text_part_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": ""}]}}]
            })))
            .mount(&server)
            .await;

        let model = GeminiModel::new("k", "m", server.uri());
        assert!(matches!(
            model.generate_content("p").await,
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_gemini_transport_error() {
        // 端口 1 上没有服务
        let model = GeminiModel::new("k", "m", "http://127.0.0.1:1");
        assert!(matches!(
            model.generate_content("p").await,
            Err(GenerationError::Transport(_))
        ));
    }
}
