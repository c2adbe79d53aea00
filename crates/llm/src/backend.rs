//! OpenAI-compatible backend
//!
//! Implements [`LanguageModel`] directly against `/chat/completions`. Tool
//! definitions are sent in the `{"type": "function", "function": {...}}`
//! envelope and tool-call arguments (a JSON string on the wire) are decoded
//! into the argument map of [`ToolCall`].

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use travel_desk_config::LlmSettings;
use travel_desk_core::{
    FinishReason, GenerateRequest, GenerateResponse, LanguageModel, Message, Role, TokenUsage,
    ToolCall, ToolDefinition,
};

use crate::LlmError;

/// Configuration for OpenAI-compatible backends
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API endpoint (OpenAI: https://api.openai.com/v1)
    pub endpoint: String,
    /// API key
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Default temperature when the request does not set one
    pub temperature: f32,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum retry attempts for transient failures
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry)
    pub initial_backoff: Duration,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            timeout: Duration::from_secs(30),
            max_retries: 2,
            initial_backoff: Duration::from_millis(250),
        }
    }
}

impl OpenAIConfig {
    /// Create config for OpenAI
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    /// Create config for a local OpenAI-compatible server (vLLM, Ollama, ...)
    pub fn local(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: String::new(),
            model: model.into(),
            ..Default::default()
        }
    }
}

impl From<&LlmSettings> for OpenAIConfig {
    fn from(settings: &LlmSettings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone().unwrap_or_default(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            timeout: Duration::from_secs(settings.timeout_secs),
            max_retries: settings.max_retries,
            initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
        }
    }
}

/// OpenAI-compatible backend
pub struct OpenAIBackend {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIBackend {
    /// Create new OpenAI backend
    pub fn new(config: OpenAIConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() && !config.endpoint.starts_with("http://localhost") {
            return Err(LlmError::Configuration(
                "API key required for remote endpoints".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Get the full API URL for chat completions
    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    /// Build request headers
    fn build_headers(&self) -> reqwest::header::HeaderMap {
        use reqwest::header::HeaderValue;

        let mut headers = reqwest::header::HeaderMap::new();

        if !self.config.api_key.is_empty() {
            let auth_value = format!("Bearer {}", self.config.api_key);
            if let Ok(val) = HeaderValue::from_str(&auth_value) {
                headers.insert(reqwest::header::AUTHORIZATION, val);
            }
        }

        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        headers
    }

    fn build_request(&self, request: &GenerateRequest, tools: &[ToolDefinition]) -> ChatRequest {
        let tools: Vec<WireTool> = tools.iter().map(WireTool::from).collect();
        ChatRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
            messages: request.messages.iter().map(WireMessage::from).collect(),
            max_tokens: request.max_tokens,
            temperature: Some(request.temperature.unwrap_or(self.config.temperature)),
            top_p: request.top_p,
            tool_choice: if tools.is_empty() { None } else { Some("auto") },
            tools,
        }
    }

    /// Send with retries
    async fn complete(&self, body: &ChatRequest) -> Result<GenerateResponse, LlmError> {
        let mut last_error: Option<LlmError> = None;
        let mut backoff = self.config.initial_backoff;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::warn!(
                    "LLM request failed, retrying in {:?} (attempt {}/{})",
                    backoff,
                    attempt,
                    self.config.max_retries
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }

            match self.execute_request(body).await {
                Ok(response) => return parse_response(response),
                Err(e) if Self::is_retryable(&e) => {
                    last_error = Some(e);
                }
                Err(e) => {
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Network("Max retries exceeded".to_string())))
    }

    /// Execute a single request (used by retry logic)
    async fn execute_request(&self, body: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let response = self
            .client
            .post(self.chat_url())
            .headers(self.build_headers())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            // 5xx errors are retryable, 4xx are not
            if status.is_server_error() {
                return Err(LlmError::Network(format!(
                    "Server error {}: {}",
                    status, error_text
                )));
            }
            return Err(LlmError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }

    /// Check if an error is retryable
    fn is_retryable(error: &LlmError) -> bool {
        matches!(error, LlmError::Network(_) | LlmError::Timeout)
    }
}

#[async_trait]
impl LanguageModel for OpenAIBackend {
    async fn generate(&self, request: GenerateRequest) -> travel_desk_core::Result<GenerateResponse> {
        let body = self.build_request(&request, &[]);
        let response = self.complete(&body).await?;
        tracing::debug!(
            model = %body.model,
            chars = response.text.len(),
            "LLM completion received"
        );
        Ok(response)
    }

    async fn generate_with_tools(
        &self,
        request: GenerateRequest,
        tools: &[ToolDefinition],
    ) -> travel_desk_core::Result<GenerateResponse> {
        let body = self.build_request(&request, tools);
        let response = self.complete(&body).await?;
        tracing::debug!(
            model = %body.model,
            tool_calls = response.tool_calls.len(),
            "LLM tool-selection response received"
        );
        Ok(response)
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/models", self.config.endpoint.trim_end_matches('/'));
        self.client
            .get(&url)
            .headers(self.build_headers())
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

fn parse_response(response: ChatResponse) -> Result<GenerateResponse, LlmError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| {
            let arguments: HashMap<String, serde_json::Value> =
                if call.function.arguments.trim().is_empty() {
                    HashMap::new()
                } else {
                    serde_json::from_str(&call.function.arguments).map_err(|e| {
                        LlmError::InvalidResponse(format!(
                            "arguments of {} are not a JSON object: {}",
                            call.function.name, e
                        ))
                    })?
                };
            Ok(ToolCall::new(call.id, call.function.name, arguments))
        })
        .collect::<Result<Vec<_>, LlmError>>()?;

    let finish_reason = match choice.finish_reason.as_deref() {
        Some("length") => FinishReason::Length,
        Some("tool_calls") | Some("function_call") => FinishReason::ToolCalls,
        Some("content_filter") => FinishReason::ContentFilter,
        _ if !tool_calls.is_empty() => FinishReason::ToolCalls,
        _ => FinishReason::Stop,
    };

    Ok(GenerateResponse {
        text: choice.message.content.unwrap_or_default(),
        finish_reason,
        usage: response
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens)),
        tool_calls,
    })
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
}

impl From<&Message> for WireMessage {
    fn from(m: &Message) -> Self {
        // Assistant turns that only carry tool calls send `content: null`
        let content = if m.role == Role::Assistant && !m.tool_calls.is_empty() && m.content.is_empty()
        {
            None
        } else {
            Some(m.content.clone())
        };

        Self {
            role: m.role.as_str(),
            content,
            name: m.name.clone(),
            tool_call_id: m.tool_call_id.clone(),
            tool_calls: m.tool_calls.iter().map(WireToolCall::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunction,
}

#[derive(Debug, Serialize)]
struct WireFunction {
    name: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<serde_json::Value>,
}

impl From<&ToolDefinition> for WireTool {
    fn from(tool: &ToolDefinition) -> Self {
        Self {
            kind: "function",
            function: WireFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: WireFunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

impl From<&ToolCall> for WireToolCall {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            kind: function_type(),
            function: WireFunctionCall {
                name: call.name.clone(),
                arguments: serde_json::to_string(&call.arguments).unwrap_or_else(|_| "{}".into()),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend() -> OpenAIBackend {
        OpenAIBackend::new(OpenAIConfig::openai("sk-test", "gpt-4o-mini")).unwrap()
    }

    #[test]
    fn test_backend_creation() {
        // Local endpoint should work without API key
        let config = OpenAIConfig::local("http://localhost:8000/v1", "test");
        assert!(OpenAIBackend::new(config).is_ok());

        // Remote endpoint requires API key
        assert!(matches!(
            OpenAIBackend::new(OpenAIConfig::default()),
            Err(LlmError::Configuration(_))
        ));
    }

    #[test]
    fn test_config_from_settings() {
        let settings = LlmSettings {
            api_key: Some("sk".to_string()),
            timeout_secs: 12,
            ..Default::default()
        };
        let config = OpenAIConfig::from(&settings);
        assert_eq!(config.api_key, "sk");
        assert_eq!(config.timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_chat_url() {
        let config = OpenAIConfig::local("http://localhost:8000/v1/", "test");
        let backend = OpenAIBackend::new(config).unwrap();
        assert_eq!(backend.chat_url(), "http://localhost:8000/v1/chat/completions");
    }

    #[test]
    fn test_request_with_tools() {
        let tools = vec![
            ToolDefinition::without_parameters("list_offers", "عروض"),
            ToolDefinition::new(
                "find_visa_details",
                "فيزا",
                json!({"type": "object", "properties": {"country": {"type": "string"}}}),
            ),
        ];
        let request = GenerateRequest::new("system")
            .with_user_message("مرحبا")
            .with_max_tokens(400);
        let body = backend().build_request(&request, &tools);
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["tool_choice"], "auto");
        assert_eq!(value["tools"][0]["type"], "function");
        assert_eq!(value["tools"][0]["function"]["name"], "list_offers");
        assert!(value["tools"][0]["function"].get("parameters").is_none());
        assert_eq!(
            value["tools"][1]["function"]["parameters"]["properties"]["country"]["type"],
            "string"
        );
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["max_tokens"], 400);
    }

    #[test]
    fn test_plain_request_omits_tools() {
        let request = GenerateRequest::new("translate")
            .with_user_message("نص")
            .with_temperature(0.1)
            .with_max_tokens(50);
        let value = serde_json::to_value(backend().build_request(&request, &[])).unwrap();

        assert!(value.get("tools").is_none());
        assert!(value.get("tool_choice").is_none());
        assert_eq!(value["max_tokens"], 50);
    }

    #[test]
    fn test_uncapped_request_omits_max_tokens() {
        let request = GenerateRequest::new("filter prompt").with_temperature(0.0);
        let body = backend().build_request(&request, &[]);
        assert_eq!(body.max_tokens, None);

        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("max_tokens").is_none());
        assert_eq!(value["temperature"], 0.0);
    }

    #[test]
    fn test_tool_result_messages_serialization() {
        let mut args = HashMap::new();
        args.insert("topic".to_string(), json!("countries"));
        let call = ToolCall::new("call_1", "get_all_company_info", args);

        let request = GenerateRequest::new("system")
            .with_message(Message::assistant_tool_calls(vec![call]))
            .with_message(Message::tool("[]", "call_1", "get_all_company_info"));
        let value = serde_json::to_value(backend().build_request(&request, &[])).unwrap();

        let assistant = &value["messages"][1];
        assert!(assistant["content"].is_null());
        assert_eq!(assistant["tool_calls"][0]["id"], "call_1");
        assert_eq!(assistant["tool_calls"][0]["type"], "function");
        let arguments: serde_json::Value = serde_json::from_str(
            assistant["tool_calls"][0]["function"]["arguments"].as_str().unwrap(),
        )
        .unwrap();
        assert_eq!(arguments, json!({"topic": "countries"}));

        let tool = &value["messages"][2];
        assert_eq!(tool["role"], "tool");
        assert_eq!(tool["tool_call_id"], "call_1");
        assert_eq!(tool["name"], "get_all_company_info");
    }

    #[test]
    fn test_parse_tool_call_response() {
        let raw = json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": {"name": "find_visa_details", "arguments": "{\"country\":\"مصر\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        });
        let response: ChatResponse = serde_json::from_value(raw).unwrap();
        let parsed = parse_response(response).unwrap();

        assert_eq!(parsed.finish_reason, FinishReason::ToolCalls);
        assert!(parsed.has_tool_calls());
        assert_eq!(parsed.tool_calls[0].name, "find_visa_details");
        assert_eq!(parsed.tool_calls[0].get_string("country"), Some("مصر"));
        assert_eq!(parsed.usage.map(|u| u.total_tokens), Some(15));
        assert!(parsed.text.is_empty());
    }

    #[test]
    fn test_parse_text_response() {
        let raw = json!({
            "choices": [{"message": {"content": "أهلاً بك"}, "finish_reason": "stop"}]
        });
        let parsed = parse_response(serde_json::from_value(raw).unwrap()).unwrap();
        assert_eq!(parsed.text, "أهلاً بك");
        assert!(!parsed.has_tool_calls());
    }

    #[test]
    fn test_parse_rejects_malformed_arguments() {
        let raw = json!({
            "choices": [{
                "message": {"tool_calls": [{
                    "id": "c", "type": "function",
                    "function": {"name": "find_service", "arguments": "{not json"}
                }]},
                "finish_reason": "tool_calls"
            }]
        });
        let result = parse_response(serde_json::from_value(raw).unwrap());
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_empty_choices() {
        let raw = json!({"choices": []});
        assert!(parse_response(serde_json::from_value(raw).unwrap()).is_err());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(OpenAIBackend::is_retryable(&LlmError::Timeout));
        assert!(OpenAIBackend::is_retryable(&LlmError::Network("reset".into())));
        assert!(!OpenAIBackend::is_retryable(&LlmError::Api("HTTP 400".into())));
    }
}
