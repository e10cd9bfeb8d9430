//! OpenAI 兼容的 chat completions 评分适配器

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{
    JUDGE_COOLDOWN, JudgeAdapter, JudgeError, JudgeRequest, JudgeVerdict, message_text,
    parse_verdict,
};

/// 单次评分允许模型输出的最大 token 数
const MAX_TOKENS: u32 = 300;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Serialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Value,
}

pub struct GptJudge {
    client: reqwest::Client,
    endpoint: String,
}

impl GptJudge {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn build_body<'a>(request: &'a JudgeRequest<'_>) -> ChatRequest<'a> {
        ChatRequest {
            model: request.version,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![ContentPart {
                    kind: "text",
                    text: request.user_message(),
                }],
            }],
            max_tokens: MAX_TOKENS,
        }
    }
}

#[async_trait::async_trait]
impl JudgeAdapter for GptJudge {
    fn name(&self) -> &'static str {
        "gpt"
    }

    async fn judge(&self, request: &JudgeRequest<'_>) -> Result<JudgeVerdict, JudgeError> {
        debug!(model = request.version, endpoint = %self.endpoint, "发送 GPT 评分请求");

        let sent = self
            .client
            .post(&self.endpoint)
            .bearer_auth(request.secret)
            .json(&Self::build_body(request))
            .send()
            .await;
        tokio::time::sleep(JUDGE_COOLDOWN).await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                warn!("GPT 评分请求未收到响应: {e}");
                return Err(JudgeError::NoResponse);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("GPT 评分请求返回错误状态: {status}");
            return Err(JudgeError::Status(status.as_u16()));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            warn!("GPT 响应体解析失败: {e}");
            JudgeError::Unexpected(format!("无法解析 GPT 响应体: {e}"))
        })?;

        let Some(text) = body
            .choices
            .first()
            .and_then(|choice| message_text(&choice.message.content))
        else {
            warn!("GPT 响应中没有可用的回答");
            return Err(JudgeError::NoResponse);
        };

        info!(response = %text, "收到 GPT 评分结果");
        parse_verdict(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> JudgeRequest<'static> {
        JudgeRequest {
            answer: "所有权在赋值时转移",
            prompt: "请评分",
            secret: "sk-test",
            version: "gpt-4o-mini",
        }
    }

    fn completion(content: &str) -> String {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_successful_grading() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 300,
                "messages": [{
                    "role": "user",
                    "content": [{
                        "type": "text",
                        "text": "请评分\n#### 考生的答案\n所有权在赋值时转移"
                    }]
                }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion(r#"{"score": 92, "reason": "表述准确"}"#))
            .create_async()
            .await;

        let judge = GptJudge::new(
            reqwest::Client::new(),
            format!("{}/v1/chat/completions", server.url()),
        );
        let verdict = judge.judge(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(verdict.score, 92.0);
        assert_eq!(verdict.reason, "表述准确");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let judge = GptJudge::new(reqwest::Client::new(), server.url());
        let err = judge.judge(&request()).await.unwrap_err();

        assert_eq!(err, JudgeError::Status(429));
        assert_eq!(err.to_string(), "AI评分失败：错误码429。");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        // 端口 9 (discard) 在测试环境中不会有服务监听
        let url = "http://127.0.0.1:9/v1/chat/completions";
        let judge = GptJudge::new(reqwest::Client::new(), url);
        let err = judge.judge(&request()).await.unwrap_err();
        assert_eq!(err, JudgeError::NoResponse);
    }

    #[tokio::test]
    async fn test_non_json_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(completion("这份答案可以得 80 分"))
            .create_async()
            .await;

        let judge = GptJudge::new(reqwest::Client::new(), server.url());
        let err = judge.judge(&request()).await.unwrap_err();
        assert_eq!(err, JudgeError::JsonDecode);
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let judge = GptJudge::new(reqwest::Client::new(), server.url());
        assert_eq!(
            judge.judge(&request()).await.unwrap_err(),
            JudgeError::NoResponse
        );
    }

    #[tokio::test]
    async fn test_garbled_envelope_is_unexpected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let judge = GptJudge::new(reqwest::Client::new(), server.url());
        let err = judge.judge(&request()).await.unwrap_err();
        assert!(matches!(err, JudgeError::Unexpected(_)));
    }
}
