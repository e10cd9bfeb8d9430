//! 通义千问（DashScope 文本生成接口）评分适配器

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{
    JUDGE_COOLDOWN, JudgeAdapter, JudgeError, JudgeRequest, JudgeVerdict, message_text,
    parse_verdict,
};

static SINGLE_QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[‘’]").expect("Invalid quote regex"));
static DOUBLE_QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[“”]").expect("Invalid quote regex"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

#[derive(Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    input: GenerationInput,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationInput {
    messages: Vec<InputMessage>,
}

#[derive(Serialize)]
struct InputMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct GenerationParameters {
    result_format: &'static str,
}

#[derive(Deserialize, Default)]
struct GenerationResponse {
    output: Option<GenerationOutput>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct GenerationOutput {
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

/// 整理模型输出，使其尽量成为合法 JSON
///
/// 中文引号换成英文引号，连续空白压缩为单个空格；
/// 若整个对象被一对引号包裹，则去掉这对引号。
pub(crate) fn normalize_output(raw: &str) -> String {
    let text = SINGLE_QUOTES.replace_all(raw, "'");
    let text = DOUBLE_QUOTES.replace_all(&text, "\"");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = text.trim();

    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            let inner = inner.trim();
            if inner.starts_with('{') && inner.ends_with('}') {
                return inner.to_string();
            }
        }
    }
    text.to_string()
}

pub struct QwenJudge {
    client: reqwest::Client,
    endpoint: String,
}

impl QwenJudge {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn build_body<'a>(request: &'a JudgeRequest<'_>) -> GenerationRequest<'a> {
        GenerationRequest {
            model: request.version,
            input: GenerationInput {
                messages: vec![InputMessage {
                    role: "user",
                    content: request.user_message(),
                }],
            },
            parameters: GenerationParameters {
                result_format: "message",
            },
        }
    }
}

#[async_trait::async_trait]
impl JudgeAdapter for QwenJudge {
    fn name(&self) -> &'static str {
        "qwen"
    }

    async fn judge(&self, request: &JudgeRequest<'_>) -> Result<JudgeVerdict, JudgeError> {
        debug!(model = request.version, endpoint = %self.endpoint, "发送 Qwen 评分请求");

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
                warn!("Qwen 评分请求未收到响应: {e}");
                return Err(JudgeError::NoResponse);
            }
        };

        let status = response.status();
        // 出错时响应体只有 code/message，没有 output
        let body: GenerationResponse = response.json().await.unwrap_or_default();

        let Some(output) = body.output else {
            warn!(
                http_status = status.as_u16(),
                code = body.code.as_deref().unwrap_or_default(),
                message = body.message.as_deref().unwrap_or_default(),
                "Qwen 未返回 output"
            );
            return Err(JudgeError::NoResponse);
        };

        let Some(raw) = output
            .choices
            .first()
            .and_then(|choice| message_text(&choice.message.content))
        else {
            warn!("Qwen 响应中没有可用的回答");
            return Err(JudgeError::NoResponse);
        };

        let text = normalize_output(&raw);
        info!(response = %text, "收到 Qwen 评分结果");

        if !status.is_success() {
            warn!("Qwen 评分请求返回错误状态: {status}");
            return Err(JudgeError::Status(status.as_u16()));
        }

        parse_verdict(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> JudgeRequest<'static> {
        JudgeRequest {
            answer: "生命周期标注描述引用之间的关系",
            prompt: "请评分",
            secret: "sk-qwen",
            version: "qwen-plus",
        }
    }

    fn generation(content: &str) -> String {
        serde_json::json!({
            "output": {
                "choices": [{
                    "finish_reason": "stop",
                    "message": {"role": "assistant", "content": content}
                }]
            },
            "usage": {"input_tokens": 20, "output_tokens": 12},
            "request_id": "req-1"
        })
        .to_string()
    }

    #[test]
    fn test_normalize_full_width_wrapped_object() {
        let normalized = normalize_output("“{\"score\": 85, \"reason\": \"好\"}”");
        assert_eq!(normalized, r#"{"score": 85, "reason": "好"}"#);

        let verdict = parse_verdict(&normalized).unwrap();
        assert_eq!(verdict.score, 85.0);
        assert_eq!(verdict.reason, "好");
    }

    #[test]
    fn test_normalize_quotes_and_whitespace() {
        let normalized = normalize_output("{\n  “score”: 70,\n\n  “reason”: ‘尚可’\n}");
        assert_eq!(normalized, r#"{ "score": 70, "reason": '尚可' }"#);

        let normalized = normalize_output("{\n  “score”: 70,\n  “reason”: “尚可”\n}");
        assert_eq!(parse_verdict(&normalized).unwrap().reason, "尚可");
    }

    #[tokio::test]
    async fn test_successful_grading_with_full_width_quotes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/services/aigc/text-generation/generation")
            .match_header("authorization", "Bearer sk-qwen")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "qwen-plus",
                "parameters": {"result_format": "message"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(generation("“{\"score\": 85, \"reason\": \"好\"}”"))
            .create_async()
            .await;

        let judge = QwenJudge::new(
            reqwest::Client::new(),
            format!(
                "{}/api/v1/services/aigc/text-generation/generation",
                server.url()
            ),
        );
        let verdict = judge.judge(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(verdict.score, 85.0);
        assert_eq!(verdict.reason, "好");
    }

    #[tokio::test]
    async fn test_missing_output_is_no_response() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{"code": "InvalidApiKey", "message": "Invalid API-key provided."}"#;
        server
            .mock("POST", "/")
            .with_status(401)
            .with_body(body)
            .create_async()
            .await;

        let judge = QwenJudge::new(reqwest::Client::new(), server.url());
        let err = judge.judge(&request()).await.unwrap_err();
        assert_eq!(err, JudgeError::NoResponse);
        assert_eq!(err.to_string(), "AI评分失败：未收到响应。");
    }

    #[tokio::test]
    async fn test_output_with_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(500)
            .with_body(generation(r#"{"score": 10, "reason": "x"}"#))
            .create_async()
            .await;

        let judge = QwenJudge::new(reqwest::Client::new(), server.url());
        assert_eq!(
            judge.judge(&request()).await.unwrap_err(),
            JudgeError::Status(500)
        );
    }

    #[tokio::test]
    async fn test_failure_paths_stay_distinct() {
        let cases = [
            ("分数 85", JudgeError::JsonDecode),
            ("[85]", JudgeError::NotAnObject),
            (r#"{"score": 85, "reason": ""}"#, JudgeError::MissingReason),
        ];
        for (content, expected) in cases {
            let mut server = mockito::Server::new_async().await;
            server
                .mock("POST", "/")
                .with_status(200)
                .with_body(generation(content))
                .create_async()
                .await;

            let judge = QwenJudge::new(reqwest::Client::new(), server.url());
            assert_eq!(judge.judge(&request()).await.unwrap_err(), expected);
        }
    }
}
