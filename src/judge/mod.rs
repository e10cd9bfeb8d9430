//! 大模型评分适配器
//!
//! 每个适配器把 (答案, 评分提示词, 密钥, 模型版本) 交给对应的服务商，
//! 再把服务商五花八门的响应统一成 [`JudgeVerdict`]。所有失败都以
//! [`JudgeError`] 返回，其 `Display` 文本即写入评分记录的原因。

mod gpt;
mod qwen;
mod registry;

use std::time::Duration;

use serde_json::{Map, Value};

use crate::models::feedbacks::entities::is_valid_score;

pub use gpt::GptJudge;
pub use qwen::QwenJudge;
pub use registry::{JudgeRegistry, ModelFamily};

/// 每次调用服务商后固定等待的时间
pub const JUDGE_COOLDOWN: Duration = Duration::from_millis(500);

/// 拼接在评分提示词与考生答案之间的分隔标题
const ANSWER_HEADING: &str = "\n#### 考生的答案\n";

/// 一次评分请求
#[derive(Debug, Clone, Copy)]
pub struct JudgeRequest<'a> {
    pub answer: &'a str,
    pub prompt: &'a str,
    pub secret: &'a str,
    pub version: &'a str,
}

impl JudgeRequest<'_> {
    /// 发送给模型的完整用户消息
    pub fn user_message(&self) -> String {
        format!("{}{}{}", self.prompt, ANSWER_HEADING, self.answer)
    }
}

/// 规范化后的评分结果
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeVerdict {
    pub score: f64,
    pub reason: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum JudgeError {
    #[error("AI评分失败：未收到响应。")]
    NoResponse,

    #[error("AI评分失败：错误码{0}。")]
    Status(u16),

    #[error("AI评分失败：JSON解析错误。")]
    JsonDecode,

    #[error("AI评分失败：格式错误。")]
    NotAnObject,

    #[error("AI评分失败：未提供评分原因。")]
    MissingReason,

    /// 模型给出了原因但没有分数，原因原样保留
    #[error("{}", missing_score_text(.0))]
    MissingScore(String),

    #[error("AI评分失败：评分无效（{0}）。")]
    InvalidScore(String),

    #[error("无效的大模型选择(仅支持GPT和Qwen)")]
    UnsupportedFamily,

    /// 适配器内部的意外错误，细节只用于日志
    #[error("AI评分过程中发生错误。")]
    Unexpected(String),
}

fn missing_score_text(reason: &str) -> &str {
    if reason.trim().is_empty() {
        "AI评分失败：未提供评分。"
    } else {
        reason
    }
}

#[async_trait::async_trait]
pub trait JudgeAdapter: Send + Sync {
    /// 服务商名称，用于日志
    fn name(&self) -> &'static str;

    async fn judge(&self, request: &JudgeRequest<'_>) -> Result<JudgeVerdict, JudgeError>;
}

/// 从模型返回的消息内容中取出文本
///
/// 内容可能是字符串，也可能是 `[{"type": "text", "text": ...}]` 形式的分段数组。
pub(crate) fn message_text(content: &Value) -> Option<String> {
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => {
            let text: String = parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect();
            (!text.is_empty()).then_some(text)
        }
        _ => None,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn score_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 把模型输出解析为评分结果
///
/// 输出必须是 JSON 对象。`score` 与 `reason` 以外的字段不会丢弃，
/// 而是逐个追加到原因末尾。
pub fn parse_verdict(text: &str) -> Result<JudgeVerdict, JudgeError> {
    let value: Value = serde_json::from_str(text.trim()).map_err(|_| JudgeError::JsonDecode)?;
    let Value::Object(mut object) = value else {
        return Err(JudgeError::NotAnObject);
    };

    let score = object.remove("score");
    let mut reason = object
        .remove("reason")
        .map(|v| value_text(&v))
        .unwrap_or_default();
    append_extra_fields(&mut reason, &object);

    let score = match score {
        None | Some(Value::Null) => return Err(JudgeError::MissingScore(reason)),
        Some(raw) => raw,
    };
    if reason.trim().is_empty() {
        return Err(JudgeError::MissingReason);
    }

    match score_of(&score) {
        Some(score) if is_valid_score(score) => Ok(JudgeVerdict { score, reason }),
        _ => Err(JudgeError::InvalidScore(value_text(&score))),
    }
}

fn append_extra_fields(reason: &mut String, extra: &Map<String, Value>) {
    for value in extra.values() {
        reason.push_str(&value_text(value));
        reason.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_layout() {
        let req = JudgeRequest {
            answer: "借用检查",
            prompt: "按 JSON 评分",
            secret: "sk",
            version: "gpt-4o-mini",
        };
        assert_eq!(
            req.user_message(),
            "按 JSON 评分\n#### 考生的答案\n借用检查"
        );
    }

    #[test]
    fn test_parse_plain_verdict() {
        let verdict = parse_verdict(r#"{"score": 85, "reason": "思路清晰"}"#).unwrap();
        assert_eq!(verdict.score, 85.0);
        assert_eq!(verdict.reason, "思路清晰");
    }

    #[test]
    fn test_parse_numeric_string_score() {
        let verdict = parse_verdict(r#"{"score": "72.5", "reason": "基本正确"}"#).unwrap();
        assert_eq!(verdict.score, 72.5);
    }

    #[test]
    fn test_extra_fields_join_reason() {
        let verdict =
            parse_verdict(r#"{"score": 60, "reason": "部分正确。", "suggestion": "补充例子"}"#)
                .unwrap();
        assert_eq!(verdict.reason, "部分正确。补充例子\n");
    }

    #[test]
    fn test_failure_texts_are_distinct() {
        let decode = parse_verdict("score: 85").unwrap_err();
        let shape = parse_verdict("[85, \"好\"]").unwrap_err();
        let reason = parse_verdict(r#"{"score": 85, "reason": ""}"#).unwrap_err();

        assert_eq!(decode, JudgeError::JsonDecode);
        assert_eq!(shape, JudgeError::NotAnObject);
        assert_eq!(reason, JudgeError::MissingReason);
        assert!(decode.to_string().contains("JSON解析错误"));
        assert!(shape.to_string().contains("格式错误"));
        assert!(reason.to_string().contains("未提供评分原因"));
    }

    #[test]
    fn test_missing_score_keeps_reason() {
        let err = parse_verdict(r#"{"reason": "答案与题目无关"}"#).unwrap_err();
        assert_eq!(err.to_string(), "答案与题目无关");

        let err = parse_verdict(r#"{"score": null}"#).unwrap_err();
        assert_eq!(err.to_string(), "AI评分失败：未提供评分。");
    }

    #[test]
    fn test_out_of_range_score() {
        assert!(matches!(
            parse_verdict(r#"{"score": 250, "reason": "满分"}"#),
            Err(JudgeError::InvalidScore(_))
        ));
        assert!(matches!(
            parse_verdict(r#"{"score": "优秀", "reason": "很好"}"#),
            Err(JudgeError::InvalidScore(_))
        ));
    }

    #[test]
    fn test_message_text_from_parts() {
        let content = serde_json::json!([
            {"type": "text", "text": "{\"score\": 1,"},
            {"text": " \"reason\": \"x\"}"}
        ]);
        assert_eq!(
            message_text(&content).as_deref(),
            Some("{\"score\": 1, \"reason\": \"x\"}")
        );
        assert_eq!(message_text(&Value::Null), None);
    }
}
