use serde::Deserialize;
use ts_rs::TS;

// 提交/更新答案请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct SubmitAnswerRequest {
    pub content: String,
}
