use serde::Deserialize;
use ts_rs::TS;

// 创建试题请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct CreateQuestionRequest {
    pub title: String,
    pub content: String,
    pub scoring_criteria: Option<String>,
    pub prompt: Option<String>,
}

// 修改评分提示词请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct UpdatePromptRequest {
    pub prompt: Option<String>,
}
