use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 试题
///
/// `open_at` 仅在试题处于公开状态时有值：首次公开时写入，封闭时清空。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct Question {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub content: String,
    pub scoring_criteria: Option<String>,
    /// 交给评分模型的评分说明
    pub prompt: Option<String>,
    pub is_open: bool,
    pub open_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Question {
    /// 评分时使用的提示词，未设置时为空串
    pub fn grading_prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or_default()
    }
}
