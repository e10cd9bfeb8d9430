use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 学生答案
///
/// 每个 (试题, 学生) 只有一份答案。重新提交会原地覆盖内容并清空确认时间。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct StudentAnswer {
    pub id: i64,
    pub question_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    /// 教师确认并发布评价的时间
    pub confirmed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl StudentAnswer {
    /// 可送交评分的答案文本；空内容或纯空白视为无法读取
    pub fn readable_content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// 提交答案的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub enum SubmitOutcome {
    /// 首次提交
    Created,
    /// 覆盖了已有答案，原有评分全部作废
    Replaced,
}
