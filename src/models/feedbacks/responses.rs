use serde::Serialize;
use ts_rs::TS;

use super::entities::ScoringFeedback;
use crate::models::answers::entities::StudentAnswer;

/// 导入评价的数据
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct ImportedFeedback {
    pub score: f64,
    pub feedback: Option<String>,
}

impl From<ScoringFeedback> for ImportedFeedback {
    fn from(f: ScoringFeedback) -> Self {
        Self {
            score: f.score,
            feedback: f.feedback,
        }
    }
}

/// 确认评价响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct FinalizeFeedbackResponse {
    pub feedback: ScoringFeedback,
    /// true 表示新建了记录，false 表示更新了最新记录
    pub created: bool,
}

/// 教师批改列表中的一行
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct AnswerFeedbackOverview {
    pub answer: StudentAnswer,
    pub latest_feedback: Option<ScoringFeedback>,
    pub final_feedback: Option<ScoringFeedback>,
    /// 有最终评价时为最终评价，否则为最新评价
    pub current_feedback: Option<ScoringFeedback>,
    pub has_feedback: bool,
}
