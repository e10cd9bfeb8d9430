use serde::Serialize;
use ts_rs::TS;

use super::entities::{StudentAnswer, SubmitOutcome};
use crate::models::feedbacks::entities::ScoringFeedback;

/// 提交答案响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct SubmitAnswerResponse {
    pub answer: StudentAnswer,
    pub outcome: SubmitOutcome,
}

/// 学生视角的答案详情，只包含已发布的最终评价
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct StudentAnswerView {
    pub answer: Option<StudentAnswer>,
    pub final_feedback: Option<ScoringFeedback>,
}
