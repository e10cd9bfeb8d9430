use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 分数下限
pub const MIN_SCORE: f64 = 0.0;
/// 分数上限
pub const MAX_SCORE: f64 = 200.0;

/// 检查分数是否落在允许区间内
pub fn is_valid_score(score: f64) -> bool {
    score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// 评分反馈
///
/// 自动评分只会追加 `is_final = false` 的临时记录；只有 `is_final = true`
/// 的记录会展示给学生。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct ScoringFeedback {
    pub id: i64,
    pub answer_id: i64,
    pub score: f64,
    pub feedback: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub is_final: bool,
}

/// 待写入的临时评分记录
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub answer_id: i64,
    pub score: f64,
    pub feedback: String,
}

impl NewFeedback {
    pub fn new(answer_id: i64, score: f64, feedback: impl Into<String>) -> Self {
        Self {
            answer_id,
            score,
            feedback: feedback.into(),
        }
    }
}

/// 确认评分的结果：新建了最终记录，或将最新记录原地改为最终记录
#[derive(Debug, Clone)]
pub enum FinalizeOutcome {
    Created(ScoringFeedback),
    Updated(ScoringFeedback),
}

impl FinalizeOutcome {
    pub fn into_feedback(self) -> ScoringFeedback {
        match self {
            FinalizeOutcome::Created(f) | FinalizeOutcome::Updated(f) => f,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, FinalizeOutcome::Created(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert!(is_valid_score(0.0));
        assert!(is_valid_score(200.0));
        assert!(is_valid_score(87.5));
        assert!(!is_valid_score(-0.5));
        assert!(!is_valid_score(200.5));
        assert!(!is_valid_score(f64::NAN));
    }
}
