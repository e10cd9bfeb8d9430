use serde::Deserialize;
use ts_rs::TS;

// 确认并发布评价请求
//
// 已有评分记录时，未提供的字段保持原值不变。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct FinalizeFeedbackRequest {
    pub score: Option<f64>,
    pub feedback: Option<String>,
}
