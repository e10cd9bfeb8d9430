use serde::Deserialize;
use ts_rs::TS;

// 批量智能评分请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct BatchGradeRequest {
    #[serde(default)]
    pub answer_ids: Vec<i64>,
    /// 选择的 API Key，缺省时整批拒绝
    pub api_key_id: Option<i64>,
}
