use std::collections::BTreeMap;

use serde::Serialize;
use ts_rs::TS;

/// 单个答案的评分状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub enum BatchItemStatus {
    Success,
    Error,
}

/// 单个答案的评分结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct BatchItemResult {
    pub status: BatchItemStatus,
    pub message: String,
}

impl BatchItemResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: BatchItemStatus::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: BatchItemStatus::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == BatchItemStatus::Success
    }
}

/// 批量评分响应：覆盖请求中的每一个答案 ID
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct BatchGradeResponse {
    pub results: BTreeMap<i64, BatchItemResult>,
}

impl BatchGradeResponse {
    pub fn success_count(&self) -> usize {
        self.results.values().filter(|r| r.is_success()).count()
    }

    pub fn error_count(&self) -> usize {
        self.results.len() - self.success_count()
    }
}
