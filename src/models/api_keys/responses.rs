use serde::Serialize;
use ts_rs::TS;

use super::entities::ApiKey;

/// 对外展示的 API Key 信息（密钥已遮蔽）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api_key.ts")]
pub struct ApiKeyInfo {
    pub id: i64,
    pub teacher_id: i64,
    pub model: String,
    pub version: String,
    pub masked_key: String,
    pub status: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&ApiKey> for ApiKeyInfo {
    fn from(key: &ApiKey) -> Self {
        Self {
            id: key.id,
            teacher_id: key.teacher_id,
            model: key.model.clone(),
            version: key.version.clone(),
            masked_key: key.masked_key(),
            status: key.status,
            created_at: key.created_at,
        }
    }
}

/// 批量删除结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api_key.ts")]
pub struct DeleteApiKeysResponse {
    pub deleted: u64,
}
