use serde::Deserialize;
use ts_rs::TS;

// 新增 API Key 请求（管理员）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api_key.ts")]
pub struct CreateApiKeyRequest {
    pub teacher_id: i64,
    pub model: String,
    pub version: String,
    pub key_value: String,
    pub status: Option<bool>,
}

// 修改 API Key 请求（管理员），未提供的字段保持不变
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api_key.ts")]
pub struct UpdateApiKeyRequest {
    pub teacher_id: Option<i64>,
    pub model: Option<String>,
    pub version: Option<String>,
    pub key_value: Option<String>,
    pub status: Option<bool>,
}

// 批量删除 API Key 请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api_key.ts")]
pub struct DeleteApiKeysRequest {
    pub ids: Vec<i64>,
}
