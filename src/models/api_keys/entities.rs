use serde::{Deserialize, Serialize};

/// 教师名下的大模型 API Key
///
/// 只有 `status == true` 的 Key 可以用于批量评分。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: i64,
    pub teacher_id: i64,
    /// 模型系列，如 "gpt-4o"、"qwen-plus"，按前缀（忽略大小写）匹配评分适配器
    pub model: String,
    /// 调用服务时使用的具体模型版本
    pub version: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub key_value: String,
    pub status: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ApiKey {
    /// 遮蔽后的密钥，仅保留首尾各 4 个字符
    pub fn masked_key(&self) -> String {
        let chars: Vec<char> = self.key_value.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}****{tail}")
    }
}
