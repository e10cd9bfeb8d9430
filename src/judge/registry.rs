//! 模型系列到评分适配器的注册表

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::{GptJudge, JudgeAdapter, JudgeError, QwenJudge};
use crate::config::JudgeConfig;
use crate::errors::{GraderError, Result};

/// 大模型系列
///
/// 由 API Key 的 `model` 字段按前缀（忽略大小写）判定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    Gpt,
    Qwen,
    Unsupported,
}

impl ModelFamily {
    pub fn from_model(model: &str) -> Self {
        let model = model.trim().to_ascii_lowercase();
        if model.starts_with("gpt") {
            ModelFamily::Gpt
        } else if model.starts_with("qwen") {
            ModelFamily::Qwen
        } else {
            ModelFamily::Unsupported
        }
    }
}

#[derive(Clone, Default)]
pub struct JudgeRegistry {
    adapters: HashMap<ModelFamily, Arc<dyn JudgeAdapter>>,
}

impl JudgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册适配器，`Unsupported` 系列不会被注册
    pub fn with_adapter(mut self, family: ModelFamily, adapter: Arc<dyn JudgeAdapter>) -> Self {
        if family != ModelFamily::Unsupported {
            self.adapters.insert(family, adapter);
        }
        self
    }

    /// 按配置创建 GPT 与 Qwen 适配器，二者共享同一个 HTTP 客户端
    pub fn from_config(config: &JudgeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GraderError::judge_service(format!("HTTP 客户端初始化失败: {e}")))?;

        let gpt = GptJudge::new(client.clone(), &config.gpt_api_url);
        let qwen = QwenJudge::new(client, &config.qwen_api_url);
        let registry = Self::new()
            .with_adapter(ModelFamily::Gpt, Arc::new(gpt))
            .with_adapter(ModelFamily::Qwen, Arc::new(qwen));
        Ok(registry)
    }

    /// 按 API Key 的模型名选择适配器
    pub fn adapter_for(
        &self,
        model: &str,
    ) -> std::result::Result<Arc<dyn JudgeAdapter>, JudgeError> {
        self.adapters
            .get(&ModelFamily::from_model(model))
            .cloned()
            .ok_or(JudgeError::UnsupportedFamily)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_prefix_is_case_insensitive() {
        assert_eq!(ModelFamily::from_model("GPT-4o"), ModelFamily::Gpt);
        assert_eq!(ModelFamily::from_model("gpt"), ModelFamily::Gpt);
        assert_eq!(ModelFamily::from_model("Qwen-Max"), ModelFamily::Qwen);
        assert_eq!(ModelFamily::from_model("llama"), ModelFamily::Unsupported);
        assert_eq!(ModelFamily::from_model("chatgpt"), ModelFamily::Unsupported);
    }

    #[test]
    fn test_unknown_family_has_no_adapter() {
        let registry = JudgeRegistry::from_config(&JudgeConfig {
            gpt_api_url: "http://127.0.0.1:9/gpt".into(),
            qwen_api_url: "http://127.0.0.1:9/qwen".into(),
        })
        .unwrap();

        assert_eq!(registry.adapter_for("gpt-4o").unwrap().name(), "gpt");
        assert_eq!(registry.adapter_for("QWEN").unwrap().name(), "qwen");
        let err = registry.adapter_for("llama").err().unwrap();
        assert!(err.to_string().contains("仅支持GPT和Qwen"));
    }
}
