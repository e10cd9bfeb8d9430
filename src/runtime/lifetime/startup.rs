use crate::config::AppConfig;
use crate::judge::JudgeRegistry;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub registry: Arc<JudgeRegistry>,
}

/// 准备服务器启动的上下文
/// 包括存储与评分适配器
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = AppConfig::get();

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    let registry = JudgeRegistry::from_config(&config.judge).expect("Invalid judge config");
    debug!(
        gpt = %config.judge.gpt_api_url,
        qwen = %config.judge.qwen_api_url,
        "Judge adapters registered"
    );

    StartupContext {
        storage,
        registry: Arc::new(registry),
    }
}
