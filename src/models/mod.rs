//! 业务数据模型
//!
//! 与 `entity` 模块中的数据库实体分离，供服务层与 HTTP 层使用。

pub mod answers;
pub mod api_keys;
pub mod common;
pub mod courses;
pub mod feedbacks;
pub mod grading;
pub mod questions;
pub mod users;

pub use common::{ApiResponse, ErrorCode};

/// 毫秒时间戳转换为 UTC 时间
pub(crate) fn from_millis(ts: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ts).unwrap_or_default()
}
