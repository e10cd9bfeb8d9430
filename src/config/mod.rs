//! 配置管理
//!
//! 配置来源优先级（低 → 高）：`config.toml`、`config.{APP_ENV}.toml`、
//! `NJUP_` 前缀环境变量、少量约定俗成的环境变量（`DATABASE_URL` 等）。

mod r#impl;
mod structs;

pub use structs::*;
