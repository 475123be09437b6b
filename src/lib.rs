//! Daily Affirmations
//!
//! 一个单用户的表单服务：用户描述今天的感受，服务调用 Gemini 生成肯定语，
//! 并把每天的记录保存到本地 JSON 文件中，同时展示本周的日志。

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod security;
pub mod services;
pub mod storage;
