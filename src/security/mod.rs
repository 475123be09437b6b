//! 安全模块
//!
//! 为所有响应添加安全相关的 HTTP 头。

pub mod middleware;
