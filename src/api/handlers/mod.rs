//! Handlers 模块
//!
//! HTTP 请求处理程序。

pub mod affirmation_handler;
pub mod page_handler;

pub use affirmation_handler::*;
pub use page_handler::*;
