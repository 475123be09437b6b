//! DTO 模块
//!
//! 定义 API 请求和响应数据结构。

pub mod affirmation_dto;
