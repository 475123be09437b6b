//! 存储模块
//!
//! 负责历史记录在磁盘上的表示。

pub mod history_store;

pub use history_store::{HistoryStore, JsonFileHistoryStore, LoadError};
