//! 肯定语 DTO
//!
//! 定义表单和 JSON 接口的请求与响应数据结构。

use serde::{Deserialize, Serialize};

use crate::models::affirmation::{AffirmationEntry, WeeklyLogItem};

/// 页面表单
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FeelingForm {
    /// 用户输入的感受
    pub feeling: String,
}

/// 创建肯定语请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CreateAffirmationRequest {
    /// 用户输入的感受
    pub feeling: String,
}

/// 肯定语响应
#[derive(Debug, Serialize, Deserialize)]
pub struct AffirmationResponse {
    /// 日期
    pub date: String,
    /// 感受
    pub feeling: String,
    /// 生成的原始文本
    pub affirmations: String,
}

impl From<AffirmationEntry> for AffirmationResponse {
    fn from(entry: AffirmationEntry) -> Self {
        Self {
            date: entry.date,
            feeling: entry.feeling,
            affirmations: entry.affirmations,
        }
    }
}

/// 本周日志响应
#[derive(Debug, Serialize, Deserialize)]
pub struct WeeklyLogResponse {
    /// 周一
    pub week_start: String,
    /// 周日
    pub week_end: String,
    /// 本周已有的记录
    pub entries: Vec<WeeklyLogItem>,
}
