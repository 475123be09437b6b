//! 数据模型模块

pub mod affirmation;

pub use affirmation::{
    AffirmationEntry, AffirmationHistory, WeeklyLogItem, date_key, week_dates, weekly_log,
};
