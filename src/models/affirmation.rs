use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 日期键格式（YYYY-MM-DD）
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 将日期格式化为历史记录键
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 单日的肯定语记录
///
/// 每个日期只保留一条，同一天的后一次提交会覆盖前一次。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AffirmationEntry {
    /// 用户描述的感受（原样保存）
    pub feeling: String,
    /// 生成服务返回的原始文本
    pub affirmations: String,
    /// 日期，与历史记录中的键相同
    pub date: String,
}

impl AffirmationEntry {
    pub fn new(date: NaiveDate, feeling: impl Into<String>, affirmations: impl Into<String>) -> Self {
        Self {
            feeling: feeling.into(),
            affirmations: affirmations.into(),
            date: date_key(date),
        }
    }
}

/// 全部历史记录：日期字符串 -> 记录
///
/// 使用有序映射，写入文件时键顺序稳定。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AffirmationHistory {
    entries: BTreeMap<String, AffirmationEntry>,
}

impl AffirmationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或覆盖一条记录，键取自记录的日期
    pub fn upsert(&mut self, entry: AffirmationEntry) -> Option<AffirmationEntry> {
        self.entries.insert(entry.date.clone(), entry)
    }

    pub fn get(&self, date: &str) -> Option<&AffirmationEntry> {
        self.entries.get(date)
    }

    pub fn get_date(&self, date: NaiveDate) -> Option<&AffirmationEntry> {
        self.entries.get(&date_key(date))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<AffirmationEntry> for AffirmationHistory {
    fn from_iter<I: IntoIterator<Item = AffirmationEntry>>(iter: I) -> Self {
        let mut history = Self::new();
        for entry in iter {
            history.upsert(entry);
        }
        history
    }
}

/// 周日志中的一行
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyLogItem {
    /// 星期名称（Monday ... Sunday）
    pub day_name: String,
    /// 日期
    pub date: String,
    /// 感受
    pub feeling: String,
    /// 肯定语文本
    pub affirmations: String,
}

/// 包含 `today` 的那一周（周一到周日）的 7 个日期，按顺序排列
pub fn week_dates(today: NaiveDate) -> [NaiveDate; 7] {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    std::array::from_fn(|offset| monday + Duration::days(offset as i64))
}

/// 本周内已有记录的日期，按周一到周日排列
pub fn weekly_log(history: &AffirmationHistory, today: NaiveDate) -> Vec<WeeklyLogItem> {
    week_dates(today)
        .into_iter()
        .filter_map(|date| {
            history.get_date(date).map(|entry| WeeklyLogItem {
                day_name: date.format("%A").to_string(),
                date: date_key(date),
                feeling: entry.feeling.clone(),
                affirmations: entry.affirmations.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_week_dates_from_wednesday() {
        let dates = week_dates(date("2024-05-15"));
        let keys: Vec<String> = dates.iter().map(|d| date_key(*d)).collect();
        assert_eq!(
            keys,
            vec![
                "2024-05-13",
                "2024-05-14",
                "2024-05-15",
                "2024-05-16",
                "2024-05-17",
                "2024-05-18",
                "2024-05-19",
            ]
        );
    }

    #[rstest]
    #[case("2024-05-13")]
    #[case("2024-05-16")]
    #[case("2024-05-19")]
    fn test_week_dates_same_week(#[case] today: &str) {
        let dates = week_dates(date(today));
        assert_eq!(dates[0], date("2024-05-13"));
        assert_eq!(dates[6], date("2024-05-19"));
        assert!(dates.contains(&date(today)));
    }

    #[test]
    fn test_week_dates_across_month_boundary() {
        let dates = week_dates(date("2024-03-01"));
        assert_eq!(dates[0], date("2024-02-26"));
        assert_eq!(dates[6], date("2024-03-03"));
    }

    #[test]
    fn test_upsert_overwrites_same_date() {
        let mut history = AffirmationHistory::new();
        let today = date("2024-05-15");
        assert!(history.upsert(AffirmationEntry::new(today, "tired", "🌟 rest")).is_none());
        let previous = history.upsert(AffirmationEntry::new(today, "hopeful", "🌟 shine"));

        assert_eq!(previous.map(|e| e.feeling), Some("tired".to_string()));
        assert_eq!(history.len(), 1);
        assert_eq!(history.get("2024-05-15").unwrap().feeling, "hopeful");
    }

    #[test]
    fn test_weekly_log_only_current_week_in_order() {
        let history: AffirmationHistory = [
            AffirmationEntry::new(date("2024-05-19"), "calm", "🌟 Sunday"),
            AffirmationEntry::new(date("2024-05-13"), "anxious", "🌟 Monday"),
            AffirmationEntry::new(date("2024-05-12"), "old", "🌟 last week"),
            AffirmationEntry::new(date("2024-05-20"), "future", "🌟 next week"),
        ]
        .into_iter()
        .collect();

        let log = weekly_log(&history, date("2024-05-15"));
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].day_name, "Monday");
        assert_eq!(log[0].date, "2024-05-13");
        assert_eq!(log[0].feeling, "anxious");
        assert_eq!(log[1].day_name, "Sunday");
        assert_eq!(log[1].affirmations, "🌟 Sunday");
    }

    #[test]
    fn test_weekly_log_empty() {
        let history = AffirmationHistory::new();
        assert!(weekly_log(&history, date("2024-05-15")).is_empty());
    }

    #[test]
    fn test_history_serializes_as_plain_object() {
        let mut history = AffirmationHistory::new();
        history.upsert(AffirmationEntry::new(date("2024-05-15"), "anxious", "🌟 A"));

        let value = serde_json::to_value(&history).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "2024-05-15": {
                    "feeling": "anxious",
                    "affirmations": "🌟 A",
                    "date": "2024-05-15"
                }
            })
        );
    }
}
