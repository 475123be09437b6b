//! 肯定语会话
//!
//! 会话持有内存中的历史记录，启动时加载一次，之后每次成功生成都会写回存储。

use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::affirmation::{AffirmationEntry, AffirmationHistory, WeeklyLogItem, weekly_log};
use crate::services::generation::GenerationClient;
use crate::storage::HistoryStore;

/// 当前日期来源
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// 本地时间
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// 固定日期，用于测试
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// 一次提交的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// 输入为空，未调用生成服务
    EmptyInput,
    /// 生成成功并已保存
    Generated(AffirmationEntry),
    /// 生成失败，历史记录未改变
    Failed(String),
}

/// 会话状态
pub struct AffirmationSession {
    history: AffirmationHistory,
    store: Arc<dyn HistoryStore>,
    client: GenerationClient,
}

impl AffirmationSession {
    /// 打开会话并加载历史记录
    pub async fn open(store: Arc<dyn HistoryStore>, client: GenerationClient) -> Self {
        let history = store.load().await;
        info!("Session opened with {} history entries", history.len());
        Self {
            history,
            store,
            client,
        }
    }

    pub fn history(&self) -> &AffirmationHistory {
        &self.history
    }

    /// 本周日志
    pub fn weekly_log(&self, today: NaiveDate) -> Vec<WeeklyLogItem> {
        weekly_log(&self.history, today)
    }

    /// 处理一次提交
    ///
    /// 空白输入直接返回 [`SubmissionOutcome::EmptyInput`]。生成失败时不修改历史记录。
    /// 保存失败会作为错误返回。
    pub async fn submit(&mut self, feeling: &str, today: NaiveDate) -> Result<SubmissionOutcome> {
        if feeling.trim().is_empty() {
            return Ok(SubmissionOutcome::EmptyInput);
        }

        let affirmations = match self.client.generate(feeling).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Generation failed: {}", e);
                return Ok(SubmissionOutcome::Failed(e.to_string()));
            }
        };

        let entry = AffirmationEntry::new(today, feeling, affirmations);
        if self.history.upsert(entry.clone()).is_some() {
            info!("Replacing affirmations for {}", entry.date);
        }
        self.store.save(&self.history).await?;

        info!("Stored affirmations for {}", entry.date);
        Ok(SubmissionOutcome::Generated(entry))
    }
}

impl std::fmt::Debug for AffirmationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AffirmationSession")
            .field("entries", &self.history.len())
            .field("store", &"Arc<dyn HistoryStore>")
            .field("client", &self.client)
            .finish()
    }
}
