//! 历史记录存储
//!
//! 整个历史记录保存在一个 JSON 文件中，每次保存都完整重写。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::affirmation::AffirmationHistory;

/// 读取历史记录失败的原因
#[derive(Error, Debug)]
pub enum LoadError {
    /// 文件不存在
    #[error("history file not found: {0}")]
    Missing(PathBuf),

    /// 读取失败
    #[error("failed to read history file: {0}")]
    Io(#[from] std::io::Error),

    /// 内容无法解析
    #[error("malformed history file: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// 历史记录存储 trait
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// 读取历史记录，失败时返回具体原因
    async fn try_load(&self) -> std::result::Result<AffirmationHistory, LoadError>;

    /// 完整写入历史记录，写入失败会返回给调用方
    async fn save(&self, history: &AffirmationHistory) -> Result<()>;

    /// 读取历史记录，任何失败都视为空记录
    async fn load(&self) -> AffirmationHistory {
        match self.try_load().await {
            Ok(history) => history,
            Err(LoadError::Missing(path)) => {
                debug!("No history file at {}, starting empty", path.display());
                AffirmationHistory::new()
            }
            Err(e) => {
                warn!("Ignoring unreadable history: {}", e);
                AffirmationHistory::new()
            }
        }
    }
}

/// 基于 JSON 文件的历史记录存储
#[derive(Debug, Clone)]
pub struct JsonFileHistoryStore {
    path: PathBuf,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistoryStore {
    async fn try_load(&self) -> std::result::Result<AffirmationHistory, LoadError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoadError::Missing(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let history: AffirmationHistory = serde_json::from_slice(&bytes)?;
        debug!(
            "Loaded {} history entries from {}",
            history.len(),
            self.path.display()
        );
        Ok(history)
    }

    async fn save(&self, history: &AffirmationHistory) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec(history)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(
            "Saved {} history entries to {}",
            history.len(),
            self.path.display()
        );
        Ok(())
    }
}
