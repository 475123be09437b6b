use crate::api::view::PageRenderer;
use crate::error::Result;
use crate::observability::AppMetrics;
use crate::services::{AffirmationSession, Clock, SystemClock};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// The single interactive session; the lock serializes submissions
    pub session: Arc<Mutex<AffirmationSession>>,
    /// Source of "today" for submissions and the weekly log
    pub clock: Arc<dyn Clock>,
    /// Page template renderer
    pub renderer: Arc<PageRenderer>,
    pub metrics: Arc<AppMetrics>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("session", &"Arc<Mutex<AffirmationSession>>")
            .field("clock", &self.clock.today())
            .field("renderer", &self.renderer)
            .field("metrics", &"Arc<AppMetrics>")
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        session: AffirmationSession,
        clock: Box<dyn Clock>,
        metrics: Arc<AppMetrics>,
    ) -> Result<Self> {
        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            clock: Arc::from(clock),
            renderer: Arc::new(PageRenderer::new()?),
            metrics,
        })
    }

    /// Create application state using the local system clock
    pub fn with_system_clock(session: AffirmationSession, metrics: Arc<AppMetrics>) -> Result<Self> {
        Self::new(session, Box::new(SystemClock), metrics)
    }
}
