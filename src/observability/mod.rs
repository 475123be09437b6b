//! 可观测性模块
//!
//! 提供 Prometheus 指标、结构化日志和健康检查。

use axum::{Json, Router, response::IntoResponse, routing::get};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::config::LoggingConfig;
use crate::services::SubmissionOutcome;

// ===== Simple Metrics =====

/// 简单应用指标
#[derive(Clone, Default)]
pub struct AppMetrics {
    pub http_requests_total: Arc<AtomicU64>,
    pub http_request_duration_sum: Arc<AtomicU64>,
    pub submissions_total: Arc<AtomicU64>,
    pub affirmations_generated_total: Arc<AtomicU64>,
    pub empty_inputs_total: Arc<AtomicU64>,
    pub generation_failures_total: Arc<AtomicU64>,
    pub errors_total: Arc<AtomicU64>,
}

impl AppMetrics {
    /// 记录 HTTP 请求
    pub fn record_http_request(&self, duration_ms: u64) {
        self.http_requests_total.fetch_add(1, Ordering::SeqCst);
        self.http_request_duration_sum
            .fetch_add(duration_ms, Ordering::SeqCst);
    }

    /// 记录一次提交结果
    pub fn record_submission(&self, outcome: &SubmissionOutcome) {
        self.submissions_total.fetch_add(1, Ordering::SeqCst);
        let counter = match outcome {
            SubmissionOutcome::EmptyInput => &self.empty_inputs_total,
            SubmissionOutcome::Generated(_) => &self.affirmations_generated_total,
            SubmissionOutcome::Failed(_) => &self.generation_failures_total,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录错误
    pub fn record_error(&self) {
        self.errors_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 生成 Prometheus 格式指标
    pub fn gather(&self) -> String {
        format!(
            r#"# HELP http_requests_total Total HTTP requests
# TYPE http_requests_total counter
http_requests_total {}
# HELP http_request_duration_seconds HTTP request duration in seconds
# TYPE http_request_duration_seconds histogram
http_request_duration_seconds_sum {}
http_request_duration_seconds_count {}
# HELP submissions_total Total affirmation submissions
# TYPE submissions_total counter
submissions_total {}
# HELP affirmations_generated_total Submissions that produced affirmations
# TYPE affirmations_generated_total counter
affirmations_generated_total {}
# HELP empty_inputs_total Submissions rejected for empty input
# TYPE empty_inputs_total counter
empty_inputs_total {}
# HELP generation_failures_total Failed generation calls
# TYPE generation_failures_total counter
generation_failures_total {}
# HELP errors_total Total errors
# TYPE errors_total counter
errors_total {}
"#,
            self.http_requests_total.load(Ordering::SeqCst),
            self.http_request_duration_sum.load(Ordering::SeqCst) as f64 / 1000.0,
            self.http_requests_total.load(Ordering::SeqCst),
            self.submissions_total.load(Ordering::SeqCst),
            self.affirmations_generated_total.load(Ordering::SeqCst),
            self.empty_inputs_total.load(Ordering::SeqCst),
            self.generation_failures_total.load(Ordering::SeqCst),
            self.errors_total.load(Ordering::SeqCst),
        )
    }
}

// ===== Health Check =====

/// 健康检查状态
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
    pub model: String,
    pub history_file: String,
}

/// 可观测性状态
#[derive(Clone)]
pub struct ObservabilityState {
    pub metrics: Arc<AppMetrics>,
    pub start_time: DateTime<Utc>,
    pub version: String,
    pub model: String,
    pub history_file: String,
}

impl ObservabilityState {
    pub fn new(
        version: String,
        metrics: Arc<AppMetrics>,
        model: impl Into<String>,
        history_file: impl Into<String>,
    ) -> Self {
        Self {
            metrics,
            start_time: Utc::now(),
            version,
            model: model.into(),
            history_file: history_file.into(),
        }
    }

    /// 获取应用正常运行时间
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_seconds() as f64
    }
}

// ===== Health Check Handlers =====

/// 获取完整健康状态
pub async fn health_check(
    state: axum::extract::State<Arc<ObservabilityState>>,
) -> impl IntoResponse {
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
        model: state.model.clone(),
        history_file: state.history_file.clone(),
    })
}

/// 简单存活检查
pub async fn liveness() -> impl IntoResponse {
    "OK"
}

/// Prometheus 指标端点
pub async fn metrics(state: axum::extract::State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let output = state.metrics.gather();
    (axum::http::StatusCode::OK, output)
}

/// 版本信息端点
pub async fn version(state: axum::extract::State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": state.version,
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/metrics", get(metrics))
        .route("/version", get(version))
        .with_state(state)
}

// ===== Structured Logging =====

/// 初始化日志
///
/// `RUST_LOG` 优先于配置中的日志级别。配置了 `log_dir` 时额外按天写入文件，
/// 返回的 guard 需要在进程退出前一直持有。
pub fn init_tracing(service_name: &str, config: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_writer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, format!("{service_name}.log"));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.structured {
        registry
            .with(fmt::layer().json().with_target(true).with_line_number(true))
            .with(file_writer.map(|w| fmt::layer().json().with_ansi(false).with_writer(w)))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .with(file_writer.map(|w| fmt::layer().with_ansi(false).with_writer(w)))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing already initialized: {e}");
    }

    guard
}

// ===== Request Metrics Middleware =====

/// 记录请求指标的中间件
pub async fn metrics_middleware(
    axum::extract::State(metrics): axum::extract::State<Arc<AppMetrics>>,
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let start = std::time::Instant::now();

    let response = next.run(req).await;

    let duration_ms = start.elapsed().as_millis() as u64;
    metrics.record_http_request(duration_ms);
    if response.status().is_server_error() {
        metrics.record_error();
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::affirmation::AffirmationEntry;
    use axum::{body::Body, http::Request};
    use chrono::NaiveDate;
    use tower::ServiceExt;

    #[test]
    fn test_metrics_gather() {
        let metrics = AppMetrics::default();
        metrics.record_http_request(100);
        metrics.record_submission(&SubmissionOutcome::EmptyInput);
        metrics.record_submission(&SubmissionOutcome::Failed("boom".into()));
        metrics.record_submission(&SubmissionOutcome::Generated(AffirmationEntry::new(
            NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
            "calm",
            "🌟",
        )));
        metrics.record_error();

        let output = metrics.gather();
        assert!(output.contains("http_requests_total 1"));
        assert!(output.contains("submissions_total 3"));
        assert!(output.contains("affirmations_generated_total 1"));
        assert!(output.contains("empty_inputs_total 1"));
        assert!(output.contains("generation_failures_total 1"));
        assert!(output.contains("errors_total 1"));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let state = Arc::new(ObservabilityState::new(
            "0.1.0".to_string(),
            Arc::new(AppMetrics::default()),
            "gemini-1.5-flash",
            "affirmation_history.json",
        ));
        let app = create_observability_router(state);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["model"], "gemini-1.5-flash");
    }
}
