//! Logging - 플러그인에 제공되는 로거 계약
//!
//! 호스트는 `tracing`으로 로그를 남기고, 플러그인은 `Logger` 트레이트를 통해
//! 자신의 스코프가 붙은 로거만 받습니다.

use crate::config::HostSettings;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 로그 레벨
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// 로깅 기능 계약
///
/// `child`는 현재 스코프 아래에 새 스코프를 붙인 로거를 만듭니다.
pub trait Logger: Send + Sync {
    /// 메시지 기록
    fn log(&self, level: LogLevel, message: &str);

    /// 현재 스코프 (예: "trellis:email")
    fn scope(&self) -> &str;

    /// 하위 스코프 로거 생성
    fn child(&self, scope: &str) -> Arc<dyn Logger>;

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

// ============================================================================
// TracingLogger - tracing으로 전달하는 기본 구현
// ============================================================================

/// `tracing` 기반 로거
#[derive(Debug, Clone)]
pub struct TracingLogger {
    scope: String,
}

impl TracingLogger {
    /// 루트 로거 생성
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
        }
    }

    /// 공유 가능한 루트 로거
    pub fn shared(scope: impl Into<String>) -> Arc<dyn Logger> {
        Arc::new(Self::new(scope))
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        let scope = self.scope.as_str();
        match level {
            LogLevel::Debug => tracing::debug!(scope, "{}", message),
            LogLevel::Info => tracing::info!(scope, "{}", message),
            LogLevel::Warn => tracing::warn!(scope, "{}", message),
            LogLevel::Error => tracing::error!(scope, "{}", message),
        }
    }

    fn scope(&self) -> &str {
        &self.scope
    }

    fn child(&self, scope: &str) -> Arc<dyn Logger> {
        Arc::new(Self {
            scope: format!("{}:{}", self.scope, scope),
        })
    }
}

// ============================================================================
// 전역 subscriber 초기화
// ============================================================================

/// tracing subscriber 설치
///
/// `RUST_LOG`가 있으면 그 값을, 없으면 `default_level`을 사용합니다.
/// 이미 설치되어 있으면 아무 것도 하지 않습니다.
pub fn init(default_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

/// 호스트 설정의 `logLevel`로 subscriber 설치
///
/// ```ignore
/// let settings = SettingsLoader::new(&cwd).load_all();
/// trellis_foundation::init_logging_from(&settings);
/// ```
pub fn init_from_settings(settings: &HostSettings) {
    init(settings.log_level());
}
