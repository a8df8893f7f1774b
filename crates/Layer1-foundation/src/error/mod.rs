//! Error types for Trellis
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trellis 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 플러그인 식별자
    // ========================================================================
    /// 이름/버전 형식 오류
    #[error("Invalid plugin {field}: '{value}'")]
    Identity { field: &'static str, value: String },

    #[error("Plugin '{0}' is already registered")]
    AlreadyRegistered(String),

    // ========================================================================
    // 설정 검증
    // ========================================================================
    /// 스키마 위반 목록 (첫 오류에서 멈추지 않고 전부 수집)
    #[error("Invalid configuration for plugin '{plugin}': {}", .errors.join("; "))]
    ConfigValidation { plugin: String, errors: Vec<String> },

    // ========================================================================
    // 의존성
    // ========================================================================
    #[error("Plugin '{plugin}' requires dependency '{dependency}' which is not registered")]
    MissingDependency { plugin: String, dependency: String },

    #[error("Circular dependency detected at plugin '{plugin}' ({})", .path.join(" -> "))]
    CircularDependency { plugin: String, path: Vec<String> },

    // ========================================================================
    // 로드/마운트
    // ========================================================================
    #[error("Plugin '{plugin}' declares unsupported route method '{method}'")]
    UnsupportedMethod { plugin: String, method: String },

    /// init/setup/teardown 훅 내부 오류 (원본 메시지 보존)
    #[error("Plugin '{plugin}' {hook} hook failed: {message}")]
    HookExecution {
        plugin: String,
        hook: &'static str,
        message: String,
    },

    // ========================================================================
    // 일반
    // ========================================================================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 플러그인 작성자가 고칠 수 있는 에러인지 확인
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::Identity { .. }
                | Error::AlreadyRegistered(_)
                | Error::ConfigValidation { .. }
                | Error::MissingDependency { .. }
                | Error::CircularDependency { .. }
                | Error::UnsupportedMethod { .. }
        )
    }

    /// 에러가 가리키는 플러그인 이름
    pub fn plugin(&self) -> Option<&str> {
        match self {
            Error::AlreadyRegistered(plugin)
            | Error::ConfigValidation { plugin, .. }
            | Error::MissingDependency { plugin, .. }
            | Error::CircularDependency { plugin, .. }
            | Error::UnsupportedMethod { plugin, .. }
            | Error::HookExecution { plugin, .. } => Some(plugin),
            _ => None,
        }
    }

    /// 훅 실행 에러 생성 헬퍼
    pub fn hook(plugin: impl Into<String>, hook: &'static str, err: impl std::fmt::Display) -> Self {
        Error::HookExecution {
            plugin: plugin.into(),
            hook,
            message: err.to_string(),
        }
    }
}
