//! # trellis-foundation
//!
//! Foundation layer for Trellis:
//! - Error: 중앙 에러 타입 (플러그인 식별/설정/의존성/훅 에러)
//! - Logging: 플러그인에 제공되는 스코프 로거 계약 + tracing 초기화
//! - Env: 환경 변수 조회 (fallback 지원)
//! - Config: 계층형 호스트 설정 (플러그인별 설정 포함)

pub mod config;
pub mod env;
pub mod error;
pub mod logging;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Logging
// ============================================================================
// `init_logging(settings.log_level())` 또는 `init_logging_from(&settings)`로 설치
pub use logging::{
    init as init_logging, init_from_settings as init_logging_from, LogLevel, Logger,
    TracingLogger,
};

// ============================================================================
// Environment
// ============================================================================
pub use env::{EnvSource, MapEnv, ProcessEnv};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    load_settings_from_file, merge_settings, HostSettings, SettingsLoader, CONFIG_DIR_NAME,
};
