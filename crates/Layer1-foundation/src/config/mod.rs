//! Config - 호스트 설정 관리
//!
//! - `settings.rs` - HostSettings (로그 레벨, 플러그인별 설정, 비활성 목록)
//! - `loader.rs` - 계층형 설정 파일 로더

mod loader;
mod settings;

pub use loader::{load_settings_from_file, merge_settings, SettingsLoader, CONFIG_DIR_NAME};
pub use settings::HostSettings;
