//! Settings Loader
//!
//! ## 검색 우선순위
//!
//! 1. User-level: `~/.trellis/settings.json`
//! 2. Project-level: `.trellis/settings.json`
//! 3. Local (gitignored): `.trellis/settings.local.json`
//!
//! 각 레벨의 설정이 이전 레벨을 오버라이드합니다.
//! `.toml` 확장자는 TOML로, 나머지는 JSON으로 읽습니다.

use super::settings::HostSettings;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 설정 폴더 이름
pub const CONFIG_DIR_NAME: &str = ".trellis";

// ============================================================================
// SettingsLoader - 설정 로더
// ============================================================================

/// 설정 로더
pub struct SettingsLoader {
    /// 검색 경로
    search_paths: Vec<SettingsPath>,
}

/// 설정 파일 경로 정보
#[derive(Debug, Clone)]
struct SettingsPath {
    path: PathBuf,
    /// 우선순위 (높을수록 우선)
    priority: usize,
    description: &'static str,
}

impl SettingsLoader {
    /// 새 로더 생성 (기본 검색 경로)
    pub fn new(working_dir: &Path) -> Self {
        let mut paths = Vec::new();

        if let Some(home) = dirs::home_dir() {
            paths.push(SettingsPath {
                path: home.join(CONFIG_DIR_NAME).join("settings.json"),
                priority: 10,
                description: "User settings",
            });
        }

        paths.push(SettingsPath {
            path: working_dir.join(CONFIG_DIR_NAME).join("settings.json"),
            priority: 20,
            description: "Project settings",
        });

        paths.push(SettingsPath {
            path: working_dir.join(CONFIG_DIR_NAME).join("settings.local.json"),
            priority: 30,
            description: "Local settings",
        });

        paths.sort_by_key(|p| p.priority);

        Self {
            search_paths: paths,
        }
    }

    /// 커스텀 검색 경로로 생성 (앞쪽이 낮은 우선순위)
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        let search_paths = paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| SettingsPath {
                path,
                priority: i,
                description: "Custom",
            })
            .collect();

        Self { search_paths }
    }

    /// 모든 경로에서 설정 로드하여 병합
    ///
    /// 읽을 수 없는 파일은 경고 후 건너뜁니다.
    pub fn load_all(&self) -> HostSettings {
        let mut merged = HostSettings::new();

        for settings_path in &self.search_paths {
            if !settings_path.path.exists() {
                continue;
            }

            match load_settings_from_file(&settings_path.path) {
                Ok(settings) => {
                    info!(
                        "Loaded {} from: {}",
                        settings_path.description,
                        settings_path.path.display()
                    );
                    merged = merge_settings(merged, settings);
                }
                Err(e) => {
                    warn!(
                        "Failed to load settings from {}: {}",
                        settings_path.path.display(),
                        e
                    );
                }
            }
        }

        merged
    }

    /// 특정 경로에서만 로드 (파일이 없으면 기본값)
    pub fn load_from(&self, path: &Path) -> Result<HostSettings> {
        if path.exists() {
            load_settings_from_file(path)
        } else {
            Ok(HostSettings::new())
        }
    }

    /// 존재하는 설정 파일 목록
    pub fn existing_files(&self) -> Vec<PathBuf> {
        self.search_paths
            .iter()
            .filter(|p| p.path.exists())
            .map(|p| p.path.clone())
            .collect()
    }
}

// ============================================================================
// 유틸리티 함수
// ============================================================================

/// 파일에서 설정 로드
pub fn load_settings_from_file(path: &Path) -> Result<HostSettings> {
    let content = std::fs::read_to_string(path)?;

    let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
    let settings: HostSettings = if is_toml {
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Invalid settings at {}: {}", path.display(), e))
        })?
    } else {
        serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Invalid settings at {}: {}", path.display(), e))
        })?
    };

    debug!(
        "Loaded settings from {}: {} plugin sections, {} disabled",
        path.display(),
        settings.plugins.len(),
        settings.disabled.len()
    );

    Ok(settings)
}

/// 두 설정 병합 (later가 earlier를 오버라이드)
pub fn merge_settings(earlier: HostSettings, later: HostSettings) -> HostSettings {
    HostSettings {
        log_level: later.log_level.or(earlier.log_level),

        // 플러그인 설정: 키 단위 병합
        plugins: {
            let mut merged = earlier.plugins;
            for (name, config) in later.plugins {
                merged.entry(name).or_default().extend(config);
            }
            merged
        },

        disabled: {
            let mut merged = earlier.disabled;
            for name in later.disabled {
                if !merged.contains(&name) {
                    merged.push(name);
                }
            }
            merged
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_settings_loader_new() {
        let loader = SettingsLoader::new(Path::new("."));
        assert!(loader.search_paths.len() >= 2);
    }

    #[test]
    fn test_many_custom_paths_keep_order() {
        let paths: Vec<_> = (0..300).map(|i| PathBuf::from(format!("s{i}.json"))).collect();
        let loader = SettingsLoader::with_paths(paths.clone());

        let ordered: Vec<_> = loader.search_paths.iter().map(|p| p.path.clone()).collect();
        assert_eq!(ordered, paths);
        assert!(loader
            .search_paths
            .windows(2)
            .all(|w| w[0].priority < w[1].priority));
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(
            &file,
            r#"{ "logLevel": "warn", "plugins": { "email": { "port": 25 } } }"#,
        )
        .unwrap();

        let settings = load_settings_from_file(&file).unwrap();
        assert_eq!(settings.log_level(), "warn");
        assert_eq!(settings.plugin_config("email")["port"], json!(25));
    }

    #[test]
    fn test_load_toml_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.toml");
        fs::write(
            &file,
            r#"
disabled = ["analytics"]

[plugins.email]
host = "smtp.local"
"#,
        )
        .unwrap();

        let settings = load_settings_from_file(&file).unwrap();
        assert!(settings.is_disabled("analytics"));
        assert_eq!(settings.plugin_config("email")["host"], json!("smtp.local"));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(&file, "{ not json").unwrap();

        let loader = SettingsLoader::with_paths(vec![file.clone()]);
        assert!(matches!(loader.load_from(&file), Err(Error::Config(_))));
        // load_all은 건너뜀
        assert_eq!(loader.load_all(), HostSettings::new());
    }

    #[test]
    fn test_layered_merge() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("base.json");
        let local = dir.path().join("local.json");
        fs::write(
            &base,
            r#"{ "logLevel": "info", "plugins": { "email": { "host": "a", "port": 25 } } }"#,
        )
        .unwrap();
        fs::write(
            &local,
            r#"{ "plugins": { "email": { "host": "b" } }, "disabled": ["x"] }"#,
        )
        .unwrap();

        let loader = SettingsLoader::with_paths(vec![base, local]);
        let settings = loader.load_all();

        assert_eq!(settings.log_level(), "info");
        let email = settings.plugin_config("email");
        assert_eq!(email["host"], json!("b"));
        assert_eq!(email["port"], json!(25));
        assert!(settings.is_disabled("x"));
        assert_eq!(loader.existing_files().len(), 2);
    }
}
