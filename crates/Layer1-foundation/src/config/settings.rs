//! HostSettings - 호스트 애플리케이션 설정

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// 호스트 설정
///
/// ```json
/// {
///   "logLevel": "debug",
///   "plugins": {
///     "email": { "host": "smtp.local", "port": 2525 }
///   },
///   "disabled": ["analytics"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSettings {
    /// 기본 로그 레벨 (RUST_LOG가 없을 때)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// 플러그인별 호출자 설정
    #[serde(default)]
    pub plugins: HashMap<String, Map<String, Value>>,

    /// 등록하지 않을 플러그인 이름
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl HostSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// 특정 플러그인의 설정 (없으면 빈 맵)
    pub fn plugin_config(&self, name: &str) -> Map<String, Value> {
        self.plugins.get(name).cloned().unwrap_or_default()
    }

    /// 비활성화 여부
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.iter().any(|d| d == name)
    }

    /// 로그 레벨 (기본값 "info")
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_settings() {
        let settings: HostSettings = serde_json::from_value(json!({
            "logLevel": "debug",
            "plugins": { "email": { "port": 2525 } },
            "disabled": ["analytics"]
        }))
        .unwrap();

        assert_eq!(settings.log_level(), "debug");
        assert_eq!(settings.plugin_config("email").get("port"), Some(&json!(2525)));
        assert!(settings.plugin_config("missing").is_empty());
        assert!(settings.is_disabled("analytics"));
        assert!(!settings.is_disabled("email"));
    }

    #[test]
    fn test_defaults() {
        let settings = HostSettings::new();
        assert_eq!(settings.log_level(), "info");
        assert!(settings.plugins.is_empty());
    }
}
