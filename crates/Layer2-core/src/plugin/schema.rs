//! Config Schema - 선언적 설정 스키마와 검증기
//!
//! 제약 종류는 닫힌 집합(type, enum, range, pattern)에 커스텀 predicate 하나를
//! 더한 형태입니다. 검증은 첫 실패에서 멈추지 않고 모든 속성의 모든 제약을
//! 평가해 오류 목록 전체를 돌려줍니다.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 플러그인 설정 값 (JSON object)
pub type PluginConfig = Map<String, Value>;

// ============================================================================
// PropertyType
// ============================================================================

/// 속성 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl PropertyType {
    /// 값이 이 타입인지 확인
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            // serde_json Number는 NaN을 표현하지 않음
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// enum 비교 (숫자는 표기와 무관하게 값으로 비교)
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Custom predicate
// ============================================================================

/// 커스텀 검증 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass,
    Fail,
    /// 실패, 메시지를 그대로 오류로 사용
    Message(String),
}

impl From<bool> for CheckOutcome {
    fn from(ok: bool) -> Self {
        if ok {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

impl From<String> for CheckOutcome {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<&str> for CheckOutcome {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<Result<(), String>> for CheckOutcome {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::Pass,
            Err(message) => Self::Message(message),
        }
    }
}

/// 커스텀 검증 함수
pub type CustomValidator = Arc<dyn Fn(&Value) -> CheckOutcome + Send + Sync>;

// ============================================================================
// PropertySchema
// ============================================================================

/// 단일 속성 스키마
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: PropertyType,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// 코드로만 지정 가능
    #[serde(skip)]
    pub validation: Option<CustomValidator>,
}

impl PropertySchema {
    pub fn new(kind: PropertyType) -> Self {
        Self {
            kind,
            allowed: None,
            minimum: None,
            maximum: None,
            pattern: None,
            description: None,
            validation: None,
        }
    }

    pub fn string() -> Self {
        Self::new(PropertyType::String)
    }

    pub fn number() -> Self {
        Self::new(PropertyType::Number)
    }

    pub fn boolean() -> Self {
        Self::new(PropertyType::Boolean)
    }

    pub fn object() -> Self {
        Self::new(PropertyType::Object)
    }

    pub fn array() -> Self {
        Self::new(PropertyType::Array)
    }

    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn with_maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn with_range(self, minimum: f64, maximum: f64) -> Self {
        self.with_minimum(minimum).with_maximum(maximum)
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 커스텀 predicate 지정 (bool, String, Result<(), String> 반환 가능)
    pub fn with_validation<F, R>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<CheckOutcome>,
    {
        self.validation = Some(Arc::new(move |value| check(value).into()));
        self
    }

    /// 이 속성의 모든 제약 평가
    fn check(&self, name: &str, value: &Value, errors: &mut Vec<String>) {
        if !self.kind.matches(value) {
            errors.push(format!(
                "{}: Expected {}, got {}",
                name,
                self.kind,
                value_kind(value)
            ));
            return;
        }

        if let Some(allowed) = &self.allowed {
            if !allowed.iter().any(|candidate| same_value(candidate, value)) {
                let options: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
                errors.push(format!(
                    "{}: Value must be one of [{}]",
                    name,
                    options.join(", ")
                ));
            }
        }

        if let Some(number) = value.as_f64() {
            if let Some(minimum) = self.minimum {
                if number < minimum {
                    errors.push(format!(
                        "{}: Value {} is below minimum {}",
                        name, number, minimum
                    ));
                }
            }
            if let Some(maximum) = self.maximum {
                if number > maximum {
                    errors.push(format!(
                        "{}: Value {} is above maximum {}",
                        name, number, maximum
                    ));
                }
            }
        }

        if let (Some(text), Some(pattern)) = (value.as_str(), &self.pattern) {
            match Regex::new(pattern) {
                Ok(re) if re.is_match(text) => {}
                Ok(_) => errors.push(format!(
                    "{}: Value does not match pattern {}",
                    name, pattern
                )),
                Err(_) => errors.push(format!("{}: Invalid pattern {}", name, pattern)),
            }
        }

        if let Some(validation) = &self.validation {
            match validation(value) {
                CheckOutcome::Pass => {}
                CheckOutcome::Fail => errors.push(format!("{}: Custom validation failed", name)),
                CheckOutcome::Message(message) => errors.push(format!("{}: {}", name, message)),
            }
        }
    }
}

impl std::fmt::Debug for PropertySchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertySchema")
            .field("kind", &self.kind)
            .field("allowed", &self.allowed)
            .field("minimum", &self.minimum)
            .field("maximum", &self.maximum)
            .field("pattern", &self.pattern)
            .field("validation", &self.validation.is_some())
            .finish()
    }
}

// ============================================================================
// ConfigSchema
// ============================================================================

fn object_type() -> String {
    "object".to_string()
}

fn default_true() -> bool {
    true
}

/// 플러그인 설정 스키마 (최상위는 항상 object)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSchema {
    #[serde(rename = "type", default = "object_type")]
    pub schema_type: String,

    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,

    #[serde(default)]
    pub required: Vec<String>,

    /// false면 스키마에 없는 키를 오류로 처리
    #[serde(default = "default_true")]
    pub additional_properties: bool,
}

impl Default for ConfigSchema {
    fn default() -> Self {
        Self {
            schema_type: object_type(),
            properties: BTreeMap::new(),
            required: Vec::new(),
            additional_properties: true,
        }
    }
}

impl ConfigSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// 필수 속성으로 추가
    pub fn required_property(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.insert(name, schema);
        self
    }

    pub fn deny_additional(mut self) -> Self {
        self.additional_properties = false;
        self
    }

    /// JSON 값에서 스키마 파싱
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn validate(&self, config: &PluginConfig) -> ValidationResult {
        ConfigValidator::validate(config, self)
    }
}

// ============================================================================
// ConfigValidator
// ============================================================================

/// 검증 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// 스키마 기반 설정 검증기
pub struct ConfigValidator;

impl ConfigValidator {
    /// 모든 제약을 평가해 전체 오류 목록 반환
    pub fn validate(config: &PluginConfig, schema: &ConfigSchema) -> ValidationResult {
        let mut errors = Vec::new();

        if schema.schema_type != "object" {
            errors.push(format!(
                "Schema type must be object, got {}",
                schema.schema_type
            ));
        }

        for name in &schema.required {
            if !config.contains_key(name) {
                errors.push(format!("{}: Required property missing", name));
            }
        }

        for (name, property) in &schema.properties {
            if let Some(value) = config.get(name) {
                property.check(name, value, &mut errors);
            }
        }

        if !schema.additional_properties {
            for key in config.keys() {
                if !schema.properties.contains_key(key) {
                    errors.push(format!("{}: Unknown property", key));
                }
            }
        }

        ValidationResult::from_errors(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> PluginConfig {
        value.as_object().cloned().unwrap()
    }

    fn smtp_schema() -> ConfigSchema {
        ConfigSchema::new()
            .required_property("host", PropertySchema::string())
            .required_property("port", PropertySchema::number().with_range(1.0, 65535.0))
            .property(
                "mode",
                PropertySchema::string().with_enum(["tls", "starttls", "plain"]),
            )
            .property("sender", PropertySchema::string().with_pattern(r"^[^@]+@[^@]+$"))
    }

    #[test]
    fn test_valid_config() {
        let result = smtp_schema().validate(&config(json!({
            "host": "smtp.local",
            "port": 587,
            "mode": "starttls",
            "sender": "noreply@example.com"
        })));

        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_reports_every_missing_required() {
        let result = smtp_schema().validate(&config(json!({})));

        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                "host: Required property missing".to_string(),
                "port: Required property missing".to_string(),
            ]
        );
    }

    #[test]
    fn test_type_mismatch_skips_other_checks() {
        let schema = ConfigSchema::new().property(
            "port",
            PropertySchema::number()
                .with_minimum(1.0)
                .with_validation(|_| false),
        );

        let result = schema.validate(&config(json!({ "port": "25" })));
        assert_eq!(result.errors, vec!["port: Expected number, got string"]);
    }

    #[test]
    fn test_accumulates_across_properties() {
        let result = smtp_schema().validate(&config(json!({
            "host": 42,
            "port": 70000,
            "mode": "ssl",
            "sender": "not-an-email"
        })));

        assert_eq!(result.errors.len(), 4);
        assert!(result.errors.contains(&"host: Expected string, got number".to_string()));
        assert!(result.errors.iter().any(|e| e.starts_with("port: Value 70000 is above maximum")));
        assert!(result.errors.iter().any(|e| e.starts_with("mode: Value must be one of")));
        assert!(result.errors.iter().any(|e| e.starts_with("sender: Value does not match pattern")));
    }

    #[test]
    fn test_enum_and_range_both_reported() {
        let schema = ConfigSchema::new().property(
            "level",
            PropertySchema::number().with_enum([1, 2, 3]).with_maximum(3.0),
        );

        let result = schema.validate(&config(json!({ "level": 9 })));
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_enum_compares_numbers_by_value() {
        let schema = ConfigSchema::new()
            .property("level", PropertySchema::number().with_enum([1, 2, 3]))
            .property("ratio", PropertySchema::number().with_enum([0.5, 1.0]));

        let result = schema.validate(&config(json!({ "level": 2.0, "ratio": 1 })));
        assert!(result.valid, "{:?}", result.errors);

        let result = schema.validate(&config(json!({ "level": 2.5 })));
        assert_eq!(result.errors, vec!["level: Value must be one of [1, 2, 3]"]);
    }

    #[test]
    fn test_custom_validation_outcomes() {
        let schema = ConfigSchema::new()
            .property(
                "even",
                PropertySchema::number().with_validation(|v| v.as_i64().unwrap_or(1) % 2 == 0),
            )
            .property(
                "token",
                PropertySchema::string().with_validation(|v| {
                    if v.as_str().map_or(0, str::len) >= 8 {
                        Ok(())
                    } else {
                        Err("token too short".to_string())
                    }
                }),
            );

        let result = schema.validate(&config(json!({ "even": 3, "token": "abc" })));
        assert_eq!(
            result.errors,
            vec![
                "even: Custom validation failed".to_string(),
                "token: token too short".to_string(),
            ]
        );

        let result = schema.validate(&config(json!({ "even": 4, "token": "abcdefgh" })));
        assert!(result.valid);
    }

    #[test]
    fn test_additional_properties() {
        let schema = ConfigSchema::new().property("a", PropertySchema::boolean());
        assert!(schema.validate(&config(json!({ "a": true, "b": 1 }))).valid);

        let strict = schema.deny_additional();
        let result = strict.validate(&config(json!({ "a": true, "b": 1 })));
        assert_eq!(result.errors, vec!["b: Unknown property"]);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let schema =
            ConfigSchema::new().property("name", PropertySchema::string().with_pattern("(["));
        let result = schema.validate(&config(json!({ "name": "x" })));
        assert_eq!(result.errors, vec!["name: Invalid pattern (["]);
    }

    #[test]
    fn test_parse_schema_from_json() {
        let schema = ConfigSchema::from_value(json!({
            "type": "object",
            "properties": {
                "retries": { "type": "number", "minimum": 0, "maximum": 5 },
                "tags": { "type": "array" }
            },
            "required": ["retries"],
            "additionalProperties": false
        }))
        .unwrap();

        assert!(!schema.additional_properties);
        assert_eq!(schema.properties["retries"].maximum, Some(5.0));

        let result = schema.validate(&config(json!({ "retries": -1, "tags": {} })));
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_non_object_schema_rejected() {
        let schema = ConfigSchema {
            schema_type: "array".into(),
            ..ConfigSchema::default()
        };
        assert!(!schema.validate(&PluginConfig::new()).valid);
    }
}
