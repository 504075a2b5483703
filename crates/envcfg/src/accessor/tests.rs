// crates/envcfg/src/accessor/tests.rs
// ============================================================================
// Module: Environment Accessor Tests
// Description: Unit tests for prefixing, reads, writes, and typed getters.
// Purpose: Validate zero-value substitution and the explicit failure paths.
// Dependencies: envcfg, serde, serde_json, time
// ============================================================================

//! ## Overview
//! All tests run against [`InMemoryEnv`] so they never touch the process
//! environment.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::float_cmp,
    reason = "Test-only assertions use unwrap/expect and exact float literals."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use time::Duration;
use time::macros::datetime;

use super::EnvAccessor;
use crate::config::EnvAccessorConfig;
use crate::error::ConfigError;
use crate::error::EnvError;
use crate::interpolate::Delimiters;
use crate::source::EnvSource;
use crate::source::InMemoryEnv;
use crate::value::Formatted;
use crate::value::Structured;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Accessor over an empty in-memory environment.
fn accessor() -> EnvAccessor<InMemoryEnv> {
    EnvAccessor::with_source(InMemoryEnv::new())
}

/// Accessor with interpolation enabled.
fn interpolating() -> EnvAccessor<InMemoryEnv> {
    accessor().with_interpolation(true)
}

/// Structured value used by decode tests.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Endpoint {
    /// Host name.
    host: String,
    /// Port number.
    port: u16,
}

/// Display-only value used by put tests.
struct Version(u8, u8);

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.0, self.1)
    }
}

// ============================================================================
// SECTION: Prefix Tests
// ============================================================================

#[test]
fn prefix_is_applied_once() {
    let env = accessor().with_prefix("APP_");
    assert_eq!(env.apply_prefix("PORT"), "APP_PORT");
    assert_eq!(env.apply_prefix("APP_PORT"), "APP_PORT");
    assert_eq!(env.apply_prefix(&env.apply_prefix("PORT")), "APP_PORT");
}

#[test]
fn empty_prefix_leaves_key_unchanged() {
    assert_eq!(accessor().apply_prefix("PORT"), "PORT");
}

#[test]
fn prefixed_put_lands_under_prefixed_key() {
    let env = accessor().with_prefix("APP_");
    assert!(env.put("PORT", "8080"));
    assert_eq!(env.source().read("APP_PORT").as_deref(), Some("8080"));
    assert_eq!(env.get("PORT"), "8080");
    assert_eq!(env.get("APP_PORT"), "8080");
}

// ============================================================================
// SECTION: Read/Write Tests
// ============================================================================

#[test]
fn missing_key_reads_empty() {
    assert_eq!(accessor().get("missing"), "");
}

#[test]
fn get_without_interpolation_is_verbatim() {
    let env = accessor();
    env.put("name", "env");
    env.put("test.name", "hello ${name}");
    assert_eq!(env.get("test.name"), "hello ${name}");
}

#[test]
fn put_renders_text_formatted_and_structured_values() {
    let env = accessor();
    assert!(env.put("text", "plain"));
    assert!(env.put("owned", &"owned".to_string()));
    assert!(env.put("int", &42));
    assert!(env.put("flag", &true));
    assert!(env.put("version", &Formatted(Version(1, 2))));
    assert!(env.put("json_text", &json!("raw")));
    assert!(env.put("endpoint", &Structured(Endpoint {
        host: "db".to_string(),
        port: 5432,
    })));

    assert_eq!(env.get("text"), "plain");
    assert_eq!(env.get("owned"), "owned");
    assert_eq!(env.get("int"), "42");
    assert_eq!(env.get("flag"), "true");
    assert_eq!(env.get("version"), "v1.2");
    assert_eq!(env.get("json_text"), "raw");
    assert_eq!(env.get("endpoint"), r#"{"host":"db","port":5432}"#);
}

#[test]
fn put_serialization_failure_leaves_env_untouched() {
    let env = accessor();
    let mut bad_keys = BTreeMap::new();
    bad_keys.insert((1, 2), "tuple keys are not JSON object keys");
    let err = env.try_put("bad", &Structured(&bad_keys)).expect_err("serialization failure");
    assert!(matches!(err, EnvError::Serialization(_)));
    assert!(!env.put("bad", &Structured(&bad_keys)));
    assert!(!env.source().contains("bad"));
}

#[test]
fn put_rejected_write_reports_failure() {
    let env = accessor();
    assert!(!env.put("", "value"));
    let err = env.try_put("A=B", "value").expect_err("write rejection");
    assert!(matches!(err, EnvError::EnvWrite { ref key, .. } if key == "A=B"));
}

// ============================================================================
// SECTION: Interpolation Tests
// ============================================================================

#[test]
fn interpolation_resolves_and_writes_back() {
    let env = interpolating();
    env.put("name", "env");
    env.put("greeting", "hello ${name}");
    assert_eq!(env.get("greeting"), "hello env");
    assert_eq!(env.source().read("greeting").as_deref(), Some("hello env"));
}

#[test]
fn interpolation_memoizes_first_resolution() {
    let env = interpolating();
    env.put("name", "first");
    env.put("greeting", "hi ${name}");
    assert_eq!(env.get("greeting"), "hi first");
    env.put("name", "second");
    assert_eq!(env.get("greeting"), "hi first");
}

#[test]
fn referenced_names_ignore_prefix() {
    let env = interpolating().with_prefix("APP_");
    env.source().set("HOST", "raw-host");
    env.put("HOST", "prefixed-host");
    env.put("URL", "http://${HOST}");
    assert_eq!(env.get("URL"), "http://raw-host");
}

#[test]
fn interpolation_custom_delimiters() {
    let env = interpolating().with_delimiters("%(", ")");
    env.put("user", "root");
    env.put("line", "home=${HOME_UNSET} user=%(user)");
    assert_eq!(env.get("line"), "home=${HOME_UNSET} user=root");
}

#[test]
fn empty_delimiters_keep_defaults() {
    let env = interpolating().with_delimiters("", "");
    assert_eq!(env.delimiters(), &Delimiters::default());
}

// ============================================================================
// SECTION: Typed Getter Tests
// ============================================================================

#[test]
fn int_getter() {
    let env = accessor();
    env.put("n", &-17);
    env.put("bad", "12abc");
    assert_eq!(env.get_int("n"), -17);
    assert_eq!(env.get_int("bad"), 0);
    assert_eq!(env.get_int("missing"), 0);
}

#[test]
fn bool_getter() {
    let env = accessor();
    env.put("on", "T");
    env.put("off", "0");
    env.put("bad", "yes");
    assert!(env.get_bool("on"));
    assert!(!env.get_bool("off"));
    assert!(!env.get_bool("bad"));
    assert!(!env.get_bool("missing"));
}

#[test]
fn float_getter() {
    let env = accessor();
    env.put("ratio", "0.25");
    env.put("bad", "quarter");
    assert_eq!(env.get_float("ratio"), 0.25);
    assert_eq!(env.get_float("bad"), 0.0);
    env.put("huge", "1e40");
    assert_eq!(env.get_float("huge"), 0.0);
}

#[test]
fn duration_getter() {
    let env = accessor();
    env.put("timeout", "1m30s");
    env.put("bad", "30");
    assert_eq!(env.get_duration("timeout"), Duration::seconds(90));
    assert_eq!(env.get_duration("bad"), Duration::ZERO);
    assert_eq!(env.get_duration("missing"), Duration::ZERO);
}

#[test]
fn datetime_getter() {
    let env = accessor();
    env.put("at", "2023-12-31 23:59:59");
    env.put("bad", "yesterday");
    assert_eq!(env.get_datetime("at"), Some(datetime!(2023-12-31 23:59:59 UTC)));
    assert_eq!(env.get_datetime("bad"), None);
    assert_eq!(env.get_datetime("missing"), None);
}

#[test]
fn array_getters() {
    let env = accessor();
    env.put("csv", "a,b");
    env.put("json", r#"["x","y"]"#);
    env.put("ints", "1,2,3");
    env.put("int_json", "[1,2,3]");
    assert_eq!(env.get_arr("csv"), Some(vec!["a".to_string(), "b".to_string()]));
    assert_eq!(env.get_arr("json"), Some(vec!["x".to_string(), "y".to_string()]));
    assert_eq!(env.get_int_arr("ints"), Some(vec![1, 2, 3]));
    assert_eq!(env.get_int_arr("int_json"), Some(vec![1, 2, 3]));
    assert_eq!(env.get_arr("missing"), None);
    assert_eq!(env.get_int_arr("missing"), None);
}

#[test]
fn map_getters() {
    let env = accessor();
    env.put("map", r#"{"a":1,"b":"two"}"#);
    env.put("strs", r#"{"a":"1","b":"2"}"#);
    let map = env.get_map("map");
    assert_eq!(map.get("a"), Some(&json!(1)));
    assert_eq!(map.get("b"), Some(&json!("two")));
    let strs = env.get_str_map("strs");
    assert_eq!(strs.get("b").map(String::as_str), Some("2"));
}

#[test]
fn map_getters_never_fail() {
    let env = accessor();
    env.put("broken", "{not json");
    env.put("numbers", r#"{"a":1}"#);
    assert!(env.get_map("broken").is_empty());
    assert!(env.get_map("missing").is_empty());
    assert!(env.get_str_map("numbers").is_empty());
}

// ============================================================================
// SECTION: Default Fallback Tests
// ============================================================================

#[test]
fn int_of_uses_default_only_when_zero() {
    let env = accessor();
    env.put("test.int", &1);
    assert_eq!(env.get_int_of("test.int", Some(-1)), 1);
    assert_eq!(env.get_int_of("missing", Some(-1)), -1);
    assert_eq!(env.get_int_of("missing", None), 0);
    assert_eq!(env.get_int_of("missing", Some(0)), 0);
}

#[test]
fn stored_zero_is_indistinguishable_from_absent() {
    let env = accessor();
    env.put("zero", &0);
    assert_eq!(env.get_int_of("zero", Some(5)), 5);
    env.put("fzero", "0.0");
    assert_eq!(env.get_float_of("fzero", Some(1.5)), 1.5);
}

#[test]
fn string_and_float_of() {
    let env = accessor();
    env.put("name", "set");
    assert_eq!(env.get_of("name", Some("fallback")), "set");
    assert_eq!(env.get_of("missing", Some("fallback")), "fallback");
    assert_eq!(env.get_of("missing", Some("")), "");
    assert_eq!(env.get_of("missing", None), "");
    assert_eq!(env.get_float_of("missing", Some(2.5)), 2.5);
    assert_eq!(env.get_float_of("missing", None), 0.0);
}

#[test]
fn arr_of_uses_default_only_when_absent() {
    let env = accessor();
    env.put("empty", "[]");
    let default = Some(vec!["d".to_string()]);
    assert_eq!(env.get_arr_of("missing", default.clone()), default);
    assert_eq!(env.get_arr_of("empty", default), Some(Vec::new()));
    assert_eq!(env.get_arr_of("missing", None), None);
}

// ============================================================================
// SECTION: Decode Tests
// ============================================================================

#[test]
fn decode_into_struct() {
    let env = accessor();
    env.put("endpoint", r#"{"host":"db","port":5432}"#);
    let endpoint: Endpoint = env.decode("endpoint").unwrap();
    assert_eq!(endpoint, Endpoint {
        host: "db".to_string(),
        port: 5432,
    });

    let mut target = Endpoint::default();
    env.decode_into("endpoint", Some(&mut target)).unwrap();
    assert_eq!(target.port, 5432);
}

#[test]
fn decode_missing_key_is_no_value() {
    let env = accessor().with_prefix("APP_");
    let err = env.decode::<Endpoint>("missingKey").expect_err("no value");
    assert!(matches!(err, EnvError::NoValue { ref key } if key == "APP_missingKey"));
}

#[test]
fn decode_without_binder_is_nil_binder() {
    let env = accessor();
    env.put("endpoint", r#"{"host":"db","port":1}"#);
    let err = env.decode_into::<Endpoint>("endpoint", None).expect_err("nil binder");
    assert!(matches!(err, EnvError::NilBinder));
}

#[test]
fn decode_parse_failure_leaves_binder_untouched() {
    let env = accessor();
    env.put("endpoint", r#"{"host":"db"}"#);
    let mut target = Endpoint {
        host: "keep".to_string(),
        port: 1,
    };
    let err = env.decode_into("endpoint", Some(&mut target)).expect_err("decode failure");
    assert!(matches!(err, EnvError::Decode { .. }));
    assert_eq!(target.host, "keep");
}

// ============================================================================
// SECTION: Configuration Tests
// ============================================================================

#[test]
fn from_config_applies_settings() {
    let config: EnvAccessorConfig = serde_json::from_value(json!({
        "prefix": "SVC_",
        "interpolate": true,
        "delimiters": {"left": "{{", "right": "}}"}
    }))
    .unwrap();
    let env = EnvAccessor::from_config(config, InMemoryEnv::new()).unwrap();
    assert_eq!(env.prefix(), "SVC_");
    assert!(env.interpolation_enabled());
    env.source().set("who", "world");
    env.put("msg", "hello {{who}}");
    assert_eq!(env.get("msg"), "hello world");
}

#[test]
fn config_defaults_when_fields_missing() {
    let config: EnvAccessorConfig = serde_json::from_value(json!({})).unwrap();
    assert_eq!(config, EnvAccessorConfig::default());
    assert_eq!(config.delimiters, Delimiters::default());
}

#[test]
fn config_rejects_invalid_prefix_and_delimiters() {
    let bad_prefix = EnvAccessorConfig {
        prefix: "A=".to_string(),
        ..EnvAccessorConfig::default()
    };
    assert!(matches!(
        EnvAccessor::from_config(bad_prefix, InMemoryEnv::new()),
        Err(ConfigError::InvalidPrefix(_))
    ));

    let same = EnvAccessorConfig {
        delimiters: Delimiters::new("%", "%"),
        ..EnvAccessorConfig::default()
    };
    assert!(matches!(same.validate(), Err(ConfigError::InvalidDelimiters(_))));
}

#[test]
fn config_rejects_unknown_fields() {
    let result = serde_json::from_value::<EnvAccessorConfig>(json!({"prefx": "X_"}));
    assert!(result.is_err());
}
