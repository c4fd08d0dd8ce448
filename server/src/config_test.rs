use super::*;

#[test]
fn env_parse_unset_uses_default() {
    unsafe { std::env::remove_var("CONFIG_TEST_UNSET") };
    assert_eq!(env_parse("CONFIG_TEST_UNSET", 42_u32), Ok(42));
}

#[test]
fn env_parse_reads_trimmed_value() {
    unsafe { std::env::set_var("CONFIG_TEST_TRIMMED", " 17 ") };
    assert_eq!(env_parse("CONFIG_TEST_TRIMMED", 0_u32), Ok(17));
    unsafe { std::env::remove_var("CONFIG_TEST_TRIMMED") };
}

#[test]
fn env_parse_rejects_garbage() {
    unsafe { std::env::set_var("CONFIG_TEST_GARBAGE", "five") };
    let err = env_parse("CONFIG_TEST_GARBAGE", 0_u32).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { key: "CONFIG_TEST_GARBAGE".into(), value: "five".into() });
    assert_eq!(err.error_code(), "E_CONFIG_INVALID");
    unsafe { std::env::remove_var("CONFIG_TEST_GARBAGE") };
}

#[test]
fn env_parse_rejects_negative_for_unsigned() {
    unsafe { std::env::set_var("CONFIG_TEST_NEGATIVE", "-1") };
    assert!(env_parse("CONFIG_TEST_NEGATIVE", 0_u16).is_err());
    unsafe { std::env::remove_var("CONFIG_TEST_NEGATIVE") };
}

#[test]
fn proxy_config_from_env_overrides_and_defaults() {
    unsafe {
        std::env::remove_var("PORT");
        std::env::set_var("RENDER_QUOTA_LIMIT", "2");
        std::env::remove_var("RENDER_MAX_BODY_BYTES");
    }
    let cfg = ProxyConfig::from_env().unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.quota_limit, 2);
    assert_eq!(cfg.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    unsafe { std::env::remove_var("RENDER_QUOTA_LIMIT") };
}

#[test]
fn proxy_config_default_matches_constants() {
    let cfg = ProxyConfig::default();
    assert_eq!(cfg.port, 3000);
    assert_eq!(cfg.quota_limit, 5);
    assert_eq!(cfg.max_body_bytes, 16 * 1024 * 1024);
}
