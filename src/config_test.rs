use super::*;

#[test]
fn env_parse_missing_key_uses_default() {
    let value: u64 = env_parse("CHATFEED_TEST_KEY_THAT_IS_NEVER_SET", 17);
    assert_eq!(value, 17);
}

#[test]
fn from_env_produces_usable_defaults() {
    let config = Config::from_env();
    assert!(!config.base_url.is_empty());
    assert!(config.poll_interval >= Duration::from_secs(1));
    assert!(config.state_file.file_name().is_some());
}
