use super::*;

/// # Safety
/// Tests touching the process environment share one variable; each test
/// restores it before returning.
unsafe fn clear_api_env() {
    unsafe {
        std::env::remove_var(API_BASE_ENV);
    }
}

#[test]
fn default_uses_versioned_api_prefix() {
    assert_eq!(ClientConfig::default().base_path, "/api/v1");
}

#[test]
fn url_appends_path_verbatim() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.url("/me"), "/api/v1/me");
    assert_eq!(cfg.url("/projects/3/agents/runs"), "/api/v1/projects/3/agents/runs");
}

#[test]
fn new_trims_trailing_slashes() {
    let cfg = ClientConfig::new("https://forge.test/api/v1/");
    assert_eq!(cfg.base_path, "https://forge.test/api/v1");
}

#[test]
fn parse_base_path_rejects_blank_values() {
    assert_eq!(
        parse_base_path(" / "),
        Err(ConfigError::EmptyBasePath { var: API_BASE_ENV.to_owned() })
    );
}

#[test]
fn from_env_reads_override_and_falls_back_to_default() {
    unsafe {
        clear_api_env();
    }
    assert_eq!(ClientConfig::from_env().unwrap(), ClientConfig::default());

    unsafe {
        std::env::set_var(API_BASE_ENV, "http://127.0.0.1:8080/api/v1/");
    }
    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_path, "http://127.0.0.1:8080/api/v1");

    unsafe {
        std::env::set_var(API_BASE_ENV, "");
    }
    assert!(ClientConfig::from_env().is_err());

    unsafe { clear_api_env() };
}
