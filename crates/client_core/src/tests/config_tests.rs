use super::*;

use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_point_at_the_public_store() {
    let settings = Settings::default();
    assert_eq!(settings.store_base_url, DEFAULT_STORE_BASE_URL);
    assert_eq!(settings.retry_delay(), Duration::from_millis(5_000));
    assert_eq!(settings.request_timeout(), Duration::from_secs(30));
}

#[test]
fn file_overrides_only_the_keys_it_sets() {
    let mut settings = Settings::default();
    apply_file_overrides(
        &mut settings,
        r#"
store_base_url = "http://127.0.0.1:9000"
retry_delay_ms = 250
"#,
    )
    .expect("parse");

    assert_eq!(settings.store_base_url, "http://127.0.0.1:9000");
    assert_eq!(settings.retry_delay_ms, 250);
    assert_eq!(settings.request_timeout_secs, 30);
}

#[test]
fn malformed_file_is_reported() {
    let mut settings = Settings::default();
    let err = apply_file_overrides(&mut settings, "retry_delay_ms = \"soon\"")
        .expect_err("type mismatch should fail");
    assert!(format!("{err:#}").contains(SETTINGS_FILE));
    assert_eq!(settings, Settings::default());
}

#[test]
fn app_prefixed_env_wins_over_short_name() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env_from(&[
            ("MOVIES_STORE_URL", "http://short.example"),
            ("APP__STORE_BASE_URL", "http://prefixed.example"),
            ("APP__RETRY_DELAY_MS", "1200"),
        ]),
    );
    assert_eq!(settings.store_base_url, "http://prefixed.example");
    assert_eq!(settings.retry_delay_ms, 1_200);
}

#[test]
fn unparsable_numbers_in_env_are_ignored() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env_from(&[
            ("APP__RETRY_DELAY_MS", "five seconds"),
            ("APP__REQUEST_TIMEOUT_SECS", " 7 "),
        ]),
    );
    assert_eq!(settings.retry_delay_ms, 5_000);
    assert_eq!(settings.request_timeout_secs, 7);
}

#[test]
fn zero_durations_are_ignored() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env_from(&[
            ("APP__RETRY_DELAY_MS", "0"),
            ("APP__REQUEST_TIMEOUT_SECS", " 0 "),
        ]),
    );
    assert_eq!(settings, Settings::default());

    apply_file_overrides(
        &mut settings,
        "retry_delay_ms = 0\nrequest_timeout_secs = 0\n",
    )
    .expect("parse");
    assert_eq!(settings, Settings::default());
}

#[test]
fn store_url_requires_http_scheme() {
    let mut settings = Settings {
        store_base_url: "ftp://files.example".into(),
        ..Settings::default()
    };
    assert!(settings.store_url().is_err());

    settings.store_base_url = "not a url".into();
    assert!(settings.store_url().is_err());

    settings.store_base_url = " https://db.example/root ".into();
    let url = settings.store_url().expect("valid url");
    assert_eq!(url.host_str(), Some("db.example"));
}
