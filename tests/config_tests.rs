// Tests for layered configuration loading

use communisync::media::MediaSource;
use communisync::Config;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults_without_file() {
    let cfg = Config::load("does/not/exist/communisync").unwrap();

    assert_eq!(cfg.service.name, "communisync");
    assert_eq!(cfg.service.http.bind, "127.0.0.1");
    assert_eq!(cfg.service.http.port, 8080);
    assert_eq!(cfg.assistant.api_key_env, "GEMINI_API_KEY");
    assert_eq!(
        cfg.assistant.base_url,
        "https://generativelanguage.googleapis.com/v1beta"
    );
    assert_eq!(cfg.session.performance_min, 70);
    assert_eq!(cfg.session.performance_max, 100);
    assert_eq!(cfg.media.source, MediaSource::Virtual);
    assert_eq!(cfg.landing.rotation_interval_ms, 2000);
    assert_eq!(cfg.recording.chunk_duration_ms, 1000);
    assert_eq!(cfg.recording.output_dir, "recordings");
}

#[test]
fn test_file_overrides_defaults() {
    let file = write_config(
        r#"
[service.http]
port = 9090

[assistant]
model = "gemini-2.0-flash"
api_key_env = "COMMUNISYNC_TEST_UNSET_KEY"

[media]
source = "none"
"#,
    );

    let cfg = Config::load(file.path().to_str().unwrap()).unwrap();

    assert_eq!(cfg.service.http.port, 9090);
    assert_eq!(cfg.service.http.bind, "127.0.0.1");
    assert_eq!(cfg.assistant.model, "gemini-2.0-flash");
    assert_eq!(cfg.media.source, MediaSource::None);
    assert_eq!(cfg.assistant.api_key(), None);
}

#[test]
fn test_invalid_performance_range_is_rejected() {
    let file = write_config(
        r#"
[session]
performance_min = 90
performance_max = 80
"#,
    );

    let err = Config::load(file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("performance_min"));
}

#[test]
fn test_shipped_config_matches_defaults() {
    let shipped = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config/communisync")).unwrap();
    let defaults = Config::load("does/not/exist/communisync").unwrap();

    assert_eq!(shipped.service.http.port, defaults.service.http.port);
    assert_eq!(shipped.assistant.model, defaults.assistant.model);
    assert_eq!(shipped.landing.rotation_interval_ms, defaults.landing.rotation_interval_ms);
    assert_eq!(shipped.recording.chunk_duration_ms, 1000);
    assert_eq!(shipped.recording.output_dir, defaults.recording.output_dir);
}

#[test]
fn test_zero_chunk_duration_is_rejected() {
    let file = write_config(
        r#"
[recording]
chunk_duration_ms = 0
"#,
    );

    let err = Config::load(file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("chunk_duration_ms"));
}
