use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

const ALL_VARS: &[&str] = &[
    "NEWSCHECK_PORT",
    "NEWSCHECK_BIND_ADDR",
    "NEWSCHECK_INDEX_PATH",
    "NEWSCHECK_ENCODER_PATH",
    "NEWSCHECK_EMBEDDING_API_BASE",
    "NEWSCHECK_EMBEDDING_MODEL",
    "OPENAI_API_KEY",
    "NEWSCHECK_SEARCH_ENDPOINT",
    "NEWSCHECK_NUM_RESULTS",
    "NEWSCHECK_HTTP_TIMEOUT_SECS",
    "NEWSCHECK_REPORT_MODEL",
    "NEWSCHECK_TOP_K",
    "NEWSCHECK_FILTER_THRESHOLD",
];

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_newscheck_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for key in ALL_VARS {
        unsafe { env::remove_var(key) };
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.index_path, PathBuf::from("./.index"));
    assert!(config.encoder_path.is_none());
    assert!(config.api_key.is_none());
    assert_eq!(config.embedding_model, "text-embedding-3-small");
    assert_eq!(config.num_results, 3);
    assert_eq!(config.top_k, 5);
    assert_eq!(config.http_timeout_secs, 30);
    assert!((config.filter_threshold - 0.75).abs() < f32::EPSILON);
}

#[test]
fn test_socket_addr() {
    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_newscheck_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8080);
    assert_eq!(config.search_endpoint, DEFAULT_SEARCH_ENDPOINT);
    assert_eq!(config.report_model, DEFAULT_REPORT_MODEL);
    assert!(config.api_key.is_none());
}

#[test]
#[serial]
fn test_from_env_ipv6_bind_addr() {
    clear_newscheck_env();

    with_env_vars(&[("NEWSCHECK_BIND_ADDR", "::1")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(
            config.bind_addr,
            IpAddr::V6(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
    });
}

#[test]
#[serial]
fn test_from_env_full() {
    clear_newscheck_env();

    with_env_vars(
        &[
            ("NEWSCHECK_PORT", "9000"),
            ("NEWSCHECK_INDEX_PATH", "/var/lib/newscheck"),
            ("NEWSCHECK_ENCODER_PATH", "/models/bert-base-uncased"),
            ("NEWSCHECK_EMBEDDING_API_BASE", "http://localhost:11434/v1"),
            ("NEWSCHECK_EMBEDDING_MODEL", "nomic-embed-text"),
            ("OPENAI_API_KEY", "sk-test"),
            ("NEWSCHECK_NUM_RESULTS", "7"),
            ("NEWSCHECK_HTTP_TIMEOUT_SECS", "5"),
            ("NEWSCHECK_TOP_K", "2"),
            ("NEWSCHECK_FILTER_THRESHOLD", "0.9"),
        ],
        || {
            let config = Config::from_env().expect("should parse full config");

            assert_eq!(config.port, 9000);
            assert_eq!(config.index_path, PathBuf::from("/var/lib/newscheck"));
            assert_eq!(
                config.encoder_path,
                Some(PathBuf::from("/models/bert-base-uncased"))
            );
            assert_eq!(config.embedding_api_base, "http://localhost:11434/v1");
            assert_eq!(config.embedding_model, "nomic-embed-text");
            assert_eq!(config.api_key.as_deref(), Some("sk-test"));
            assert_eq!(config.num_results, 7);
            assert_eq!(config.http_timeout().as_secs(), 5);
            assert_eq!(config.top_k, 2);
            assert!((config.filter_threshold - 0.9).abs() < f32::EPSILON);
        },
    );
}

#[test]
#[serial]
fn test_blank_api_key_is_unset() {
    clear_newscheck_env();

    with_env_vars(&[("OPENAI_API_KEY", "   ")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.api_key.is_none());
    });
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_newscheck_env();

    with_env_vars(&[("NEWSCHECK_PORT", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("invalid port"));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_newscheck_env();

    with_env_vars(&[("NEWSCHECK_PORT", "not_a_port")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::PortParseError { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_newscheck_env();

    with_env_vars(&[("NEWSCHECK_BIND_ADDR", "not.an.ip.address")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_threshold_rejected() {
    clear_newscheck_env();

    with_env_vars(&[("NEWSCHECK_FILTER_THRESHOLD", "high")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    });

    with_env_vars(&[("NEWSCHECK_FILTER_THRESHOLD", "1.5")], || {
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("outside"));
    });
}

#[test]
#[serial]
fn test_invalid_num_results_uses_default() {
    clear_newscheck_env();

    with_env_vars(&[("NEWSCHECK_NUM_RESULTS", "many")], || {
        let config = Config::from_env().expect("should parse with fallback");
        assert_eq!(config.num_results, 3);
    });
}

#[test]
fn test_validate_nonexistent_encoder_path() {
    let config = Config {
        encoder_path: Some(PathBuf::from("/nonexistent/path/to/encoder")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::PathNotFound { .. }));
}

#[test]
fn test_validate_encoder_path_is_file() {
    let config = Config {
        encoder_path: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotADirectory { .. }));
}

#[test]
fn test_validate_index_path_is_file() {
    let config = Config {
        index_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml"),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotADirectory { .. }));
}

#[test]
fn test_validate_rejects_zero_counts() {
    let config = Config {
        top_k: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue {
            name: "NEWSCHECK_TOP_K",
            ..
        })
    ));

    let config = Config {
        http_timeout_secs: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_success_with_valid_paths() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let config = Config {
        index_path: manifest_dir.join("src"),
        encoder_path: Some(manifest_dir.join("src")),
        ..Default::default()
    };

    assert!(config.validate().is_ok());
}
