//! Tests for db::factory module - repository creation and configuration.

mod support;

use std::io::Write;
use std::str::FromStr;

use measures_overlay::api::{ComponentKey, TestId};
use measures_overlay::db::factory::{RepositoryFactory, RepositoryType};
use measures_overlay::db::{RemoteConfig, RepositoryConfig, RepositoryError};

#[test]
fn test_repository_type_from_str_remote() {
    let rt = RepositoryType::from_str("remote").unwrap();
    assert_eq!(rt, RepositoryType::Remote);

    let rt = RepositoryType::from_str("REMOTE").unwrap();
    assert_eq!(rt, RepositoryType::Remote);

    let rt = RepositoryType::from_str("http").unwrap();
    assert_eq!(rt, RepositoryType::Remote);
}

#[test]
fn test_repository_type_from_str_local() {
    let rt = RepositoryType::from_str("local").unwrap();
    assert_eq!(rt, RepositoryType::Local);

    let rt = RepositoryType::from_str("LOCAL").unwrap();
    assert_eq!(rt, RepositoryType::Local);
}

#[test]
fn test_repository_type_from_str_invalid() {
    let result = RepositoryType::from_str("invalid");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Unknown repository type"));
}

#[test]
fn test_repository_type_from_env_default() {
    support::with_scoped_env(
        &[("REPOSITORY_TYPE", None), ("ANALYSIS_SERVER_URL", None)],
        || {
            let rt = RepositoryType::from_env();
            assert_eq!(rt, RepositoryType::Local);
        },
    );
}

#[test]
fn test_repository_type_from_env_with_server_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("ANALYSIS_SERVER_URL", Some("http://localhost:9000")),
        ],
        || {
            let rt = RepositoryType::from_env();
            assert_eq!(rt, RepositoryType::Remote);
        },
    );
}

#[test]
fn test_repository_type_from_env_explicit_wins_over_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("local")),
            ("ANALYSIS_SERVER_URL", Some("http://localhost:9000")),
        ],
        || {
            let rt = RepositoryType::from_env();
            assert_eq!(rt, RepositoryType::Local);
        },
    );
}

#[test]
fn test_repository_type_from_env_invalid_defaults_to_local() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("invalid")),
            ("ANALYSIS_SERVER_URL", None),
        ],
        || {
            let rt = RepositoryType::from_env();
            assert_eq!(rt, RepositoryType::Local);
        },
    );
}

#[test]
fn test_remote_config_from_env() {
    support::with_scoped_env(
        &[
            ("ANALYSIS_SERVER_URL", Some("https://sonar.example.com/")),
            ("ANALYSIS_SERVER_TOKEN", Some("squ_abc")),
            ("ANALYSIS_TIMEOUT_SEC", Some("5")),
            ("ANALYSIS_MAX_RETRIES", None),
            ("ANALYSIS_RETRY_DELAY_MS", None),
        ],
        || {
            let config = RemoteConfig::from_env().unwrap();
            assert_eq!(config.base_url, "https://sonar.example.com");
            assert_eq!(config.token.as_deref(), Some("squ_abc"));
            assert_eq!(config.timeout_sec, 5);
            assert_eq!(config.max_retries, RemoteConfig::default().max_retries);
        },
    );
}

#[test]
fn test_remote_config_from_env_rejects_bad_number() {
    support::with_scoped_env(
        &[
            ("ANALYSIS_SERVER_URL", Some("http://localhost:9000")),
            ("ANALYSIS_MAX_RETRIES", Some("lots")),
        ],
        || {
            let err = RemoteConfig::from_env().unwrap_err();
            assert!(err.contains("ANALYSIS_MAX_RETRIES"));
        },
    );
}

#[test]
fn test_remote_config_from_env_requires_url() {
    support::with_scoped_env(&[("ANALYSIS_SERVER_URL", None)], || {
        assert!(RemoteConfig::from_env().is_err());
    });
}

#[tokio::test]
async fn test_create_local_via_factory() {
    let repo = RepositoryFactory::create(RepositoryType::Local, None)
        .await
        .unwrap();
    assert!(repo.health_check().await.unwrap());
    assert!(repo.fetch_metrics(10).await.unwrap().is_empty());
}

#[cfg(feature = "remote-repo")]
#[tokio::test]
async fn test_create_remote_without_config_fails() {
    let result = RepositoryFactory::create(RepositoryType::Remote, None).await;
    let err = result.err().unwrap();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    assert!(err.to_string().contains("requires RemoteConfig"));
}

#[cfg(feature = "remote-repo")]
#[tokio::test]
async fn test_create_remote_with_config() {
    let config = RemoteConfig::with_url("http://localhost:9000/").with_token("squ_abc");
    let remote = RepositoryFactory::create_remote(&config).unwrap();
    assert_eq!(remote.config().base_url, "http://localhost:9000");
    assert_eq!(remote.stats().total_requests, 0);
}

#[cfg(not(feature = "remote-repo"))]
#[tokio::test]
async fn test_create_remote_without_feature_fails() {
    let config = RemoteConfig::with_url("http://localhost:9000");
    let result = RepositoryFactory::create(RepositoryType::Remote, Some(&config)).await;
    assert!(matches!(
        result,
        Err(RepositoryError::ConfigurationError { .. })
    ));
}

#[test]
fn test_from_env_loads_local_fixture() {
    let fixture = support::fixture_path();
    let fixture = fixture.to_str().unwrap();
    support::with_repository_env(&[("LOCAL_FIXTURE_PATH", Some(fixture))], move || async move {
        let repo = RepositoryFactory::from_env().await.unwrap();
        let tests = repo
            .list_tests(&support::invoice_test().id)
            .await
            .unwrap();
        assert_eq!(tests.len(), 4);
    });
}

#[test]
fn test_from_env_with_missing_fixture_fails() {
    support::with_repository_env(
        &[("LOCAL_FIXTURE_PATH", Some("/nonexistent/overlay.json"))],
        || async {
            let result = RepositoryFactory::from_env().await;
            assert!(matches!(
                result,
                Err(RepositoryError::ConfigurationError { .. })
            ));
        },
    );
}

#[test]
fn test_from_env_without_variables_is_empty_local() {
    support::with_repository_env(&[], || async {
        let repo = RepositoryFactory::from_env().await.unwrap();
        assert!(repo.fetch_metrics(100).await.unwrap().is_empty());
    });
}

#[tokio::test]
async fn test_from_config_file_local_fixture() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[repository]
type = "local"

[local]
fixture_path = "{}"

[overlay]
metrics_page_size = 3
"#,
        support::fixture_path().display()
    )
    .unwrap();

    let repo = RepositoryFactory::from_config_file(file.path())
        .await
        .unwrap();
    let measures = repo
        .fetch_measures(
            &ComponentKey::from(support::INVOICE_KEY),
            &["ncloc".to_string()],
        )
        .await
        .unwrap();
    assert_eq!(measures[0].value.as_deref(), Some("1250"));

    let files = repo.covered_files(&TestId::from("AXt-1")).await.unwrap();
    assert_eq!(files.len(), 1);

    let config = RepositoryConfig::from_file(file.path()).unwrap();
    assert_eq!(config.overlay_options().metrics_page_size, 3);
}

#[tokio::test]
async fn test_from_config_remote_without_url_fails() {
    let config = RepositoryConfig::from_toml_str(
        r#"
[repository]
type = "remote"
"#,
    )
    .unwrap();

    let result = RepositoryFactory::from_repository_config(&config).await;
    assert!(matches!(
        result,
        Err(RepositoryError::ConfigurationError { .. })
    ));
}

#[tokio::test]
async fn test_from_config_unknown_type_fails() {
    let config = RepositoryConfig::from_toml_str(
        r#"
[repository]
type = "postgres"
"#,
    )
    .unwrap();

    let err = RepositoryFactory::from_repository_config(&config)
        .await
        .err()
        .unwrap();
    assert!(err.to_string().contains("Invalid repository type"));
}
