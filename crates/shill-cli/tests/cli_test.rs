//! Integration tests for the `shill-hunter` binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the `shill-hunter` command for testing.
fn hunter_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shill-hunter"));
    // Suppress tracing output during tests
    cmd.env("RUST_LOG", "error");
    cmd
}

const UK_TIMELINE: &str = r#"[
  {
    "id": 1712345678901234567,
    "id_str": "1712345678901234567",
    "created_at": "Wed Oct 11 10:30:00 +0000 2023",
    "full_text": "The colour of autumn leaves is absolutely brilliant this year. Centre of town looks lovely.",
    "coordinates": {"type": "Point", "coordinates": [-0.1276, 51.5072]},
    "place": {"full_name": "London, England"},
    "source": "<a href=\"http://twitter.com/download/iphone\" rel=\"nofollow\">Twitter for iPhone</a>"
  },
  {
    "id": 1712345678901234568,
    "id_str": "1712345678901234568",
    "created_at": "Thu Oct 12 14:15:00 +0000 2023",
    "full_text": "Favour doing this properly rather than rushing through it. Organisation is key to success.",
    "coordinates": null,
    "place": null,
    "source": "<a href=\"https://mobile.twitter.com\" rel=\"nofollow\">Twitter Web App</a>"
  }
]"#;

struct Fixture {
    _dir: TempDir,
    config: PathBuf,
    tweets: PathBuf,
}

fn fixture(config_body: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");
    let tweets = dir.path().join("timeline.json");
    std::fs::write(&config, config_body).unwrap();
    std::fs::write(&tweets, UK_TIMELINE).unwrap();
    Fixture {
        _dir: dir,
        config,
        tweets,
    }
}

const OFFLINE_CONFIG: &str = r#"
config:
  target: "@suspicious_account"
  search_terms: ["colour", "success"]
  dialect: en-US
"#;

fn offline(fx: &Fixture, plugins: &str) -> Command {
    let mut cmd = hunter_cmd();
    cmd.arg(&fx.config)
        .arg(plugins)
        .arg("--tweets-file")
        .arg(&fx.tweets);
    cmd
}

mod listing {
    use super::*;

    #[test]
    fn lists_builtin_processors() {
        hunter_cmd()
            .arg("--list-processors")
            .assert()
            .success()
            .stdout(predicate::str::contains("shill_hunter.processors"))
            .stdout(predicate::str::contains("sentiment_analysis"))
            .stdout(predicate::str::contains("grammar_analysis"))
            .stdout(predicate::str::contains("spelling_analysis"))
            .stdout(predicate::str::contains("geo_analysis"));
    }

    #[test]
    fn requires_config_and_plugins() {
        hunter_cmd()
            .assert()
            .failure()
            .stderr(predicate::str::contains("<YAML>"));
    }
}

mod offline_runs {
    use super::*;

    #[test]
    fn sentiment_analysis_prints_scores() {
        let fx = fixture(OFFLINE_CONFIG);
        offline(&fx, "sentiment_analysis")
            .assert()
            .success()
            .stdout(predicate::str::contains("Processing input YAML"))
            .stdout(predicate::str::contains("Processing target suspicious_account"))
            .stdout(predicate::str::contains("The following search terms were found:"))
            .stdout(predicate::str::contains("compound value is: "))
            .stdout(predicate::str::contains(
                "Aggregated average compound value for search terms",
            ));
    }

    #[test]
    fn dialect_and_spelling_flag_uk_english() {
        let fx = fixture(OFFLINE_CONFIG);
        offline(&fx, "grammar_analysis,spelling_analysis")
            .assert()
            .success()
            .stdout(predicate::str::contains("Chosen language/dialect: en-US"))
            .stdout(predicate::str::contains("Dialect is: en-GB\nWord found is: colour"))
            .stdout(predicate::str::contains("Misspelled word: organisation"))
            .stdout(predicate::str::contains("organization"));
    }

    #[test]
    fn geo_analysis_prints_locations() {
        let fx = fixture(OFFLINE_CONFIG);
        offline(&fx, "geo_analysis")
            .assert()
            .success()
            .stdout(predicate::str::contains("51.507200, -0.127600"))
            .stdout(predicate::str::contains("London, England"))
            .stdout(predicate::str::contains("Client: Twitter for iPhone (1)"));
    }

    #[test]
    fn max_tweets_limits_saved_timeline() {
        let fx = fixture(OFFLINE_CONFIG);
        offline(&fx, "geo_analysis")
            .args(["--max-tweets", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Geotagged tweets: 1 of 1"));
    }

    #[test]
    fn target_override() {
        let fx = fixture(OFFLINE_CONFIG);
        offline(&fx, "geo_analysis")
            .args(["--target", "@someone_else"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Processing target someone_else"));
    }

    #[test]
    fn json_output() {
        let fx = fixture(OFFLINE_CONFIG);
        let output = offline(&fx, "sentiment_analysis,geo_analysis")
            .arg("--json")
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["target"], "suspicious_account");
        assert_eq!(json["tweets"], 2);
        assert_eq!(json["processors"][0]["name"], "sentiment_analysis");
        assert_eq!(json["processors"][0]["status"], "ok");
        assert_eq!(json["processors"][1]["report"]["geotagged"], 1);
    }

    #[test]
    fn failing_processor_does_not_stop_others() {
        let fx = fixture("config:\n  target: someone\n  search_terms: [colour]\n");
        offline(&fx, "grammar_analysis,sentiment_analysis")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("The following search terms were found:"))
            .stderr(predicate::str::contains("Processors failed: grammar_analysis"));
    }

    #[test]
    fn sentiment_without_search_terms_fails() {
        let fx = fixture("config:\n  target: someone\n  dialect: en-GB\n");
        offline(&fx, "sentiment_analysis,geo_analysis")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("No search terms found").not())
            .stdout(predicate::str::contains("Geotagged tweets: 1 of 2"))
            .stderr(predicate::str::contains("Processors failed: sentiment_analysis"));
    }
}

mod errors {
    use super::*;

    #[test]
    fn unknown_processor() {
        let fx = fixture(OFFLINE_CONFIG);
        offline(&fx, "sentiment_analysis,nonexistent_processor")
            .assert()
            .failure()
            .stderr(predicate::str::contains("nonexistent_processor"))
            .stdout(predicate::str::contains("Processing input YAML").not());
    }

    #[test]
    fn missing_config_file() {
        hunter_cmd()
            .arg(Path::new("/nonexistent/config.yaml"))
            .arg("geo_analysis")
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load configuration"));
    }

    #[test]
    fn invalid_dialect() {
        let fx = fixture("config:\n  target: someone\n  dialect: \"english please\"\n");
        offline(&fx, "geo_analysis")
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid configuration"));
    }

    #[test]
    fn credentials_required_without_tweets_file() {
        let fx = fixture(OFFLINE_CONFIG);
        hunter_cmd()
            .arg(&fx.config)
            .arg("geo_analysis")
            .assert()
            .failure()
            .stderr(predicate::str::contains("credentials are required"));
    }
}

mod api {
    use super::*;
    use wiremock::{
        matchers::{header_exists, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn api_config(server: &MockServer) -> String {
        format!(
            r#"
config:
  access_token: "1234-token"
  access_secret: "token-secret"
  consumer_key: "consumer-key"
  consumer_secret: "consumer-secret"
  target: suspicious_account
  search_terms: [colour]
  dialect: en-US
  api_url: "{}"
  retry:
    max_attempts: 1
    initial_delay_ms: 1
    max_delay_ms: 1
    jitter: 0.0
"#,
            server.uri()
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetches_and_analyzes_timeline() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1.1/account/verify_credentials.json"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id_str": "42",
                "screen_name": "investigator",
                "name": "Investigator"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/1.1/statuses/user_timeline.json"))
            .and(query_param("screen_name", "suspicious_account"))
            .and(query_param("count", "2"))
            .and(header_exists("authorization"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(UK_TIMELINE, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fx = fixture(&api_config(&server));
        hunter_cmd()
            .arg(&fx.config)
            .arg("grammar_analysis,geo_analysis")
            .args(["--max-tweets", "2", "--verify"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Word found is: colour"))
            .stdout(predicate::str::contains("Geotagged tweets: 1 of 2"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn api_error_fails_run() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1.1/statuses/user_timeline.json"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "errors": [{"code": 89, "message": "Invalid or expired token."}]
            })))
            .mount(&server)
            .await;

        let fx = fixture(&api_config(&server));
        hunter_cmd()
            .arg(&fx.config)
            .arg("geo_analysis")
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to fetch tweets for @suspicious_account"));
    }
}
