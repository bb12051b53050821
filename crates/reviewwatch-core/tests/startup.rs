//! Startup behaviour of the `reviewwatch` binary

use std::time::Duration;

use tokio::process::Command;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn missing_credentials_exit_non_zero_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    // An empty working directory keeps a developer's .env out of the run
    let workdir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_reviewwatch"))
        .arg("watch")
        .current_dir(workdir.path())
        .env_remove("PRACTICUM_TOKEN")
        .env_remove("TELEGRAM_TOKEN")
        .env_remove("TELEGRAM_CHAT_ID")
        .env_remove("REVIEWWATCH_CONFIG")
        .env("REVIEWWATCH__API__ENDPOINT", format!("{}/statuses/", server.uri()))
        .env("REVIEWWATCH__TELEGRAM__API_URL", server.uri())
        .env("RUST_LOG", "info")
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(Duration::from_secs(30), output)
        .await
        .expect("binary should exit on its own")
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Отсутствует PRACTICUM_TOKEN"));
    assert!(stdout.contains("Отсутствует TELEGRAM_TOKEN"));
    assert!(stdout.contains("Отсутствует TELEGRAM_CHAT_ID"));

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
