//! Black-box tests against the compiled `roster` binary.
//!
//! Each test starts its own server on a free port, pointed at a database
//! address where nothing listens, and talks to it over real HTTP.
//!
//! Run with: cargo test --test http_tests
use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tempfile::TempDir;

/// Manages one server process and its scratch directory
struct ServerManager {
    process: Child,
    port: u16,
    _dir: TempDir,
}

impl ServerManager {
    /// Write a config, start the binary and wait until it accepts connections
    fn start(pool_size: u32) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let port = Self::free_port();

        let config_path = dir.path().join("roster.toml");
        let error_log = dir.path().join("log").join("error.log");
        let mut file = std::fs::File::create(&config_path).expect("Failed to write config");
        write!(
            file,
            r#"
[http]
host = "127.0.0.1"
port = {port}
request_timeout_seconds = 30
workers = 2

[database]
host = "127.0.0.1"
port = 1
connect_timeout_seconds = 2
pool_size = {pool_size}

[logging]
error_log = "{}"
"#,
            error_log.display()
        )
        .expect("Failed to write config");

        eprintln!("[test] Starting server on port {}...", port);
        let process = Command::new(env!("CARGO_BIN_EXE_roster"))
            .arg("--config")
            .arg(&config_path)
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .expect("Failed to start roster");

        let manager = Self {
            process,
            port,
            _dir: dir,
        };
        manager.wait_for_ready();
        manager
    }

    fn free_port() -> u16 {
        TcpListener::bind("127.0.0.1:0")
            .and_then(|l| l.local_addr())
            .map(|a| a.port())
            .expect("Failed to find a free port")
    }

    fn wait_for_ready(&self) {
        let max_attempts = 100;
        let delay = Duration::from_millis(100);

        for _ in 0..max_attempts {
            if TcpStream::connect(("127.0.0.1", self.port)).is_ok() {
                return;
            }
            std::thread::sleep(delay);
        }

        panic!(
            "server did not start within {} seconds",
            (max_attempts as f64 * delay.as_secs_f64())
        );
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }
}

impl Drop for ServerManager {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

#[tokio::test]
async fn root_greets() {
    let server = ServerManager::start(0);

    let response = reqwest::get(server.url("/")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "Hello, World!");
}

#[tokio::test]
async fn health_ignores_database() {
    let server = ServerManager::start(0);

    let response = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let server = ServerManager::start(0);

    let response = reqwest::get(server.url("/nope")).await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn unreachable_database_is_server_error() {
    let server = ServerManager::start(0);

    let response = reqwest::get(server.url("/students")).await.unwrap();
    assert!(response.status().is_server_error(), "got {}", response.status());

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unreachable_database_is_server_error_when_pooled() {
    let server = ServerManager::start(2);

    let response = reqwest::get(server.url("/students")).await.unwrap();
    assert!(response.status().is_server_error(), "got {}", response.status());
}
