#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{redirect, Client, StatusCode};

/// A server process on its own port and its own sqlite file. Killed on drop.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub database_url: String,
    database_path: PathBuf,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let database_path = std::env::temp_dir().join(format!("useritem-test-{}-{}.db", std::process::id(), port));
        let _ = std::fs::remove_file(&database_path);
        let database_url = format!("sqlite://{}", database_path.display());

        let child = Command::new(env!("CARGO_BIN_EXE_useritem"))
            .env("APP_ENV", "development")
            .env("SERVER_HOST", "127.0.0.1")
            .env("USERITEM_PORT", port.to_string())
            .env("DATABASE_URL", &database_url)
            .env("RUST_LOG", "warn")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            database_url,
            database_path,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register a user through the admin CLI against this server's database
    pub fn add_user(&self, id: i64, name: &str, email: &str, password: &str) -> Result<()> {
        let id = id.to_string();
        let output = self
            .ctl()
            .args(["user", "add", "--id", id.as_str(), "--name", name, "--email", email, "--password", password])
            .output()
            .context("failed to run useritemctl")?;
        anyhow::ensure!(
            output.status.success(),
            "useritemctl user add failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        Ok(())
    }

    pub fn ctl(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_useritemctl"));
        cmd.env("DATABASE_URL", &self.database_url).env("RUST_LOG", "error");
        cmd
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_file(&self.database_path);
    }
}

pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Client that reports redirects instead of following them
pub fn client() -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .expect("reqwest client")
}
