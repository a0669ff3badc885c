//! Common test utilities - BotTest harness and deterministic dice
#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use boredbot::dice::RandomSource;
use boredbot::resources::Resources;
use boredbot::config::SongsConfig;
use boredbot::{Config, Server};
use reqwest::Client;
use tokio::task::JoinHandle;

/// Resource tables shipped with the crate
pub fn resources_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources")
}

pub fn resources() -> Arc<Resources> {
    Arc::new(Resources::load(&resources_dir(), &SongsConfig::default()).expect("Failed to load bundled resources"))
}

/// Replays scripted faces and phrase picks
pub struct Scripted {
    faces: VecDeque<u32>,
    picks: VecDeque<usize>,
}

impl Scripted {
    pub fn faces(faces: &[u32]) -> Self {
        Self {
            faces: faces.iter().copied().collect(),
            picks: VecDeque::new(),
        }
    }

    pub fn with_picks(mut self, picks: &[usize]) -> Self {
        self.picks = picks.iter().copied().collect();
        self
    }

    pub fn exhausted(&self) -> bool {
        self.faces.is_empty()
    }
}

impl RandomSource for Scripted {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let face = self.faces.pop_front().expect("no scripted face left");
        assert!((1..=sides).contains(&face), "scripted {} on d{}", face, sides);
        face
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len
    }
}

/// Test harness that spawns a real webhook server on a random port
pub struct BotTest {
    pub addr: SocketAddr,
    pub client: Client,
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
}

impl BotTest {
    /// Start a new test server instance
    pub async fn start() -> Result<Self> {
        // Find a random available port
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);

        let config = Config {
            bind_addr: addr,
            resources_dir: resources_dir(),
            ..Config::default()
        };

        let server = Arc::new(Server::new(config)?);
        let server_clone = server.clone();

        // Spawn the server in a background task
        let handle = tokio::spawn(async move {
            if let Err(e) = server_clone.run().await {
                eprintln!("Server error: {}", e);
            }
        });

        let client = Client::builder().timeout(Duration::from_secs(5)).build()?;

        // Poll until server is ready (max 2 seconds)
        let mut ready = false;
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if client
                .get(format!("http://{}/health", addr))
                .send()
                .await
                .is_ok()
            {
                ready = true;
                break;
            }
        }

        if !ready {
            anyhow::bail!("Server failed to start within 2 seconds");
        }

        Ok(Self {
            addr,
            client,
            server,
            handle: Some(handle),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Shut down and wait for the server task to finish
    pub async fn stop(mut self) {
        self.server.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        }
    }
}

impl Drop for BotTest {
    fn drop(&mut self) {
        self.server.shutdown();
    }
}
