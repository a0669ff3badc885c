//! boredbot - Bored Gods chat bot
//!
//! Dice rolling with critical flavor, wiki search, rules questions, and
//! wiki webhook announcements.

pub mod chat;
pub mod commands;
pub mod config;
pub mod dice;
pub mod notify;
pub mod resources;
pub mod webhooks;
pub mod wiki;

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tracing::info;

pub use config::Config;

use notify::{Notification, Relay};
use resources::Resources;
use webhooks::WebhookState;

/// The webhook server instance
pub struct Server {
    config: Config,
    resources: Arc<Resources>,
    relay: Relay,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Create a new server instance, loading resource tables up front
    pub fn new(config: Config) -> Result<Self> {
        let resources = Resources::load(&config.resources_dir, &config.songs)?;
        let relay = Relay::new(&config.notify)?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            resources: Arc::new(resources),
            relay,
            shutdown_tx,
            shutdown_rx,
        })
    }

    fn state(&self, notifications: mpsc::Sender<Notification>) -> WebhookState {
        WebhookState::new(
            self.resources.clone(),
            notifications,
            self.config.notify.channel_id,
        )
    }

    /// Run the server until shutdown
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("boredbot listening on {}", local_addr);

        let (tx, rx) = notify::channel();
        let relay = tokio::spawn(self.relay.clone().run(rx));

        let router = webhooks::router(self.state(tx));
        let mut shutdown_rx = self.shutdown_rx.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_rx.changed().await.ok();
            })
            .await?;

        // The router held the last sender; the relay finishes its queue and exits
        relay.await?;

        info!("boredbot shutdown complete");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}
