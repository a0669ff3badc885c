//! boredbot - Bored Gods chat bot

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use boredbot::commands::{Bot, Command};
use boredbot::{Config, Server};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Bored Gods chat bot
#[derive(Parser, Debug)]
#[command(name = "boredbot", version, about = "Dice, wiki search and webhook relay")]
struct Args {
    /// Config file (defaults to ./boredbot.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run the webhook server
    Serve {
        /// Override the configured bind address
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// Roll dice, e.g. 2d6+3
    Roll {
        dice: String,
        /// Name of the rolling user
        #[arg(short, long, default_value = "anonymous")]
        user: String,
    },
    /// Search the wiki
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Check the weather
    Weather,
    /// List commands
    Help,
    /// Ask a rules question
    Chat {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Ask a question answered from wiki pages
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boredbot=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;

    let (command, user) = match args.command {
        Cmd::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            return serve(config).await;
        }
        Cmd::Roll { dice, user } => (Command::Roll { dice }, user),
        Cmd::Search { query } => (
            Command::Search {
                query: query.join(" "),
            },
            "cli".to_string(),
        ),
        Cmd::Weather => (Command::Weather, "cli".to_string()),
        Cmd::Help => (Command::Help, "cli".to_string()),
        Cmd::Chat { question } => (
            Command::Chat {
                question: question.join(" "),
            },
            "cli".to_string(),
        ),
        Cmd::Ask { question } => (
            Command::Ask {
                question: question.join(" "),
            },
            "cli".to_string(),
        ),
    };

    let bot = Bot::from_config(&config)?;
    let reply = bot.handle(&command, &user).await;
    println!("{}", reply);

    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    let server = Arc::new(Server::new(config)?);

    let signal_server = server.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            signal_server.shutdown();
        }
    });

    server.run().await
}
