//! Bot commands
//!
//! Each command takes its arguments plus the invoking user's name and
//! produces a [`Reply`]. Delivery to the chat platform happens elsewhere.

mod ask;
mod roll;
mod search;

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::chat::ChatClient;
use crate::config::Config;
use crate::dice::{RandomSource, RngSource};
use crate::resources::Resources;
use crate::wiki::WikiClient;

pub use ask::{
    ask_reply, build_document, no_knowledge_message, split_message, ASK_FAILED_MESSAGE,
    BODY_LIMIT, MAX_MESSAGE_LEN, NO_ANSWER_MESSAGE, PREVIEW_LIMIT,
};
pub use roll::{error_message, roll_reply, ALLOWED_DICE_MESSAGE};
pub use search::{
    results_reply, search_reply, EMBED_COLOR, FETCH_FAILED_MESSAGE, NO_RESULTS_MESSAGE,
};

pub const CHAT_FAILED_MESSAGE: &str = "Something went wrong, and I don't know what.";

pub const HELP_LINES: [&str; 6] = [
    "Available commands:",
    "`/search sasha yarna` - Search the Bored Gods Wiki",
    "`/ask who is sasha` - Ask a question answered from the wiki",
    "`/roll 2d6+3` - Roll some dice",
    "`/weather` - Check the Stone-upon-hill weather!",
    "`/chat what is disengage` - Ask about DND rules",
];

/// A user command with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Roll { dice: String },
    Search { query: String },
    Weather,
    Help,
    Chat { question: String },
    Ask { question: String },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Roll { .. } => "roll",
            Command::Search { .. } => "search",
            Command::Weather => "weather",
            Command::Help => "help",
            Command::Chat { .. } => "chat",
            Command::Ask { .. } => "ask",
        }
    }
}

/// Rich link card attached to a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub url: String,
    pub description: String,
    pub color: u32,
}

/// What the bot answers with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub embeds: Vec<Embed>,
    /// Further messages sent after the first, in order
    pub followups: Vec<String>,
    /// Only visible to the invoking user
    pub ephemeral: bool,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            embeds: Vec::new(),
            followups: Vec::new(),
            ephemeral: false,
        }
    }

    /// First chunk as the reply, the rest as followups
    pub fn chunked(chunks: Vec<String>) -> Self {
        let mut chunks = chunks.into_iter();
        let content = chunks.next().unwrap_or_default();
        Self {
            followups: chunks.collect(),
            ..Self::text(content)
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            ephemeral: true,
            ..Self::text(content)
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sections = Vec::new();
        if !self.content.is_empty() {
            sections.push(self.content.clone());
        }
        for embed in &self.embeds {
            let mut card = format!("# {}\n{}", embed.title, embed.url);
            if !embed.description.is_empty() {
                card.push('\n');
                card.push_str(&embed.description);
            }
            sections.push(card);
        }
        sections.extend(self.followups.iter().cloned());
        f.write_str(&sections.join("\n\n"))
    }
}

/// Command dispatcher holding the shared tables and API clients
#[derive(Debug, Clone)]
pub struct Bot {
    resources: Arc<Resources>,
    wiki: WikiClient,
    chat: ChatClient,
}

impl Bot {
    pub fn new(resources: Arc<Resources>, wiki: WikiClient, chat: ChatClient) -> Self {
        Self {
            resources,
            wiki,
            chat,
        }
    }

    /// Load resources and build clients from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let resources = Resources::load(&config.resources_dir, &config.songs)?;
        let wiki = WikiClient::new(&config.wiki)?;
        let chat = ChatClient::new(&config.chat)?;
        if !chat.is_configured() {
            warn!("No chat API key configured; /chat and /ask will fail");
        }
        Ok(Self::new(Arc::new(resources), wiki, chat))
    }

    pub fn resources(&self) -> &Arc<Resources> {
        &self.resources
    }

    /// Run one command for `user`
    pub async fn handle(&self, command: &Command, user: &str) -> Reply {
        info!("/{} invoked by {}", command.name(), user);

        match command {
            Command::Roll { dice } => {
                roll_reply(dice, user, &self.resources, &mut RngSource::thread())
            }
            Command::Search { query } => search_reply(&self.wiki, query).await,
            Command::Weather => weather_reply(&self.resources, &mut RngSource::thread()),
            Command::Help => help_reply(),
            Command::Chat { question } => self.chat_reply(question).await,
            Command::Ask { question } => ask_reply(&self.wiki, &self.chat, question).await,
        }
    }

    async fn chat_reply(&self, question: &str) -> Reply {
        match self.chat.ask(question).await {
            Ok(answer) => Reply::text(answer),
            Err(err) => {
                warn!("/chat failed: {}", err);
                Reply::text(CHAT_FAILED_MESSAGE)
            }
        }
    }
}

pub fn help_reply() -> Reply {
    Reply::text(HELP_LINES.join("\n"))
}

/// Random forecast for Stone-upon-hill
pub fn weather_reply(resources: &Resources, rng: &mut impl RandomSource) -> Reply {
    Reply::text(resources.forecasts.choose(rng))
}
