// src/config.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use url::Url;

pub const DEFAULT_NOTICE_URL: &str = "https://hub.rgukt.ac.in/hub/notice/index";

/// Runtime configuration, environment-supplied (`.env` honored in dev).
/// `BOT_TOKEN` and `GROUP_CHAT_ID` are required; everything else has a
/// deploy-ready default.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub group_chat_id: i64,
    pub notice_url: Url,
    pub topic_keyword: String,
    pub poll_interval_secs: u64,
    pub notice_limit: usize,
    pub storage_file: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bot_token = std::env::var("BOT_TOKEN").context("BOT_TOKEN is required")?;
        let group_chat_id = std::env::var("GROUP_CHAT_ID")
            .context("GROUP_CHAT_ID is required")?
            .trim()
            .parse()
            .context("GROUP_CHAT_ID must be a numeric chat id")?;
        let notice_url = Url::parse(&env_or("NOTICE_URL", DEFAULT_NOTICE_URL))
            .context("NOTICE_URL must be a valid URL")?;

        Ok(Self {
            bot_token,
            group_chat_id,
            notice_url,
            topic_keyword: env_or("TOPIC_KEYWORD", "examination"),
            poll_interval_secs: parsed_env_or("POLL_INTERVAL_SECS", 300),
            notice_limit: parsed_env_or("NOTICE_LIMIT", 10),
            storage_file: PathBuf::from(env_or("STORAGE_FILE", "sent_notices.json")),
            port: parsed_env_or("PORT", 10000),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
