use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::Notifier;
use crate::scrape::types::Notice;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Telegram Bot API transport (`sendMessage`, HTML parse mode).
#[derive(Clone)]
pub struct TelegramNotifier {
    token: String,
    chat_id: i64,
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: i64) -> Self {
        Self {
            token,
            chat_id,
            client: Client::new(),
            timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", TELEGRAM_API_BASE, self.token)
    }
}

/// Render the outbound message. Each field is escaped for HTML parse mode
/// before assembly so the markup tags stay intact.
pub fn build_message(notice: &Notice) -> String {
    let mut msg = format!(
        "📢 <b>Exam Notice</b>\n\n{}",
        html_escape::encode_text(&notice.title)
    );
    match (&notice.attachment_link, &notice.external_link) {
        (Some(att), Some(ext)) => {
            msg.push_str(&format!(
                "\n📎 Attachment: {}",
                html_escape::encode_text(att)
            ));
            msg.push_str(&format!("\n🔗 Link: {}", html_escape::encode_text(ext)));
        }
        (Some(only), None) | (None, Some(only)) => {
            msg.push_str(&format!("\n🔗 URL: {}", html_escape::encode_text(only)));
        }
        (None, None) => {}
    }
    msg
}

#[derive(Serialize)]
struct SendMessageReq<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, notice: &Notice) -> Result<()> {
        let text = build_message(notice);
        let payload = SendMessageReq {
            chat_id: self.chat_id,
            text: &text,
            parse_mode: "HTML",
        };

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(self.endpoint())
                .timeout(self.timeout)
                .json(&payload)
                .send()
                .await;

            match res {
                Ok(rsp) => {
                    if let Err(e) = rsp.error_for_status_ref() {
                        if attempt < self.max_retries {
                            tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1)))
                                .await;
                            continue;
                        }
                        return Err(anyhow!("Telegram sendMessage HTTP error: {e}"));
                    }
                    return Ok(());
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
                        continue;
                    }
                    return Err(anyhow!("Telegram sendMessage request failed: {e}"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(title: &str, att: Option<&str>, ext: Option<&str>) -> Notice {
        Notice {
            title: title.to_string(),
            attachment_link: att.map(str::to_string),
            external_link: ext.map(str::to_string),
        }
    }

    #[test]
    fn title_only_message_has_no_url_line() {
        let msg = build_message(&notice("Backlog Examination Notice", None, None));
        assert!(msg.ends_with("Backlog Examination Notice"));
        assert!(!msg.contains("URL:"));
    }

    #[test]
    fn single_link_renders_one_url_line() {
        let msg = build_message(&notice("T", None, Some("https://x/a?b=1&c=2")));
        assert!(msg.contains("🔗 URL: https://x/a?b=1&amp;c=2"));
        assert!(!msg.contains("Attachment:"));
    }

    #[test]
    fn both_links_render_two_labeled_lines() {
        let msg = build_message(&notice("T", Some("https://x/n.pdf"), Some("https://y")));
        assert!(msg.contains("📎 Attachment: https://x/n.pdf"));
        assert!(msg.contains("🔗 Link: https://y"));
    }

    #[test]
    fn title_markup_is_escaped() {
        let msg = build_message(&notice("B.Tech <III> & IV Examination", None, None));
        assert!(msg.contains("B.Tech &lt;III&gt; &amp; IV Examination"));
    }
}
