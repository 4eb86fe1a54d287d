// src/watch.rs — the poll/compare/broadcast/persist loop.

use std::time::Duration;

use anyhow::Result;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use tokio::time;

use crate::config::Config;
use crate::notify::{Notifier, TelegramNotifier};
use crate::scrape::providers::NoticeBoardSource;
use crate::scrape::types::NoticeSource;
use crate::seen::SeenStore;

/// Gap between consecutive sends within one cycle. Keeps the transport happy
/// when a fresh deployment flushes the whole backlog at once.
const DEFAULT_SEND_PACING: Duration = Duration::from_secs(1);

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("watch_cycles_total", "Total poll cycles run.");
        describe_counter!(
            "watch_fetch_errors_total",
            "Cycles where the board could not be fetched."
        );
        describe_counter!("watch_broadcast_total", "Notices broadcast successfully.");
        describe_counter!(
            "watch_send_failures_total",
            "Broadcast attempts that failed (retried next cycle)."
        );
        describe_gauge!("watch_last_cycle_ts", "Unix ts when a cycle last ran.");
        describe_gauge!("watch_seen_identities", "Identities in the seen set.");
    });
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub fetched: usize,
    pub broadcast: usize,
    pub failed: usize,
}

/// Owns the seen-set and the two collaborators. Exactly one task touches it,
/// so there is no locking anywhere.
pub struct Watcher {
    source: Box<dyn NoticeSource>,
    notifier: Box<dyn Notifier>,
    seen: SeenStore,
    pacing: Duration,
}

impl Watcher {
    pub fn new(source: Box<dyn NoticeSource>, notifier: Box<dyn Notifier>, seen: SeenStore) -> Self {
        Self {
            source,
            notifier,
            seen,
            pacing: DEFAULT_SEND_PACING,
        }
    }

    /// Builder for tests/tools that want no pacing delay.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn seen(&self) -> &SeenStore {
        &self.seen
    }

    /// One fetch-extract-compare-broadcast-persist pass.
    ///
    /// A fetch failure is not an error here: the cycle is treated as "no new
    /// notices". A notice is marked seen only after its send succeeded, so a
    /// failed broadcast is re-attempted on the next cycle.
    pub async fn run_cycle(&mut self) -> Result<CycleStats> {
        ensure_metrics_described();
        counter!("watch_cycles_total").increment(1);
        gauge!("watch_last_cycle_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

        let notices = match self.source.fetch_latest().await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = ?e, source = self.source.name(), "notice fetch failed");
                counter!("watch_fetch_errors_total").increment(1);
                return Ok(CycleStats::default());
            }
        };

        let mut stats = CycleStats {
            fetched: notices.len(),
            ..Default::default()
        };
        if notices.is_empty() {
            tracing::debug!(source = self.source.name(), "no notices on the board");
            return Ok(stats);
        }

        // Reverse the newest-first listing so a batch of unseen notices goes
        // out in chronological order.
        for notice in notices.iter().rev() {
            let id = notice.identity();
            if self.seen.contains(&id) {
                continue;
            }
            match self.notifier.send(notice).await {
                Ok(()) => {
                    self.seen.insert(id);
                    stats.broadcast += 1;
                    counter!("watch_broadcast_total").increment(1);
                    time::sleep(self.pacing).await;
                }
                Err(e) => {
                    stats.failed += 1;
                    counter!("watch_send_failures_total").increment(1);
                    tracing::warn!(error = ?e, title = %notice.title, "broadcast failed");
                }
            }
        }

        if stats.broadcast > 0 {
            self.seen.save().await?;
        }
        gauge!("watch_seen_identities").set(self.seen.len() as f64);
        Ok(stats)
    }

    /// Poll forever. The first tick fires immediately, which flushes the
    /// backlog on a fresh deployment; cycle-level errors are logged and the
    /// loop moves on to the next tick.
    pub async fn run(mut self, interval: Duration) -> Result<()> {
        let mut ticker = time::interval(interval);
        loop {
            ticker.tick().await;
            match self.run_cycle().await {
                Ok(stats) if stats.broadcast > 0 || stats.failed > 0 => {
                    tracing::info!(
                        fetched = stats.fetched,
                        broadcast = stats.broadcast,
                        failed = stats.failed,
                        "watch cycle done"
                    );
                }
                Ok(stats) => {
                    tracing::debug!(fetched = stats.fetched, "watch cycle: nothing new");
                }
                Err(e) => {
                    tracing::warn!("watch cycle failed: {e:#}");
                }
            }
        }
    }
}

/// Wire the production collaborators from config and run the loop.
pub async fn run_from_config(cfg: Config) -> Result<()> {
    let source = NoticeBoardSource::new(
        cfg.notice_url.clone(),
        cfg.topic_keyword.clone(),
        cfg.notice_limit,
    );
    let notifier = TelegramNotifier::new(cfg.bot_token.clone(), cfg.group_chat_id);
    let seen = SeenStore::load(cfg.storage_file.clone());
    tracing::info!(
        board = %cfg.notice_url,
        interval_secs = cfg.poll_interval_secs,
        known = seen.len(),
        "watch loop starting"
    );

    Watcher::new(Box::new(source), Box::new(notifier), seen)
        .run(Duration::from_secs(cfg.poll_interval_secs))
        .await
}
