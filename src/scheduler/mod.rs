//! Per-chat periodic job scheduler
//!
//! Each `/start_check` spawns a tokio task that ticks on a fixed interval
//! (first tick after `first_delay`) and runs the poll job for its chat.
//! Handles are tracked per chat so jobs can be replaced or stopped.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use teloxide::types::ChatId;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Work executed on every tick
#[async_trait]
pub trait ChatJob: Send + Sync + 'static {
    async fn run(&self, chat_id: ChatId);
}

/// What a second `/start_check` for the same chat does
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobMode {
    /// Cancel the running job and start a fresh one
    #[default]
    Replace,
    /// Add another independent job next to the running ones
    Stack,
}

#[derive(Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    Replaced,
    Stacked { running: usize },
}

struct JobHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl JobHandle {
    fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Takes effect between runs; an in-flight cycle always completes.
    fn cancel(&self) {
        let _ = self.cancel.send(true);
    }
}

pub struct PollScheduler {
    job: Arc<dyn ChatJob>,
    interval: Duration,
    first_delay: Duration,
    mode: JobMode,
    jobs: RwLock<HashMap<ChatId, Vec<JobHandle>>>,
}

impl PollScheduler {
    pub fn new(
        job: Arc<dyn ChatJob>,
        interval: Duration,
        first_delay: Duration,
        mode: JobMode,
    ) -> Self {
        Self {
            job,
            interval,
            first_delay,
            mode,
            jobs: RwLock::new(HashMap::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start polling `chat_id`
    pub async fn start(&self, chat_id: ChatId) -> StartOutcome {
        let handle = self.spawn(chat_id);

        let mut jobs = self.jobs.write().await;
        let entry = jobs.entry(chat_id).or_default();
        entry.retain(JobHandle::is_running);

        let outcome = match self.mode {
            JobMode::Replace => {
                let replaced = !entry.is_empty();
                for old in entry.drain(..) {
                    old.cancel();
                }
                if replaced {
                    StartOutcome::Replaced
                } else {
                    StartOutcome::Started
                }
            }
            JobMode::Stack if entry.is_empty() => StartOutcome::Started,
            JobMode::Stack => StartOutcome::Stacked {
                running: entry.len() + 1,
            },
        };
        entry.push(handle);

        tracing::info!(
            "[Scheduler] Chat {}: {:?} (interval {}s)",
            chat_id,
            outcome,
            self.interval.as_secs()
        );
        outcome
    }

    /// Cancel every job of `chat_id`. Returns how many were running.
    pub async fn stop(&self, chat_id: ChatId) -> usize {
        let handles = self.jobs.write().await.remove(&chat_id).unwrap_or_default();

        let mut stopped = 0;
        for handle in handles {
            if handle.is_running() {
                stopped += 1;
            }
            handle.cancel();
        }

        if stopped > 0 {
            tracing::info!("[Scheduler] Chat {}: stopped {} jobs", chat_id, stopped);
        }
        stopped
    }

    pub async fn active_jobs(&self, chat_id: ChatId) -> usize {
        self.jobs
            .read()
            .await
            .get(&chat_id)
            .map(|handles| handles.iter().filter(|h| h.is_running()).count())
            .unwrap_or(0)
    }

    fn spawn(&self, chat_id: ChatId) -> JobHandle {
        let (cancel, mut cancelled) = watch::channel(false);
        let job = self.job.clone();
        let mut ticker = interval_at(Instant::now() + self.first_delay, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    // Sender dropped counts as cancellation too
                    _ = cancelled.changed() => break,
                    _ = ticker.tick() => job.run(chat_id).await,
                }
            }
            tracing::debug!("[Scheduler] Chat {}: job finished", chat_id);
        });

        JobHandle { cancel, task }
    }
}
