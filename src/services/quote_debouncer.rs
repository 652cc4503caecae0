use dashmap::DashMap;
use log::debug;
use std::future::Future;
use std::time::Duration;
use teloxide::types::ChatId;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Runs at most one delayed quote task per chat. Scheduling a new task
/// aborts the pending one, whether it is still waiting or already fetching.
pub struct QuoteDebouncer {
    delay: Duration,
    tasks: DashMap<ChatId, JoinHandle<()>>,
}

impl QuoteDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            tasks: DashMap::new(),
        }
    }

    pub fn schedule<F>(&self, chat_id: ChatId, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            task.await;
        });

        if let Some(previous) = self.tasks.insert(chat_id, handle) {
            if !previous.is_finished() {
                debug!("Debounced pending quote task for chat {}", chat_id);
            }
            previous.abort();
        }
    }

    pub fn cancel(&self, chat_id: ChatId) {
        if let Some((_, handle)) = self.tasks.remove(&chat_id) {
            handle.abort();
        }
    }
}
