use crate::state::messages::{AppEvent, PollSource};
use log::debug;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// Fires `PollTick(source)` every `period` until cancelled.
///
/// A tick only announces that the source is due; the app decides what to
/// fetch, so a slow fetch never delays the next tick.
pub struct PeriodicRefresher {
    source: PollSource,
    period: Duration,
    events: mpsc::Sender<AppEvent>,
    cancel: watch::Receiver<bool>,
}

impl PeriodicRefresher {
    pub fn new(
        source: PollSource,
        period: Duration,
        events: mpsc::Sender<AppEvent>,
        cancel: watch::Receiver<bool>,
    ) -> Self {
        Self { source, period, events, cancel }
    }

    pub async fn run(mut self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // `interval` completes its first tick at once; startup already fetched.
        ticker.tick().await;

        loop {
            tokio::select! {
                changed = self.cancel.changed() => {
                    if changed.is_err() || *self.cancel.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if self.events.send(AppEvent::PollTick(self.source)).await.is_err() {
                        break;
                    }
                }
            }
        }
        debug!("{:?} poller stopped", self.source);
    }
}

/// The set of pollers owned by one polling context (a league scoreboard or a
/// followed game). Stopping or dropping the handle cancels all of them.
pub struct PollHandle {
    cancel: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl PollHandle {
    pub fn spawn(
        schedule: impl IntoIterator<Item = (PollSource, Duration)>,
        events: mpsc::Sender<AppEvent>,
    ) -> Self {
        let (cancel, cancel_rx) = watch::channel(false);
        let tasks = schedule
            .into_iter()
            .map(|(source, period)| {
                let refresher = PeriodicRefresher::new(source, period, events.clone(), cancel_rx.clone());
                tokio::spawn(refresher.run())
            })
            .collect();
        Self { cancel, tasks }
    }

    /// Receiver tied to this context's lifetime, for other work that should
    /// stop with it.
    pub fn cancel_token(&self) -> watch::Receiver<bool> {
        self.cancel.subscribe()
    }

    pub fn stop(&self) {
        self.cancel.send_replace(true);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub async fn join(mut self) {
        self.stop();
        for task in std::mem::take(&mut self.tasks) {
            let _ = task.await;
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.send_replace(true);
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sources_tick_independently() {
        let (tx, mut rx) = mpsc::channel(64);
        let handle = PollHandle::spawn(
            [
                (PollSource::PlayByPlay, Duration::from_millis(10)),
                (PollSource::RedditThread, Duration::from_secs(3600)),
            ],
            tx,
        );
        assert_eq!(handle.len(), 2);

        for _ in 0..3 {
            let event = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
            assert_eq!(event, Some(AppEvent::PollTick(PollSource::PlayByPlay)));
        }
        handle.join().await;
    }

    #[tokio::test]
    async fn first_tick_is_skipped() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = PollHandle::spawn([(PollSource::Scores, Duration::from_millis(200))], tx);
        let early = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(early.is_err(), "poller fired before its first period elapsed");
        handle.join().await;
    }

    #[tokio::test]
    async fn stop_ends_every_poller() {
        let (tx, mut rx) = mpsc::channel(64);
        let handle = PollHandle::spawn(
            [
                (PollSource::Twitter, Duration::from_millis(10)),
                (PollSource::RedditComments, Duration::from_millis(10)),
            ],
            tx,
        );
        handle.join().await;
        // Drain anything queued before the stop; then the channel closes.
        let drained = tokio::time::timeout(Duration::from_secs(5), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(drained.is_ok());
    }

    #[tokio::test]
    async fn dropping_the_handle_cancels() {
        let (tx, mut rx) = mpsc::channel(64);
        let handle = PollHandle::spawn([(PollSource::Scores, Duration::from_millis(10))], tx);
        let token = handle.cancel_token();
        drop(handle);
        assert!(*token.borrow());
        let closed = tokio::time::timeout(Duration::from_secs(5), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(closed.is_ok());
    }
}
