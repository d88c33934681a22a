use crate::duration::format_hms;
use crate::ledger::elapsed_secs;
use chrono::{Local, NaiveDateTime};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

const IDLE: &str = "00:00:00";
const TICK: Duration = Duration::from_secs(1);

/// Wall-clock source. Elapsed time is always recomputed from it.
pub type TimeSource = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

pub fn local_time() -> TimeSource {
    Arc::new(|| Local::now().naive_local())
}

/// Publishes the running session's elapsed time once per second.
pub struct SessionClock {
    source: TimeSource,
    tx: Arc<watch::Sender<String>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionClock {
    pub fn new(source: TimeSource) -> Self {
        let (tx, _rx) = watch::channel(IDLE.to_string());
        Self {
            source,
            tx: Arc::new(tx),
            task: Mutex::new(None),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.source)()
    }

    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Cancels the previous tick task and starts one for `session`.
    /// Must be called from within a tokio runtime.
    pub fn restart(&self, session: Option<(&str, NaiveDateTime)>) {
        let mut task = match self.task.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = task.take() {
            handle.abort();
        }

        let Some((project_id, started_at)) = session else {
            self.tx.send_replace(IDLE.to_string());
            return;
        };

        debug!(project = project_id, %started_at, "session clock started");
        let source = Arc::clone(&self.source);
        let tx = Arc::clone(&self.tx);
        tx.send_replace(format_hms(elapsed_secs(started_at, source())));
        *task = Some(tokio::spawn(async move {
            let mut ticker = interval(TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                tx.send_replace(format_hms(elapsed_secs(started_at, source())));
            }
        }));
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        let task = match self.task.get_mut() {
            Ok(task) => task,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    impl SessionClock {
        fn subscribe(&self) -> watch::Receiver<String> {
            self.tx.subscribe()
        }

        fn is_running(&self) -> bool {
            self.task
                .lock()
                .unwrap()
                .as_ref()
                .is_some_and(|h| !h.is_finished())
        }
    }

    fn fake_time(start: NaiveDateTime) -> (TimeSource, Arc<Mutex<NaiveDateTime>>) {
        let cell = Arc::new(Mutex::new(start));
        let reader = Arc::clone(&cell);
        let source: TimeSource = Arc::new(move || *reader.lock().unwrap());
        (source, cell)
    }

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_recompute_from_the_start_timestamp() {
        let (source, cell) = fake_time(start());
        let clock = SessionClock::new(source);
        clock.restart(Some(("p1", start())));
        assert_eq!(clock.current(), "00:00:00");

        *cell.lock().unwrap() = start() + chrono::Duration::seconds(5);
        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert_eq!(clock.current(), "00:00:05");

        // A jump in wall-clock time shows up on the next tick.
        *cell.lock().unwrap() = start() + chrono::Duration::seconds(3_725);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(clock.current(), "01:02:05");
    }

    #[tokio::test(start_paused = true)]
    async fn stopping_resets_and_cancels_the_task() {
        let (source, cell) = fake_time(start());
        let clock = SessionClock::new(source);
        clock.restart(Some(("p1", start())));
        assert!(clock.is_running());

        clock.restart(None);
        assert!(!clock.is_running());
        assert_eq!(clock.current(), "00:00:00");

        *cell.lock().unwrap() = start() + chrono::Duration::seconds(30);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(clock.current(), "00:00:00");
    }

    #[tokio::test(start_paused = true)]
    async fn switching_sessions_replaces_the_ticker() {
        let (source, cell) = fake_time(start() + chrono::Duration::seconds(10));
        let clock = SessionClock::new(source);
        let mut rx = clock.subscribe();
        clock.restart(Some(("p1", start())));
        clock.restart(Some(("p2", start() + chrono::Duration::seconds(8))));
        assert_eq!(*rx.borrow_and_update(), "00:00:02");

        *cell.lock().unwrap() = start() + chrono::Duration::seconds(20);
        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert_eq!(clock.current(), "00:00:12");
    }
}
