//! Interval-driven triggers
//!
//! Each trigger spawns its callback on every tick instead of awaiting it, so
//! a slow cycle never shifts the timer and overlapping cycles reach
//! [`crate::scheduler::Monitor::run_check`], whose guard drops them. On
//! shutdown the trigger stops ticking and waits for callbacks already in
//! flight.

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Periodic trigger definition
#[derive(Debug, Clone)]
pub struct PeriodicTrigger {
    name: &'static str,
    interval: Duration,
    fire_immediately: bool,
}

impl PeriodicTrigger {
    /// First tick after one full `interval`
    pub fn new(name: &'static str, interval: Duration) -> Self {
        Self {
            name,
            interval,
            fire_immediately: false,
        }
    }

    /// Also tick once right away
    pub fn fire_immediately(mut self, fire: bool) -> Self {
        self.fire_immediately = fire;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start ticking until `shutdown` flips to `true` or its sender is dropped
    pub fn spawn<F, Fut>(self, mut shutdown: watch::Receiver<bool>, task: F) -> JoinHandle<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move {
            let start = if self.fire_immediately {
                Instant::now()
            } else {
                Instant::now() + self.interval
            };
            let mut ticker = interval_at(start, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            let mut in_flight = JoinSet::new();

            tracing::info!(
                trigger = self.name,
                interval_secs = self.interval.as_secs(),
                "Trigger started"
            );

            loop {
                if *shutdown.borrow() {
                    break;
                }

                tokio::select! {
                    _ = ticker.tick() => {
                        tracing::debug!(trigger = self.name, "Trigger fired");
                        in_flight.spawn(task());
                    }
                    Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                        if let Err(e) = joined {
                            tracing::error!(trigger = self.name, error = %e, "Triggered task panicked");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }

            if !in_flight.is_empty() {
                tracing::info!(
                    trigger = self.name,
                    tasks = in_flight.len(),
                    "Waiting for in-flight tasks"
                );
            }
            while in_flight.join_next().await.is_some() {}

            tracing::info!(trigger = self.name, "Trigger stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fires_immediately_and_stops_on_shutdown() {
        let (tx, rx) = watch::channel(false);
        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);

        let handle = PeriodicTrigger::new("test", Duration::from_secs(3600))
            .fire_immediately(true)
            .spawn(rx, move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            });

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delayed_trigger_does_not_fire_at_start() {
        let (tx, rx) = watch::channel(false);
        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);

        let handle = PeriodicTrigger::new("heartbeat", Duration::from_secs(3600)).spawn(
            rx,
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            },
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(tx);
        handle.await.unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_waits_for_in_flight_task() {
        let (tx, rx) = watch::channel(false);
        let done = Arc::new(AtomicU32::new(0));
        let flag = Arc::clone(&done);

        let handle = PeriodicTrigger::new("slow", Duration::from_secs(3600))
            .fire_immediately(true)
            .spawn(rx, move || {
                let flag = Arc::clone(&flag);
                async move {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    flag.store(1, Ordering::SeqCst);
                }
            });

        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(done.load(Ordering::SeqCst), 1);
    }
}
