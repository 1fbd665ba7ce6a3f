//! Common test utilities

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use ticketwatch::crawler::SnapshotSource;
use ticketwatch::error::{FetchError, Result};
use ticketwatch::notifications::{Channel, DeliveryError, DeliveryResult, Notifier};
use ticketwatch::scheduler::Monitor;
use ticketwatch::utils::retry::RetryConfig;
use ticketwatch::{AvailabilityStatus, Snapshot};

pub const SOURCE_URL: &str = "https://tickets.example.kz/matches/";
pub const OPERATOR_CHAT: i64 = 4242;

/// Ticket page with both matches listed
///
/// Every card names the home side first, then the opponent, the way the
/// real listing does. A third fixture without a buy button sits in front.
pub fn ticket_page(aktobe_button: &str, real_madrid_button: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head><meta charset="UTF-8"><title>Билеты</title></head>
<body>
  <section class="matches">
    <div class="match-card">
      <div class="teams">
        <span class="team-name">Kairat</span>
        <span class="vs">vs</span>
        <span class="team-name">Tobol</span>
      </div>
      <div class="date">18.10.2025 18:00</div>
    </div>
    <div class="match-card">
      <div class="teams">
        <span class="team-name">Kairat</span>
        <span class="vs">vs</span>
        <span class="team-name">
          Aktobe
        </span>
      </div>
      {aktobe_button}
    </div>
    <div class="match-card">
      <div class="teams">
        <span class="team-name">Kairat</span>
        <span class="vs">vs</span>
        <span class="team-name">Real Madrid</span>
      </div>
      {real_madrid_button}
    </div>
  </section>
</body>
</html>"#
    )
}

pub const DISABLED_BUTTON: &str = r#"<a class="btn ticket-btn disabled" href="javascript:void(0)">Скоро</a>"#;

pub fn enabled_button(href: &str) -> String {
    format!(r#"<a class="btn ticket-btn" href="{href}">Купить билет</a>"#)
}

pub fn snapshot(aktobe: Option<&str>, real_madrid: Option<&str>) -> Snapshot {
    let status = |link: Option<&str>| match link {
        Some(link) => AvailabilityStatus::available(link),
        None => AvailabilityStatus::unavailable(),
    };
    Snapshot::new(status(aktobe), status(real_madrid))
}

/// Snapshot source that replays a script and counts calls
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Snapshot>>>,
    calls: AtomicUsize,
    /// When set, every fetch waits for a permit from this gate
    gate: Option<Arc<Notify>>,
    /// Notified each time a fetch starts
    started: Arc<Notify>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<Snapshot>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    pub fn gated(responses: Vec<Result<Snapshot>>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(responses)
        }
    }

    pub fn started(&self) -> Arc<Notify> {
        Arc::clone(&self.started)
    }

    pub fn push(&self, response: Result<Snapshot>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    async fn fetch(&self) -> Result<Snapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(FetchError::Timeout.into()))
    }

    fn source_url(&self) -> &str {
        SOURCE_URL
    }
}

/// Channel that records every message
#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<(i64, String)>>,
    fail: bool,
}

impl RecordingChannel {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn recipients(&self) -> Vec<i64> {
        self.sent.lock().unwrap().iter().map(|(chat, _)| *chat).collect()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> DeliveryResult<()> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        if self.fail {
            return Err(DeliveryError::Api {
                status: 502,
                description: "Bad Gateway".to_string(),
            });
        }
        Ok(())
    }
}

/// Monitor wired to a scripted source and a recording channel, no retry delay
pub fn monitor_with(
    source: Arc<ScriptedSource>,
    channel: Arc<RecordingChannel>,
) -> Arc<Monitor> {
    Arc::new(Monitor::new(
        source,
        Notifier::new(channel, OPERATOR_CHAT),
        RetryConfig::immediate(1),
    ))
}
