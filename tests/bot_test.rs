//! Inbound command handling tests

mod common;

use async_trait::async_trait;
use common::{monitor_with, snapshot, RecordingChannel, ScriptedSource, OPERATOR_CHAT, SOURCE_URL};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

use ticketwatch::bot::{Action, UpdatePoller, UpdateSource};
use ticketwatch::notifications::channels::telegram::Update;
use ticketwatch::notifications::{DeliveryResult, Notifier};

fn update(update_id: i64, chat_id: i64, text: &str) -> Update {
    serde_json::from_value(serde_json::json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id * 10,
            "chat": { "id": chat_id, "type": "private" },
            "date": 1_759_212_300,
            "text": text
        }
    }))
    .unwrap()
}

struct Fixture {
    source: Arc<ScriptedSource>,
    channel: Arc<RecordingChannel>,
    poller: UpdatePoller,
}

fn fixture(updates: Arc<dyn UpdateSource>) -> Fixture {
    let source = Arc::new(ScriptedSource::new(vec![Ok(snapshot(
        Some("https://x/a"),
        None,
    ))]));
    let channel = Arc::new(RecordingChannel::default());
    let monitor = monitor_with(source.clone(), channel.clone());
    let notifier = Notifier::new(channel.clone(), OPERATOR_CHAT);
    let poller = UpdatePoller::new(updates, monitor, notifier, 1);

    Fixture {
        source,
        channel,
        poller,
    }
}

/// Hands out one scripted batch per poll, then nothing
#[derive(Default)]
struct ScriptedUpdates {
    batches: Mutex<Vec<Vec<Update>>>,
    offsets: Mutex<Vec<Option<i64>>>,
}

#[async_trait]
impl UpdateSource for ScriptedUpdates {
    async fn poll(&self, offset: Option<i64>, _timeout_secs: u64) -> DeliveryResult<Vec<Update>> {
        self.offsets.lock().unwrap().push(offset);
        let next = {
            let mut batches = self.batches.lock().unwrap();
            if batches.is_empty() {
                None
            } else {
                Some(batches.remove(0))
            }
        };
        match next {
            Some(batch) => Ok(batch),
            None => {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(Vec::new())
            }
        }
    }
}

#[tokio::test]
async fn test_stranger_gets_no_reply_and_no_fetch() {
    let fx = fixture(Arc::new(ScriptedUpdates::default()));

    let action = fx.poller.handle_update(&update(1, 777, "/status")).await;

    assert_eq!(action, Action::Ignore);
    assert!(fx.channel.messages().is_empty());
    assert_eq!(fx.source.calls(), 0);
}

#[tokio::test]
async fn test_status_command_reports_current_availability() {
    let fx = fixture(Arc::new(ScriptedUpdates::default()));

    let action = fx
        .poller
        .handle_update(&update(1, OPERATOR_CHAT, "/status"))
        .await;

    assert_eq!(action, Action::Status);
    let messages = fx.channel.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Kairat vs Aktobe</b>: ✅ on sale"));
    assert!(messages[0].contains("Kairat vs Real Madrid</b>: ❌ disabled"));
    assert!(messages[0].contains(SOURCE_URL));
    assert_eq!(fx.channel.recipients(), vec![OPERATOR_CHAT]);
}

#[tokio::test]
async fn test_status_command_reports_fetch_failure() {
    let source = Arc::new(ScriptedSource::new(vec![]));
    let channel = Arc::new(RecordingChannel::default());
    let monitor = monitor_with(source.clone(), channel.clone());
    let poller = UpdatePoller::new(
        Arc::new(ScriptedUpdates::default()),
        monitor,
        Notifier::new(channel.clone(), OPERATOR_CHAT),
        1,
    );

    poller
        .handle_update(&update(1, OPERATOR_CHAT, "/status"))
        .await;

    let messages = channel.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Could not fetch ticket status"));
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_help_command_lists_commands() {
    let fx = fixture(Arc::new(ScriptedUpdates::default()));

    let action = fx
        .poller
        .handle_update(&update(1, OPERATOR_CHAT, "/help@kairat_tickets_bot"))
        .await;

    assert_eq!(action, Action::Help);
    let messages = fx.channel.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("/status"));
    assert_eq!(fx.source.calls(), 0);
}

#[tokio::test]
async fn test_non_text_message_is_ignored() {
    let fx = fixture(Arc::new(ScriptedUpdates::default()));
    let sticker: Update = serde_json::from_value(serde_json::json!({
        "update_id": 5,
        "message": { "message_id": 50, "chat": { "id": OPERATOR_CHAT } }
    }))
    .unwrap();

    assert_eq!(fx.poller.handle_update(&sticker).await, Action::Ignore);
    assert!(fx.channel.messages().is_empty());
}

#[tokio::test]
async fn test_poller_advances_offset_and_stops_on_shutdown() {
    let updates = Arc::new(ScriptedUpdates {
        batches: Mutex::new(vec![vec![
            update(10, OPERATOR_CHAT, "/help"),
            update(11, 777, "/status"),
        ]]),
        ..Default::default()
    });
    let fx = fixture(updates.clone());
    let channel = fx.channel.clone();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(fx.poller.run(shutdown_rx));

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("poller should stop")
        .unwrap();

    let offsets = updates.offsets.lock().unwrap().clone();
    assert_eq!(offsets[0], None);
    assert!(offsets[1..].iter().all(|offset| *offset == Some(12)));
    assert_eq!(channel.messages().len(), 1);
}
