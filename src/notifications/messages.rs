//! Message templates
//!
//! Every message is Telegram HTML. Anything that did not originate in this
//! file (links, error text, URLs) goes through `html_escape` first.

use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::error::ErrorCategory;
use crate::models::{AvailabilityStatus, EventKey, Snapshot};
use crate::utils::{format_interval, format_local};

/// Commands understood by the bot, shown in help and startup messages
pub const USAGE_HINT: &str = "/status - current ticket availability\n/help - list commands";

/// Schedule figures quoted in the startup message
#[derive(Debug, Clone, Copy)]
pub struct ScheduleSummary {
    pub check_interval_secs: u64,
    pub heartbeat_interval_secs: u64,
}

fn link_html(link: &str, label: &str) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        encode_double_quoted_attribute(link),
        encode_text(label)
    )
}

/// Tickets for `key` just went on sale
pub fn status_change(key: EventKey, status: &AvailabilityStatus, at: DateTime<Utc>) -> String {
    let link = if status.link.is_empty() {
        "No purchase link on the page, open the ticket page directly.".to_string()
    } else {
        format!("{}\n{}", link_html(&status.link, "Buy tickets"), encode_text(&status.link))
    };

    format!(
        "🎟 <b>Tickets are on sale!</b>\n\n<b>{}</b>\n{link}\n\n🕒 {}",
        encode_text(key.display_name()),
        format_local(at)
    )
}

/// Periodic "still alive" ping
pub fn heartbeat(at: DateTime<Utc>) -> String {
    format!("✅ Ticket watcher is running\n🕒 {}", format_local(at))
}

/// A check cycle failed after its retry
pub fn check_error(error: &str, category: ErrorCategory, at: DateTime<Utc>) -> String {
    format!(
        "⚠️ <b>Ticket check failed</b> ({category})\n\n{}\n\n🕒 {}",
        encode_text(error),
        format_local(at)
    )
}

/// Reply to `/status`
pub fn manual_status(snapshot: &Snapshot, source_url: &str, at: DateTime<Utc>) -> String {
    let lines: Vec<String> = snapshot
        .iter()
        .map(|(key, status)| {
            let state = if !status.is_available {
                "❌ disabled".to_string()
            } else if status.link.is_empty() {
                "✅ on sale".to_string()
            } else {
                format!("✅ on sale, {}", link_html(&status.link, "buy"))
            };
            format!("<b>{}</b>: {state}", encode_text(key.display_name()))
        })
        .collect();

    format!(
        "📊 <b>Ticket status</b>\n\n{}\n\n🕒 {}\n🔗 {}",
        lines.join("\n"),
        format_local(at),
        encode_text(source_url)
    )
}

/// Reply to `/status` when the page could not be read
pub fn manual_status_failed(error: &str, at: DateTime<Utc>) -> String {
    format!(
        "⚠️ <b>Could not fetch ticket status</b>\n\n{}\n\n🕒 {}",
        encode_text(error),
        format_local(at)
    )
}

/// Sent once the service is up
pub fn startup(schedule: ScheduleSummary, at: DateTime<Utc>) -> String {
    format!(
        "🚀 <b>Ticket watcher started</b>\n🕒 {}\n\n⏱ Checking every {}\n💓 Heartbeat every {}\n\n{}",
        format_local(at),
        format_interval(schedule.check_interval_secs),
        format_interval(schedule.heartbeat_interval_secs),
        USAGE_HINT
    )
}

/// Reply to `/help`
pub fn help() -> String {
    let events: Vec<&str> = EventKey::all().iter().map(|k| k.display_name()).collect();
    format!(
        "🤖 <b>Ticket watcher</b>\n\nWatching: {}\nYou get a message as soon as tickets go on sale.\n\n{}",
        encode_text(&events.join(", ")),
        USAGE_HINT
    )
}
