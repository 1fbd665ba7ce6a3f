// Core data structures for the ticket watcher

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tracked event, one per team listed on the ticket page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKey {
    #[serde(rename = "aktobe")]
    Aktobe,
    #[serde(rename = "realMadrid")]
    RealMadrid,
}

impl EventKey {
    /// Get string representation (snapshot key)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aktobe => "aktobe",
            Self::RealMadrid => "realMadrid",
        }
    }

    /// Team name exactly as it appears in the page's name field
    pub fn page_name(&self) -> &'static str {
        match self {
            Self::Aktobe => "Aktobe",
            Self::RealMadrid => "Real Madrid",
        }
    }

    /// Human-readable name used in chat messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Aktobe => "Kairat vs Aktobe",
            Self::RealMadrid => "Kairat vs Real Madrid",
        }
    }

    /// Get all tracked events, in message order
    pub fn all() -> [Self; 2] {
        [Self::Aktobe, Self::RealMadrid]
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ticket availability for a single event at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityStatus {
    pub is_available: bool,
    /// Absolute purchase URL, empty when the button carries none
    pub link: String,
}

impl AvailabilityStatus {
    pub fn available(link: impl Into<String>) -> Self {
        Self {
            is_available: true,
            link: link.into(),
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// Availability of every tracked event from one successful fetch.
///
/// Both events are fields rather than map entries, so a snapshot missing
/// either one cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub aktobe: AvailabilityStatus,
    pub real_madrid: AvailabilityStatus,
}

impl Snapshot {
    pub fn new(aktobe: AvailabilityStatus, real_madrid: AvailabilityStatus) -> Self {
        Self {
            aktobe,
            real_madrid,
        }
    }

    /// Get status for one event
    pub fn get(&self, key: EventKey) -> &AvailabilityStatus {
        match key {
            EventKey::Aktobe => &self.aktobe,
            EventKey::RealMadrid => &self.real_madrid,
        }
    }

    /// Iterate over `(key, status)` pairs in message order
    pub fn iter(&self) -> impl Iterator<Item = (EventKey, &AvailabilityStatus)> {
        EventKey::all().into_iter().map(move |key| (key, self.get(key)))
    }

    /// Events that went from unavailable to available since `previous`
    pub fn newly_available(&self, previous: &Snapshot) -> Vec<EventKey> {
        EventKey::all()
            .into_iter()
            .filter(|&key| !previous.get(key).is_available && self.get(key).is_available)
            .collect()
    }
}
