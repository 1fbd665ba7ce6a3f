//! CSS selectors for the ticket listing page
//!
//! The page lists one "match card" per fixture. Each card carries the
//! opponent's name and a buy button that gets a `disabled` class while
//! sales are closed.

use lazy_static::lazy_static;
use scraper::Selector;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

/// Class that marks a buy button as inactive
pub const DISABLED_CLASS: &str = "disabled";

lazy_static! {
    static ref MATCH_BLOCK: Selector = parse_selector!(".match-card");
    static ref TEAM_NAME: Selector = parse_selector!(".team-name");
    static ref TICKET_BUTTON: Selector = parse_selector!(".ticket-btn");
}

/// Selectors for the ticket listing page
#[derive(Debug, Clone, Copy)]
pub struct TicketPageSelectors {
    /// One block per listed match
    pub match_block: &'static Selector,
    /// Team/event name inside a block
    pub team_name: &'static Selector,
    /// Buy button inside a block
    pub ticket_button: &'static Selector,
    /// Class whose presence on the button means "not on sale"
    pub disabled_class: &'static str,
}

impl TicketPageSelectors {
    pub fn new() -> Self {
        Self {
            match_block: &MATCH_BLOCK,
            team_name: &TEAM_NAME,
            ticket_button: &TICKET_BUTTON,
            disabled_class: DISABLED_CLASS,
        }
    }
}

impl Default for TicketPageSelectors {
    fn default() -> Self {
        Self::new()
    }
}
