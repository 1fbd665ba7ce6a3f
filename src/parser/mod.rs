//! HTML parsing and data extraction
//!
//! This module handles parsing the ticket listing page and extracting the
//! availability of each tracked event.

pub mod query;
pub mod selectors;
pub mod tickets;

// Re-export main parser and public types
pub use selectors::TicketPageSelectors;
pub use tickets::{resolve_link, TicketPageParser};
