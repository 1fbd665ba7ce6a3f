//! Ticket availability extraction
//!
//! Turns the ticket listing page into a [`Snapshot`]. Extraction is
//! all-or-nothing: a page without match blocks, or without one of the
//! tracked teams, is an error rather than an "unavailable" result, since
//! a layout change would otherwise look exactly like a sold-out match.

use scraper::ElementRef;
use url::Url;

use crate::models::{AvailabilityStatus, EventKey, Snapshot};
use crate::parser::query::{self, Document};
use crate::parser::selectors::TicketPageSelectors;
use crate::utils::error::ExtractionError;

/// Ticket page parser
pub struct TicketPageParser {
    selectors: TicketPageSelectors,
}

impl TicketPageParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            selectors: TicketPageSelectors::new(),
        }
    }

    /// Parse the page into a snapshot
    ///
    /// Relative purchase links are resolved against `page_url`.
    ///
    /// # Errors
    /// Returns `ExtractionError::NoMatchBlocks` if the page lists no matches
    /// Returns `ExtractionError::EntityNotFound` naming the first missing team
    pub fn parse(&self, html: &str, page_url: &Url) -> Result<Snapshot, ExtractionError> {
        let document = Document::parse(html);
        let blocks = document.find_all(self.selectors.match_block);

        if blocks.is_empty() {
            return Err(ExtractionError::NoMatchBlocks);
        }

        tracing::debug!(blocks = blocks.len(), "Found match blocks");

        let aktobe = self.extract_status(&blocks, EventKey::Aktobe, page_url)?;
        let real_madrid = self.extract_status(&blocks, EventKey::RealMadrid, page_url)?;

        Ok(Snapshot::new(aktobe, real_madrid))
    }

    /// Find the block listing `key` and read its buy button
    fn extract_status(
        &self,
        blocks: &[ElementRef<'_>],
        key: EventKey,
        page_url: &Url,
    ) -> Result<AvailabilityStatus, ExtractionError> {
        let block = blocks
            .iter()
            .copied()
            .find(|&block| self.block_lists_team(block, key.page_name()))
            .ok_or_else(|| ExtractionError::EntityNotFound {
                name: key.page_name().to_string(),
            })?;

        let Some(button) = query::find(block, self.selectors.ticket_button) else {
            tracing::debug!(entity = %key, "No ticket button in match block");
            return Ok(AvailabilityStatus::unavailable());
        };

        if query::has_class(button, self.selectors.disabled_class) {
            return Ok(AvailabilityStatus::unavailable());
        }

        let link = query::attr(button, "href")
            .map(|href| resolve_link(page_url, href))
            .unwrap_or_default();

        Ok(AvailabilityStatus::available(link))
    }

    /// Whether any name field in `block` is exactly `name`
    fn block_lists_team(&self, block: ElementRef<'_>, name: &str) -> bool {
        query::find_all_in(block, self.selectors.team_name)
            .into_iter()
            .any(|node| query::text(node) == name)
    }
}

impl Default for TicketPageParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve `href` against the page URL, keeping it verbatim if it cannot be joined
pub fn resolve_link(page_url: &Url, href: &str) -> String {
    page_url
        .join(href)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}
