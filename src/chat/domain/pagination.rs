//! Page requests and computed pagination results for room history.
//!
//! A [`PaginationResult`] is never persisted or cached. It is recomputed from
//! the store on every request so that intervening writes are always visible.

use super::{ChatDomainError, Message};
use serde::Serialize;

/// Validated, 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validates raw caller input.
    ///
    /// Non-positive values are rejected. A `limit` above `max_limit` is
    /// clamped down to `max_limit`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::InvalidPageSize`] or
    /// [`ChatDomainError::InvalidPageNumber`] for non-positive input.
    ///
    /// # Examples
    ///
    /// ```
    /// use chatroom::chat::domain::PageRequest;
    ///
    /// let request = PageRequest::new(3, 500, 100).expect("valid request");
    /// assert_eq!(request.limit(), 100);
    /// assert_eq!(request.offset(), 200);
    /// ```
    pub fn new(page: i64, limit: i64, max_limit: u32) -> Result<Self, ChatDomainError> {
        if limit <= 0 {
            return Err(ChatDomainError::InvalidPageSize(limit));
        }
        if page <= 0 {
            return Err(ChatDomainError::InvalidPageNumber(page));
        }

        let ceiling = max_limit.max(1);
        let clamped_limit = u32::try_from(limit).map_or(ceiling, |value| value.min(ceiling));
        let page_number =
            u32::try_from(page).map_err(|_| ChatDomainError::InvalidPageNumber(page))?;

        Ok(Self {
            page: page_number,
            limit: clamped_limit,
        })
    }

    /// Returns the 1-indexed page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Returns the number of items preceding this page.
    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.page as u64)
            .saturating_sub(1)
            .saturating_mul(self.limit as u64)
    }
}

/// One bounded, ordered slice of a room's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationResult {
    messages: Vec<Message>,
    page: u32,
    limit: u32,
    total_pages: u64,
    total_items: u64,
}

impl PaginationResult {
    /// Builds a result for `request`, deriving the page count by ceiling
    /// division of `total_items` by the page size.
    #[must_use]
    pub const fn new(messages: Vec<Message>, request: PageRequest, total_items: u64) -> Self {
        Self {
            messages,
            page: request.page,
            limit: request.limit,
            total_pages: total_items.div_ceil(request.limit as u64),
            total_items,
        }
    }

    /// Returns the messages on this page, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the 1-indexed page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size used for this result.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the number of pages in the room's history.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Returns the number of messages in the room's history.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }
}
