//! Read-only views over an analysis result: search, pagination and activity windows.

use crate::models::{ActivityBucket, AggregatedChat, Granularity, MessageActivity};
use crate::validation::InputValidator;

/// Default number of chats per page
pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Default number of daily buckets in a window
pub const DEFAULT_DAILY_WINDOW: usize = 30;
/// Default number of weekly buckets in a window
pub const DEFAULT_WEEKLY_WINDOW: usize = 26;

/// Case-insensitive substring search over chat name, full name and id
#[derive(Debug, Clone, Default)]
pub struct ChatQuery {
    needle: String,
}

impl ChatQuery {
    /// Build a query; blank queries match everything
    #[must_use]
    pub fn new(query: &str) -> Self {
        Self {
            needle: InputValidator::sanitize_query(query).to_lowercase(),
        }
    }

    /// Whether this query matches every chat
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.needle.is_empty()
    }

    /// Whether a chat matches the query
    #[must_use]
    pub fn matches(&self, chat: &AggregatedChat) -> bool {
        self.is_blank()
            || [&chat.name, &chat.full_name, &chat.id]
                .iter()
                .any(|field| field.to_lowercase().contains(&self.needle))
    }

    /// Matching chats, in ranking order
    #[must_use]
    pub fn filter<'a>(&self, chats: &'a [AggregatedChat]) -> Vec<&'a AggregatedChat> {
        chats.iter().filter(|chat| self.matches(chat)).collect()
    }

    /// Matching chats paired with their 1-based rank in the unfiltered list
    #[must_use]
    pub fn filter_ranked<'a>(&self, chats: &'a [AggregatedChat]) -> Vec<(usize, &'a AggregatedChat)> {
        chats
            .iter()
            .enumerate()
            .filter(|(_, chat)| self.matches(chat))
            .map(|(i, chat)| (i + 1, chat))
            .collect()
    }
}

/// One page of a 1-based pagination over `total_items`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Current page, clamped into `1..=total_pages`
    pub number: usize,
    /// Total pages, never less than 1
    pub total_pages: usize,
    /// Index of the first item on this page
    pub start: usize,
    /// One past the last item on this page
    pub end: usize,
}

impl Page {
    /// Compute the page for `requested`, clamping out-of-range requests.
    ///
    /// A zero `per_page` is treated as one item per page.
    #[must_use]
    pub fn of(total_items: usize, per_page: usize, requested: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total_items.div_ceil(per_page).max(1);
        let number = requested.clamp(1, total_pages);
        let start = ((number - 1) * per_page).min(total_items);
        let end = (start + per_page).min(total_items);
        Self {
            number,
            total_pages,
            start,
            end,
        }
    }

    /// The items of `items` on this page
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.end.min(items.len());
        let start = self.start.min(end);
        &items[start..end]
    }

    /// Whether a later page exists
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Whether an earlier page exists
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// The most recent buckets of one granularity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityWindow<'a> {
    /// Granularity the buckets belong to
    pub granularity: Granularity,
    /// Buckets in ascending date order
    pub buckets: &'a [ActivityBucket],
    /// Messages across `buckets`
    pub total_messages: usize,
}

/// Default window length: 30 days, 26 weeks, or every month
#[must_use]
pub const fn default_window(granularity: Granularity) -> Option<usize> {
    match granularity {
        Granularity::Daily => Some(DEFAULT_DAILY_WINDOW),
        Granularity::Weekly => Some(DEFAULT_WEEKLY_WINDOW),
        Granularity::Monthly => None,
    }
}

impl MessageActivity {
    /// The last `limit` buckets of a granularity, or all of them when `limit` is `None`
    #[must_use]
    pub fn window(&self, granularity: Granularity, limit: Option<usize>) -> ActivityWindow<'_> {
        let all = self.buckets(granularity);
        let skip = limit.map_or(0, |limit| all.len().saturating_sub(limit));
        let buckets = &all[skip..];
        ActivityWindow {
            granularity,
            buckets,
            total_messages: buckets.iter().map(|b| b.message_count).sum(),
        }
    }
}
