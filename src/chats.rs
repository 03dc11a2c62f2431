//! Per-conversation aggregation and ranking.

use std::collections::HashMap;
use tracing::debug;

use crate::models::{AggregatedChat, RawChat};
use crate::resolve::{resolve_chat_id, resolve_chat_name, resolve_full_name};

/// Folds raw chats into one row per resolved `(name, id)` key.
///
/// Rows keep first-seen order; a later chat with the same key only adds its
/// message count, it never replaces the name or full name already resolved.
#[derive(Debug, Default)]
pub struct ChatAggregator {
    owner_id: Option<String>,
    index: HashMap<(String, String), usize>,
    chats: Vec<AggregatedChat>,
    merged: usize,
}

impl ChatAggregator {
    /// Create an aggregator that resolves counterpart names relative to `owner_id`
    #[must_use]
    pub fn new(owner_id: Option<String>) -> Self {
        Self {
            owner_id,
            ..Self::default()
        }
    }

    /// Add one raw chat. Chats without messages are ignored and `false` is returned.
    pub fn add(&mut self, chat: &RawChat) -> bool {
        let messages = chat.messages();
        if messages.is_empty() {
            return false;
        }

        let name = resolve_chat_name(chat);
        let id = resolve_chat_id(chat);
        let key = (name, id);

        if let Some(&slot) = self.index.get(&key) {
            let existing = &mut self.chats[slot];
            existing.message_count += messages.len();
            self.merged += 1;
            debug!(
                name = %existing.name,
                id = %existing.id,
                total = existing.message_count,
                "Merged duplicate chat entry"
            );
            return true;
        }

        let (name, id) = key.clone();
        let full_name = resolve_full_name(messages, self.owner_id.as_deref(), &name);
        self.index.insert(key, self.chats.len());
        self.chats.push(AggregatedChat {
            name,
            id,
            full_name,
            message_count: messages.len(),
        });
        true
    }

    /// Number of raw chats folded into an existing row
    #[must_use]
    pub const fn merged(&self) -> usize {
        self.merged
    }

    /// Distinct chats collected so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.chats.len()
    }

    /// Whether no chat has been collected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    /// Finish aggregation and return the ranked rows
    #[must_use]
    pub fn into_ranked(self) -> Vec<AggregatedChat> {
        rank_chats(self.chats)
    }
}

/// Sort by message count, descending. Ties keep their incoming order.
#[must_use]
pub fn rank_chats(mut chats: Vec<AggregatedChat>) -> Vec<AggregatedChat> {
    chats.sort_by(|a, b| b.message_count.cmp(&a.message_count));
    chats
}
