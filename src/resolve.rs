//! Field-fallback resolution for chats and message senders.
//!
//! Chat names and ids are resolved by walking an ordered list of extractor
//! functions; the first one that yields a value wins.

use crate::models::{AggregatedChat, ChatType, PersonalInformation, RawChat, RawId, RawMessage};

/// Label used for the owner's notes-to-self thread
pub const SAVED_MESSAGES_LABEL: &str = "Saved Messages";

/// Prefix the export puts in front of numeric user ids in `from_id`
pub const USER_ID_PREFIX: &str = "user";

type NameRule = fn(&RawChat) -> Option<String>;
type IdRule = fn(&RawChat) -> Option<&RawId>;

const NAME_RULES: &[NameRule] = &[explicit_name, title, saved_messages, personal_name];
const ID_RULES: &[IdRule] = &[primary_id, chat_id, peer_id];

/// Build the owner's sender id (`user<id>`) from the personal information block.
///
/// Returns `None` when there is no usable user id; sender filtering is then disabled.
#[must_use]
pub fn resolve_owner_id(info: Option<&PersonalInformation>) -> Option<String> {
    info?
        .user_id
        .as_ref()
        .filter(|id| !id.is_blank())
        .map(|id| format!("{USER_ID_PREFIX}{id}"))
}

/// Display label for a chat
#[must_use]
pub fn resolve_chat_name(chat: &RawChat) -> String {
    NAME_RULES
        .iter()
        .find_map(|rule| rule(chat))
        .unwrap_or_else(|| unknown_chat_label(chat))
}

/// Identifier for a chat, or `"unknown"` when no id field is present
#[must_use]
pub fn resolve_chat_id(chat: &RawChat) -> String {
    ID_RULES
        .iter()
        .find_map(|rule| rule(chat))
        .map_or_else(|| AggregatedChat::UNKNOWN_ID.to_string(), ToString::to_string)
}

/// Best guess at the counterpart's name: the first usable sender label that is not the owner.
///
/// Without an owner id any non-blank sender label qualifies. Falls back to `chat_name`.
#[must_use]
pub fn resolve_full_name(messages: &[RawMessage], owner_id: Option<&str>, chat_name: &str) -> String {
    messages
        .iter()
        .find_map(|message| counterpart_label(message, owner_id))
        .unwrap_or_else(|| chat_name.to_string())
}

fn counterpart_label(message: &RawMessage, owner_id: Option<&str>) -> Option<String> {
    let from = non_blank(message.from.as_deref())?;
    let Some(owner_id) = owner_id else {
        return Some(from);
    };
    let sender = message.from_id.as_ref().filter(|id| !id.is_blank())?;
    (sender.to_string() != owner_id).then_some(from)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn explicit_name(chat: &RawChat) -> Option<String> {
    non_blank(chat.name.as_deref())
}

fn title(chat: &RawChat) -> Option<String> {
    non_blank(chat.title.as_deref())
}

fn saved_messages(chat: &RawChat) -> Option<String> {
    (chat.kind == Some(ChatType::SavedMessages)).then(|| SAVED_MESSAGES_LABEL.to_string())
}

fn personal_name(chat: &RawChat) -> Option<String> {
    if chat.kind != Some(ChatType::PersonalChat) {
        return None;
    }
    let first = chat.first_name.as_deref().filter(|s| !s.is_empty());
    let last = chat.last_name.as_deref().filter(|s| !s.is_empty());
    let joined = match (first, last) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (Some(part), None) | (None, Some(part)) => part.to_string(),
        (None, None) => return None,
    };
    non_blank(Some(&joined))
}

fn unknown_chat_label(chat: &RawChat) -> String {
    match chat.id.as_ref().filter(|id| !id.is_blank()) {
        Some(id) => format!("Unknown Chat (ID: {id})"),
        None => "Unknown Chat (ID: N/A)".to_string(),
    }
}

fn primary_id(chat: &RawChat) -> Option<&RawId> {
    chat.id.as_ref()
}

fn chat_id(chat: &RawChat) -> Option<&RawId> {
    chat.chat_id.as_ref()
}

fn peer_id(chat: &RawChat) -> Option<&RawId> {
    chat.peer_id.as_ref()
}
