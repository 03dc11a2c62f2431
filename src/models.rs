//! Data models for export parsing and analysis results
//!
//! The `Raw*` types mirror the machine-readable JSON written by the Telegram
//! desktop client. They are deliberately forgiving: unknown fields are ignored and
//! fields holding an unexpected JSON type read as absent instead of failing the
//! whole document. The derived types (`AggregatedChat`, `ActivityBucket`,
//! `AnalysisResult`) serialize with camelCase keys for downstream consumers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyzerError;

/// Root of a Telegram "machine-readable JSON" export
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExport {
    /// Container for the chat list; required for a valid export
    #[serde(default, deserialize_with = "lenient_record")]
    pub chats: Option<RawChats>,
    /// Information about the account that produced the export
    #[serde(default, deserialize_with = "lenient_record")]
    pub personal_information: Option<PersonalInformation>,
}

/// The `chats` object of an export
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChats {
    /// Every exported conversation, in export order
    #[serde(default, deserialize_with = "lenient_records")]
    pub list: Option<Vec<RawChat>>,
}

/// Owner details from the `personal_information` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonalInformation {
    /// Owner's first name
    #[serde(default, deserialize_with = "lenient_text")]
    pub first_name: Option<String>,
    /// Owner's last name
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_name: Option<String>,
    /// Numeric account id of the owner
    #[serde(default, deserialize_with = "lenient_id")]
    pub user_id: Option<RawId>,
}

/// One conversation as it appears in the export
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChat {
    /// Display name chosen by the client
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Group or channel title
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    /// Conversation kind (`personal_chat`, `saved_messages`, ...)
    #[serde(default, rename = "type", deserialize_with = "lenient_chat_type")]
    pub kind: Option<ChatType>,
    /// Primary chat identifier
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<RawId>,
    /// Alternate identifier used by some exports
    #[serde(default, deserialize_with = "lenient_id")]
    pub chat_id: Option<RawId>,
    /// Alternate identifier used by some exports
    #[serde(default, deserialize_with = "lenient_id")]
    pub peer_id: Option<RawId>,
    /// Counterpart's first name for personal chats
    #[serde(default, deserialize_with = "lenient_text")]
    pub first_name: Option<String>,
    /// Counterpart's last name for personal chats
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_name: Option<String>,
    /// Messages in export order; absent or empty chats are ignored by analysis
    #[serde(default, deserialize_with = "lenient_records")]
    pub messages: Option<Vec<RawMessage>>,
}

impl RawChat {
    /// Messages of this chat, empty when the field is absent
    #[must_use]
    pub fn messages(&self) -> &[RawMessage] {
        self.messages.as_deref().unwrap_or_default()
    }
}

/// One message record. Only the fields analysis needs are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    /// Timestamp string, usually `YYYY-MM-DDTHH:MM:SS`
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    /// Sender display name
    #[serde(default, deserialize_with = "lenient_text")]
    pub from: Option<String>,
    /// Sender identifier such as `user123456`
    #[serde(default, deserialize_with = "lenient_id")]
    pub from_id: Option<RawId>,
}

/// Identifier value that may be written as a JSON number or string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawId {
    /// Numeric identifier
    Number(serde_json::Number),
    /// Textual identifier
    Text(String),
}

impl RawId {
    /// True for `0` and `""`, which the export treats as "no id"
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Number(n) => n.as_f64() == Some(0.0),
            Self::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RawId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for RawId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Conversation kinds written by the desktop client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatType {
    /// One-to-one conversation
    PersonalChat,
    /// The owner's notes-to-self thread
    SavedMessages,
    /// Conversation with a bot
    BotChat,
    /// Private group
    PrivateGroup,
    /// Private supergroup
    PrivateSupergroup,
    /// Public supergroup
    PublicSupergroup,
    /// Private channel
    PrivateChannel,
    /// Public channel
    PublicChannel,
    /// Anything else
    Other,
}

impl From<&str> for ChatType {
    fn from(value: &str) -> Self {
        match value {
            "personal_chat" => Self::PersonalChat,
            "saved_messages" => Self::SavedMessages,
            "bot_chat" => Self::BotChat,
            "private_group" => Self::PrivateGroup,
            "private_supergroup" => Self::PrivateSupergroup,
            "public_supergroup" => Self::PublicSupergroup,
            "private_channel" => Self::PrivateChannel,
            "public_channel" => Self::PublicChannel,
            _ => Self::Other,
        }
    }
}

/// A JSON object record with camelCase spellings for some snake_case keys.
///
/// Keys are normalized before deserializing, so an object carrying both spellings
/// keeps the snake_case value instead of failing as a duplicate field.
pub(crate) trait Record: DeserializeOwned + Default {
    /// `(camelCase, snake_case)` key pairs
    const ALIASES: &'static [(&'static str, &'static str)] = &[];

    /// Read a record from a JSON value; `None` unless it is an object
    fn from_json(value: Value) -> Option<Self> {
        let Value::Object(mut map) = value else {
            return None;
        };
        normalize_keys(&mut map, Self::ALIASES);
        serde_json::from_value(Value::Object(map)).ok()
    }
}

impl Record for RawExport {
    const ALIASES: &'static [(&'static str, &'static str)] =
        &[("personalInformation", "personal_information")];
}

impl Record for RawChats {}

impl Record for PersonalInformation {
    const ALIASES: &'static [(&'static str, &'static str)] = &[
        ("firstName", "first_name"),
        ("lastName", "last_name"),
        ("userId", "user_id"),
    ];
}

impl Record for RawChat {
    const ALIASES: &'static [(&'static str, &'static str)] = &[
        ("chatId", "chat_id"),
        ("peerId", "peer_id"),
        ("firstName", "first_name"),
        ("lastName", "last_name"),
    ];
}

impl Record for RawMessage {
    const ALIASES: &'static [(&'static str, &'static str)] = &[("fromId", "from_id")];
}

impl RawExport {
    /// Read an export from an already-parsed JSON document.
    ///
    /// Returns `None` when the document is not an object. Prefer this over
    /// `serde_json::from_value`, which skips camelCase key handling at the top level.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        Self::from_json(value)
    }
}

fn normalize_keys(map: &mut Map<String, Value>, aliases: &[(&str, &str)]) {
    for &(camel, snake) in aliases {
        if let Some(value) = map.remove(camel) {
            map.entry(snake).or_insert(value);
        }
    }
}

fn lenient_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Record,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(T::from_json))
}

/// Arrays read element by element; an element that is not an object becomes an
/// empty record. Anything other than an array reads as absent.
fn lenient_records<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Record,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .map(|item| T::from_json(item).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<RawId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => Some(RawId::Number(n)),
        Some(Value::String(s)) => Some(RawId::Text(s)),
        _ => None,
    })
}

fn lenient_chat_type<'de, D>(deserializer: D) -> Result<Option<ChatType>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.map(|kind| ChatType::from(kind.as_str())))
}

/// A ranked conversation, unique by `(name, id)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedChat {
    /// Resolved display label
    pub name: String,
    /// Resolved identifier, or `"unknown"`
    pub id: String,
    /// Best guess at the counterpart's real name; falls back to `name`
    pub full_name: String,
    /// Messages across every raw chat sharing this key
    pub message_count: usize,
}

impl AggregatedChat {
    /// Identifier placeholder used when a chat carries no id fields
    pub const UNKNOWN_ID: &'static str = "unknown";

    /// Label to show in tables: the full name, or the chat name when it is empty
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.name
        } else {
            &self.full_name
        }
    }

    /// Whether the id is a real identifier rather than the placeholder
    #[must_use]
    pub fn has_known_id(&self) -> bool {
        self.id != Self::UNKNOWN_ID
    }
}

/// Message count for one time window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBucket {
    /// `YYYY-MM-DD` for days and weeks, `YYYY-MM` for months
    pub date: String,
    /// Messages dated inside the window
    pub message_count: usize,
}

/// Activity histograms at the three supported granularities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageActivity {
    /// One bucket per UTC calendar day
    pub daily: Vec<ActivityBucket>,
    /// One bucket per week, keyed by its Sunday
    pub weekly: Vec<ActivityBucket>,
    /// One bucket per calendar month
    pub monthly: Vec<ActivityBucket>,
}

impl MessageActivity {
    /// Buckets for the requested granularity
    #[must_use]
    pub fn buckets(&self, granularity: Granularity) -> &[ActivityBucket] {
        match granularity {
            Granularity::Daily => &self.daily,
            Granularity::Weekly => &self.weekly,
            Granularity::Monthly => &self.monthly,
        }
    }
}

/// Complete output of one analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Chats ranked by message count, descending
    pub chats: Vec<AggregatedChat>,
    /// Time-bucketed message counts
    pub message_activity: MessageActivity,
}

impl AnalysisResult {
    /// Sum of message counts over every ranked chat
    #[must_use]
    pub fn total_messages(&self) -> usize {
        self.chats.iter().map(|c| c.message_count).sum()
    }

    /// 1-based position of the chat with this key in the ranking
    #[must_use]
    pub fn rank_of(&self, name: &str, id: &str) -> Option<usize> {
        self.chats
            .iter()
            .position(|c| c.name == name && c.id == id)
            .map(|i| i + 1)
    }
}

/// Bookkeeping collected while analysing, useful for logs and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    /// Raw chat entries in the export
    pub chats_seen: usize,
    /// Raw chats ignored because they had no messages
    pub chats_skipped: usize,
    /// Raw chats folded into an earlier chat with the same key
    pub chats_merged: usize,
    /// Messages across all non-empty chats
    pub messages_total: usize,
    /// Messages that landed in the activity buckets
    pub messages_dated: usize,
    /// Messages whose date was missing or could not be parsed
    pub dates_skipped: usize,
}

/// Time window used by the activity histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Calendar days
    Daily,
    /// Sunday-started weeks
    Weekly,
    /// Calendar months
    Monthly,
}

impl Granularity {
    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            other => Err(AnalyzerError::InvalidInput(format!(
                "unknown granularity: {other}"
            ))),
        }
    }
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values format
    Csv,
    /// Plain text format
    Txt,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "txt" | "text" => Ok(Self::Txt),
            "json" => Ok(Self::Json),
            other => Err(AnalyzerError::InvalidInput(format!(
                "unknown output format: {other}"
            ))),
        }
    }
}
