//! Typed optional fields for each Bot API operation.
//!
//! Every struct flattens into plain form fields via [`to_form_fields`]. The
//! `extra` map on each one carries fields that are not declared here.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::input::Params;

/// Target chat: a numeric id or a public `@username`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatId::Id(id) => write!(f, "{}", id),
            ChatId::Username(name) => f.write_str(name),
        }
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        ChatId::Id(id)
    }
}

impl From<i32> for ChatId {
    fn from(id: i32) -> Self {
        ChatId::Id(i64::from(id))
    }
}

impl From<&str> for ChatId {
    fn from(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(id) => ChatId::Id(id),
            Err(_) => ChatId::Username(value.to_string()),
        }
    }
}

impl From<String> for ChatId {
    fn from(value: String) -> Self {
        ChatId::from(value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum ParseMode {
    #[serde(rename = "MarkdownV2")]
    #[value(name = "MarkdownV2")]
    MarkdownV2,
    #[serde(rename = "Markdown")]
    #[value(name = "Markdown")]
    Markdown,
    #[serde(rename = "HTML")]
    #[value(name = "HTML")]
    Html,
}

/// Fields shared by every sending operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeliveryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_thread_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_notification: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protect_content: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_sending_without_reply: Option<bool>,
    /// Inline keyboard, reply keyboard, etc. Sent as JSON text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_preview_options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_web_page_preview: Option<bool>,
    #[serde(flatten)]
    pub delivery: DeliveryOptions,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ForwardOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_thread_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_notification: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protect_content: Option<bool>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Caption fields common to photo, audio, document, video, animation and voice.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CaptionOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_entities: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PhotoOptions {
    #[serde(flatten)]
    pub caption: CaptionOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_spoiler: Option<bool>,
    #[serde(flatten)]
    pub delivery: DeliveryOptions,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AudioOptions {
    #[serde(flatten)]
    pub caption: CaptionOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub delivery: DeliveryOptions,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentOptions {
    #[serde(flatten)]
    pub caption: CaptionOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_content_type_detection: Option<bool>,
    #[serde(flatten)]
    pub delivery: DeliveryOptions,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VideoOptions {
    #[serde(flatten)]
    pub caption: CaptionOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_spoiler: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_streaming: Option<bool>,
    #[serde(flatten)]
    pub delivery: DeliveryOptions,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnimationOptions {
    #[serde(flatten)]
    pub caption: CaptionOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_spoiler: Option<bool>,
    #[serde(flatten)]
    pub delivery: DeliveryOptions,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VoiceOptions {
    #[serde(flatten)]
    pub caption: CaptionOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(flatten)]
    pub delivery: DeliveryOptions,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VideoNoteOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Diameter of the round video.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(flatten)]
    pub delivery: DeliveryOptions,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Flattens an options struct into form fields.
///
/// Strings are kept verbatim, numbers and booleans become their JSON text and
/// objects or arrays are sent as serialized JSON, which is what the Bot API
/// expects for `reply_markup` and entity lists.
pub fn to_form_fields<T: Serialize>(options: &T) -> Result<Params> {
    let Value::Object(map) = serde_json::to_value(options)? else {
        return Err(Error::Options(
            "options must serialize to a map of fields".to_string(),
        ));
    };

    Ok(map
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| {
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (name, text)
        })
        .collect())
}
