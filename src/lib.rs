//! Thin client for the Telegram Bot API.
//!
//! Builds correctly shaped requests for a handful of sending operations and
//! hands back the raw `reqwest::Response`. Nothing is parsed or validated:
//! a non-2xx answer from Telegram is a successful call, so check
//! `response.status()` before trusting the result.
//!
//! ```rust,ignore
//! use teleapi::{PhotoOptions, TelegramApi};
//!
//! let api = TelegramApi::new("123:ABC", Some("socks5h://127.0.0.1:9050"))?;
//! // Uploaded as multipart because the path exists on disk.
//! let response = api.send_photo(42, "/tmp/cat.jpg", &PhotoOptions::default()).await?;
//! if !response.status().is_success() {
//!     eprintln!("{}", response.text().await?);
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod input;
pub mod options;
pub mod request;
pub mod utils;

pub use client::TelegramApi;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use input::{input_file_or_string, Classified, FilePayload, Files, Params};
pub use options::{
    AnimationOptions, AudioOptions, CaptionOptions, ChatId, DeliveryOptions, DocumentOptions,
    ForwardOptions, MessageOptions, ParseMode, PhotoOptions, VideoNoteOptions, VideoOptions,
    VoiceOptions,
};
pub use request::{ApiRequest, HttpMethod, MediaKind};
