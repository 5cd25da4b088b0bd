//! Request descriptors and the per-operation field assembly.

use std::fmt;

use crate::error::Result;
use crate::input::{input_file_or_string, Files, Params};
use crate::options::{to_form_fields, ChatId, ForwardOptions, MessageOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        };
        f.write_str(name)
    }
}

/// One outgoing Bot API call, built fresh and consumed by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Remote method name appended to the base URL, e.g. `sendPhoto`.
    pub endpoint: String,
    pub query: Option<Params>,
    pub form: Option<Params>,
    pub files: Option<Files>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: None,
            form: None,
            files: None,
        }
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    pub fn with_query(mut self, query: Params) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_form(mut self, form: Params) -> Self {
        self.form = Some(form);
        self
    }

    pub fn with_files(mut self, files: Files) -> Self {
        self.files = Some(files);
        self
    }
}

/// Media operations: each uploads one value under its own field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Audio,
    Document,
    Video,
    Animation,
    Voice,
    VideoNote,
}

impl MediaKind {
    pub fn field(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Audio => "audio",
            MediaKind::Document => "document",
            MediaKind::Video => "video",
            MediaKind::Animation => "animation",
            MediaKind::Voice => "voice",
            MediaKind::VideoNote => "video_note",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            MediaKind::Photo => "sendPhoto",
            MediaKind::Audio => "sendAudio",
            MediaKind::Document => "sendDocument",
            MediaKind::Video => "sendVideo",
            MediaKind::Animation => "sendAnimation",
            MediaKind::Voice => "sendVoice",
            MediaKind::VideoNote => "sendVideoNote",
        }
    }
}

/// Sets a mandatory field, replacing any optional value under the same name.
fn set_mandatory(form: &mut Params, name: &str, value: impl Into<String>) {
    let value = value.into();
    if let Some(previous) = form.insert(name.to_string(), value.clone()) {
        if previous != value {
            tracing::warn!(field = name, "ignoring extra field that collides with a mandatory field");
        }
    }
}

pub fn message_request(chat_id: &ChatId, text: &str, options: &MessageOptions) -> Result<ApiRequest> {
    let mut form = to_form_fields(options)?;
    set_mandatory(&mut form, "chat_id", chat_id.to_string());
    set_mandatory(&mut form, "text", text);
    Ok(ApiRequest::post("sendMessage").with_form(form))
}

pub fn forward_request(
    chat_id: &ChatId,
    from_chat_id: &ChatId,
    message_id: i64,
    options: &ForwardOptions,
) -> Result<ApiRequest> {
    let mut form = to_form_fields(options)?;
    set_mandatory(&mut form, "chat_id", chat_id.to_string());
    set_mandatory(&mut form, "from_chat_id", from_chat_id.to_string());
    set_mandatory(&mut form, "message_id", message_id.to_string());
    Ok(ApiRequest::post("forwardMessage").with_form(form))
}

/// Builds a media upload: `media` is read as a file when it names one on
/// disk, otherwise it is sent inline (file_id or URL).
pub async fn media_request(
    kind: MediaKind,
    chat_id: &ChatId,
    media: &str,
    mut form: Params,
) -> Result<ApiRequest> {
    let field = kind.field();
    let classified = input_file_or_string([(field, media)]).await?;

    if form.remove(field).is_some() {
        tracing::warn!(field, "ignoring extra field that collides with a mandatory field");
    }
    form.extend(classified.inline);
    set_mandatory(&mut form, "chat_id", chat_id.to_string());

    let request = ApiRequest::post(kind.endpoint()).with_form(form);
    if classified.files.is_empty() {
        Ok(request)
    } else {
        Ok(request.with_files(classified.files))
    }
}
