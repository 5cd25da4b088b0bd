use std::fmt;

use reqwest::multipart::{Form, Part};
use reqwest::{Proxy, Response};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::input::{Files, Params};
use crate::options::{
    to_form_fields, AnimationOptions, AudioOptions, ChatId, DocumentOptions, ForwardOptions,
    MessageOptions, PhotoOptions, VideoNoteOptions, VideoOptions, VoiceOptions,
};
use crate::request::{forward_request, media_request, message_request, ApiRequest, HttpMethod, MediaKind};
use crate::utils::redact_token;

/// Telegram Bot API client.
///
/// Owns one `reqwest::Client` (connection reuse, proxy and timeout settings)
/// and the base URL derived from the bot token. Every call is independent.
///
/// Responses are returned exactly as received: a `401`, `400` or `429` from
/// Telegram is an `Ok(Response)` and the caller must check
/// `response.status()` itself. Only transport failures, local file read
/// failures and an unusable proxy URL are returned as `Err`.
pub struct TelegramApi {
    /// `Err` holds the reason the configured proxy was rejected.
    client: std::result::Result<reqwest::Client, String>,
    config: ClientConfig,
    base_url: String,
}

impl TelegramApi {
    /// Creates a client for `token`, optionally routing traffic through `proxy`.
    pub fn new(token: impl Into<String>, proxy: Option<&str>) -> Result<Self> {
        let mut config = ClientConfig::new(token);
        if let Some(proxy) = proxy {
            config = config.with_proxy(proxy);
        }
        Self::with_config(config)
    }

    /// Builds the client. A proxy URL the HTTP client rejects does not fail
    /// here; every request made through this client returns `Error::Proxy`.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = match &config.proxy {
            Some(proxy) => match proxy_for(&config.api_url, proxy) {
                Ok(proxy) => Ok(builder.proxy(proxy).build().map_err(Error::ClientBuild)?),
                Err(e) => {
                    tracing::warn!("proxy URL rejected, requests will fail: {}", e);
                    Err(e.to_string())
                }
            },
            None => Ok(builder.build().map_err(Error::ClientBuild)?),
        };

        let base_url = config.base_url();
        tracing::debug!(
            base_url = %redact_token(&base_url, &config.token),
            proxied = config.proxy.is_some(),
            "Telegram API client ready"
        );

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// `<api_url>/bot<token>/`, the prefix of every request URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn proxy(&self) -> Option<&str> {
        self.config.proxy.as_deref()
    }

    /// Low-level request to `base_url + endpoint`.
    ///
    /// `endpoint` is used verbatim and must match the remote method name's
    /// casing. When `files` is non-empty the body is `multipart/form-data`
    /// (form fields as text parts); otherwise `form` is sent url-encoded.
    pub async fn raw(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: Option<&Params>,
        form: Option<&Params>,
        files: Option<Files>,
    ) -> Result<Response> {
        let client = self
            .client
            .as_ref()
            .map_err(|reason| Error::Proxy(reason.clone()))?;
        let url = format!("{}{}", self.base_url, endpoint);
        let files = files.unwrap_or_default();

        tracing::debug!(
            %method,
            endpoint,
            form_fields = form.map_or(0, |form| form.len()),
            attachments = ?files.keys().collect::<Vec<_>>(),
            "dispatching Bot API request"
        );

        let mut builder = client.request(method.into(), &url);
        if let Some(query) = query {
            builder = builder.query(query);
        }

        if !files.is_empty() {
            let mut multipart = Form::new();
            for (name, value) in form.into_iter().flatten() {
                multipart = multipart.text(name.clone(), value.clone());
            }
            for (name, payload) in files {
                let part = Part::bytes(payload.bytes).file_name(payload.file_name);
                multipart = multipart.part(name, part);
            }
            builder = builder.multipart(multipart);
        } else if let Some(form) = form {
            builder = builder.form(form);
        }

        let response = builder.send().await?;

        tracing::debug!(status = %response.status(), endpoint, "Bot API responded");
        Ok(response)
    }

    /// Dispatches a prepared [`ApiRequest`] through [`TelegramApi::raw`].
    pub async fn execute(&self, request: ApiRequest) -> Result<Response> {
        self.raw(
            request.method,
            &request.endpoint,
            request.query.as_ref(),
            request.form.as_ref(),
            request.files,
        )
        .await
    }

    /// https://core.telegram.org/bots/api#sendmessage
    pub async fn send_message(
        &self,
        chat_id: impl Into<ChatId>,
        text: &str,
        options: &MessageOptions,
    ) -> Result<Response> {
        let request = message_request(&chat_id.into(), text, options)?;
        self.execute(request).await
    }

    /// https://core.telegram.org/bots/api#forwardmessage
    pub async fn forward_message(
        &self,
        chat_id: impl Into<ChatId>,
        from_chat_id: impl Into<ChatId>,
        message_id: i64,
        options: &ForwardOptions,
    ) -> Result<Response> {
        let request = forward_request(&chat_id.into(), &from_chat_id.into(), message_id, options)?;
        self.execute(request).await
    }

    /// Sends any media operation with already flattened optional fields.
    ///
    /// `media` is uploaded when it names a readable local file and sent as a
    /// plain field (file_id or URL) otherwise.
    pub async fn send_media(
        &self,
        kind: MediaKind,
        chat_id: impl Into<ChatId>,
        media: &str,
        fields: Params,
    ) -> Result<Response> {
        let request = media_request(kind, &chat_id.into(), media, fields).await?;
        self.execute(request).await
    }

    /// https://core.telegram.org/bots/api#sendphoto
    pub async fn send_photo(
        &self,
        chat_id: impl Into<ChatId>,
        photo: &str,
        options: &PhotoOptions,
    ) -> Result<Response> {
        self.send_media(MediaKind::Photo, chat_id, photo, to_form_fields(options)?)
            .await
    }

    /// https://core.telegram.org/bots/api#sendaudio
    pub async fn send_audio(
        &self,
        chat_id: impl Into<ChatId>,
        audio: &str,
        options: &AudioOptions,
    ) -> Result<Response> {
        self.send_media(MediaKind::Audio, chat_id, audio, to_form_fields(options)?)
            .await
    }

    /// https://core.telegram.org/bots/api#senddocument
    pub async fn send_document(
        &self,
        chat_id: impl Into<ChatId>,
        document: &str,
        options: &DocumentOptions,
    ) -> Result<Response> {
        self.send_media(MediaKind::Document, chat_id, document, to_form_fields(options)?)
            .await
    }

    /// https://core.telegram.org/bots/api#sendvideo
    pub async fn send_video(
        &self,
        chat_id: impl Into<ChatId>,
        video: &str,
        options: &VideoOptions,
    ) -> Result<Response> {
        self.send_media(MediaKind::Video, chat_id, video, to_form_fields(options)?)
            .await
    }

    /// https://core.telegram.org/bots/api#sendanimation
    pub async fn send_animation(
        &self,
        chat_id: impl Into<ChatId>,
        animation: &str,
        options: &AnimationOptions,
    ) -> Result<Response> {
        self.send_media(MediaKind::Animation, chat_id, animation, to_form_fields(options)?)
            .await
    }

    /// https://core.telegram.org/bots/api#sendvoice
    pub async fn send_voice(
        &self,
        chat_id: impl Into<ChatId>,
        voice: &str,
        options: &VoiceOptions,
    ) -> Result<Response> {
        self.send_media(MediaKind::Voice, chat_id, voice, to_form_fields(options)?)
            .await
    }

    /// https://core.telegram.org/bots/api#sendvideonote
    pub async fn send_video_note(
        &self,
        chat_id: impl Into<ChatId>,
        video_note: &str,
        options: &VideoNoteOptions,
    ) -> Result<Response> {
        self.send_media(MediaKind::VideoNote, chat_id, video_note, to_form_fields(options)?)
            .await
    }
}

/// The proxy covers the scheme the Bot API is reached over: HTTPS for the
/// public server, plain HTTP for a self-hosted one at an `http://` address.
fn proxy_for(api_url: &str, proxy: &str) -> reqwest::Result<Proxy> {
    if api_url.starts_with("http://") {
        Proxy::http(proxy)
    } else {
        Proxy::https(proxy)
    }
}

impl fmt::Debug for TelegramApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramApi")
            .field("base_url", &redact_token(&self.base_url, &self.config.token))
            .field("config", &self.config)
            .finish()
    }
}
