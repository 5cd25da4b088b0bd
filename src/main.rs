use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use teleapi::config::{Args, Command, MediaArgs, RawArgs};
use teleapi::options::to_form_fields;
use teleapi::{
    ApiRequest, CaptionOptions, Error, FilePayload, Files, ForwardOptions, MediaKind, MessageOptions, Params,
    TelegramApi,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sends the requested call and prints the raw answer. Returns whether the
/// Bot API answered with a 2xx status.
async fn run(args: Args) -> teleapi::Result<bool> {
    let api = TelegramApi::with_config(args.client_config())?;

    let response = match &args.command {
        Command::Message { chat_id, text, parse_mode, fields } => {
            let options = MessageOptions {
                parse_mode: *parse_mode,
                extra: fields.iter().cloned().collect(),
                ..Default::default()
            };
            api.send_message(chat_id.as_str(), text, &options).await?
        }
        Command::Forward { chat_id, from_chat_id, message_id, fields } => {
            let options = ForwardOptions {
                extra: fields.iter().cloned().collect(),
                ..Default::default()
            };
            api.forward_message(chat_id.as_str(), from_chat_id.as_str(), *message_id, &options)
                .await?
        }
        Command::Photo(media) => send_media(&api, MediaKind::Photo, media).await?,
        Command::Audio(media) => send_media(&api, MediaKind::Audio, media).await?,
        Command::Document(media) => send_media(&api, MediaKind::Document, media).await?,
        Command::Video(media) => send_media(&api, MediaKind::Video, media).await?,
        Command::Animation(media) => send_media(&api, MediaKind::Animation, media).await?,
        Command::Voice(media) => send_media(&api, MediaKind::Voice, media).await?,
        Command::VideoNote(media) => send_media(&api, MediaKind::VideoNote, media).await?,
        Command::Raw(raw) => send_raw(&api, raw).await?,
    };

    let status = response.status();
    let body = response.text().await?;

    eprintln!("Telegram Response: {}", status);
    println!("{}", body);

    Ok(status.is_success())
}

async fn send_media(
    api: &TelegramApi,
    kind: MediaKind,
    media: &MediaArgs,
) -> teleapi::Result<reqwest::Response> {
    let caption = CaptionOptions {
        caption: media.caption.clone(),
        parse_mode: media.parse_mode,
        ..Default::default()
    };
    let mut fields = to_form_fields(&caption)?;
    fields.extend(media.fields.iter().cloned());

    api.send_media(kind, media.chat_id.as_str(), &media.media, fields)
        .await
}

async fn send_raw(api: &TelegramApi, raw: &RawArgs) -> teleapi::Result<reqwest::Response> {
    let query: Params = raw.query.iter().cloned().collect();
    let form: Params = raw.fields.iter().cloned().collect();

    let mut files = Files::new();
    for (name, path) in raw.file_paths() {
        let bytes = tokio::fs::read(&path).await.map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name)
            .to_string();
        files.insert(name.to_string(), FilePayload { file_name, bytes });
    }

    let mut request = ApiRequest::new(raw.method, raw.endpoint.as_str());
    if !query.is_empty() {
        request = request.with_query(query);
    }
    if !form.is_empty() {
        request = request.with_form(form);
    }
    if !files.is_empty() {
        request = request.with_files(files);
    }
    api.execute(request).await
}
