//! Decides whether a parameter value is a local file to upload or an inline
//! string (file_id, URL, plain text) to send as a form field.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::error::{Error, Result};

pub type Params = BTreeMap<String, String>;
pub type Files = BTreeMap<String, FilePayload>;

/// Contents of a local file that will be sent as a multipart attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Named values split into form fields and file attachments.
///
/// Every input name ends up in exactly one of the two maps.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classified {
    pub inline: Params,
    pub files: Files,
}

/// Partitions `named` into inline data and file payloads.
///
/// A value whose path names a regular file is read completely into memory
/// and lands in `files`; anything else is kept verbatim in `inline`.
pub async fn input_file_or_string<I, K, V>(named: I) -> Result<Classified>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: AsRef<str>,
{
    let mut classified = Classified::default();
    for (name, value) in named {
        let name = name.into();
        let value = value.as_ref();
        match read_local_file(value, &name).await? {
            Some(payload) => {
                classified.inline.remove(&name);
                classified.files.insert(name, payload);
            }
            None => {
                classified.files.remove(&name);
                classified.inline.insert(name, value.to_string());
            }
        }
    }
    Ok(classified)
}

/// Reads `value` as a local file when it names a regular file.
///
/// Returns `Ok(None)` when the path cannot be stat'ed or is not a regular
/// file (missing, directory, FIFO, name too long, symlink loop). A regular
/// file that then fails to open or read is returned as an error.
pub async fn read_local_file(value: &str, field: &str) -> Result<Option<FilePayload>> {
    let path = Path::new(value);
    let io_error = |source: std::io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => {}
        _ => return Ok(None),
    }

    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if is_not_a_file(e.kind()) => return Ok(None),
        Err(e) => return Err(io_error(e)),
    };

    // Swapped for something else between the stat and the open.
    let metadata = file.metadata().await.map_err(io_error)?;
    if !metadata.is_file() {
        return Ok(None);
    }

    let mut bytes = Vec::with_capacity(metadata.len() as usize);
    file.read_to_end(&mut bytes).await.map_err(io_error)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(field)
        .to_string();

    Ok(Some(FilePayload { file_name, bytes }))
}

fn is_not_a_file(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::NotFound
            | ErrorKind::NotADirectory
            | ErrorKind::IsADirectory
            | ErrorKind::InvalidInput
    )
}
