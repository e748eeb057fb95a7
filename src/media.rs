use crate::error::MLError;
use mime_guess::mime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MLMediaType {
    Video,
    Audio,
    Image,
    Document,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MLMediaInfo {
    pub key: String,

    #[serde(rename = "type")]
    pub media_type: MLMediaType,

    pub mime_type: String,
}

/// Classifies an object by the extension of its key; the store is not consulted.
pub fn describe(key: Option<&str>) -> Result<MLMediaInfo, MLError> {
    let key = match key.map(str::trim) {
        Some(key) if !key.is_empty() => key,
        _ => return Err(MLError::MissingKey),
    };

    let mime = mime_guess::from_path(key).first_or_octet_stream();
    let media_type = if mime.type_() == mime::VIDEO {
        MLMediaType::Video
    } else if mime.type_() == mime::AUDIO {
        MLMediaType::Audio
    } else if mime.type_() == mime::IMAGE {
        MLMediaType::Image
    } else {
        MLMediaType::Document
    };

    Ok(MLMediaInfo {
        key: key.to_string(),
        media_type,
        mime_type: mime.essence_str().to_string(),
    })
}
