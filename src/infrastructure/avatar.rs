use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("无法读取图片: {0}")]
    Io(#[from] std::io::Error),
    #[error("不支持的图片格式: {0}")]
    UnsupportedType(String),
}

fn mime_type(path: &Path) -> Result<&'static str, AvatarError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        "bmp" => Ok("image/bmp"),
        "svg" => Ok("image/svg+xml"),
        _ => Err(AvatarError::UnsupportedType(path.display().to_string())),
    }
}

/// Reads a local image and embeds it as a `data:` URL.
pub fn encode_data_url(path: &Path) -> Result<String, AvatarError> {
    let mime = mime_type(path)?;
    let bytes = fs::read(path)?;
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}
