//! 入力画像の読み込み
//!
//! 拡張子による画像判定はあくまで目安で、画像以外でも送信はする。

use crate::error::{Result, StudioError};
use ai_image_common::ImageFile;
use image::ImageFormat;
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// 画像らしい拡張子か
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// ファイルを読み込んで送信用の画像にする
pub fn load_image(path: &Path) -> Result<ImageFile> {
    if !path.is_file() {
        return Err(StudioError::FileNotFound(path.display().to_string()));
    }

    if !has_image_extension(path) {
        log::warn!("画像ではない可能性があります: {}", path.display());
    }

    let data = std::fs::read(path)
        .map_err(|e| StudioError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());

    let content_type = detect_content_type(path, &data);
    let image = ImageFile::new(file_name, content_type, data);

    if image.is_empty() {
        log::warn!("空のファイルです: {}", path.display());
    }
    log::debug!("{} を読み込み ({} bytes, {})", image.file_name, image.len(), image.content_type);

    Ok(image)
}

/// 内容から形式を判定し、だめなら拡張子で判定
fn detect_content_type(path: &Path, data: &[u8]) -> String {
    image::guess_format(data)
        .ok()
        .or_else(|| ImageFormat::from_path(path).ok())
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
}
