//! 生成結果の保存

use crate::error::Result;
use ai_image_common::ResultArtifact;
use image::ImageReader;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// 保存ファイル名（固定）
pub const DOWNLOAD_FILE_NAME: &str = "generated_image.png";

/// 結果画像を `dir/generated_image.png` に書き出す
///
/// 既存ファイルは上書きする。
pub fn save_artifact(artifact: &ResultArtifact, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(DOWNLOAD_FILE_NAME);
    std::fs::write(&path, &artifact.bytes)?;
    log::info!("{} を保存 ({} bytes)", path.display(), artifact.bytes.len());
    Ok(path)
}

/// 画像のサイズ（読めない場合は `None`）
pub fn result_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}
