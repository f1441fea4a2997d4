//! 送信前の入力検証
//!
//! ルールは上から順に評価し、最初に失敗したものだけを返す。
//! ファイル形式・サイズはここでは検証しない。

use crate::form::FormState;
use thiserror::Error;

/// 送信前検証エラー（メッセージはそのまま画面に表示される）
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Prompt is required unless Face Swap is selected!")]
    PromptRequired,

    #[error("Please upload both Image 1 and Image 2 for Face Swap!")]
    FaceSwapImagesMissing,
}

/// フォーム状態を検証
///
/// # Returns
/// * `Ok(())` - 送信してよい
/// * `Err(ValidationError)` - 表示すべきエラー
pub fn validate(state: &FormState) -> Result<(), ValidationError> {
    if !state.face_swap && state.prompt.trim().is_empty() {
        return Err(ValidationError::PromptRequired);
    }

    if state.face_swap && (state.image1.is_none() || state.image2.is_none()) {
        return Err(ValidationError::FaceSwapImagesMissing);
    }

    Ok(())
}
