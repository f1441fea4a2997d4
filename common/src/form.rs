//! フォーム状態の型定義
//!
//! 入力（プロンプト・画像・フェイススワップ切替）と送信結果を1つの構造体に
//! まとめ、変更はすべてメソッド経由の状態遷移として行う。

use crate::artifact::ArtifactHandle;
use crate::validator::ValidationError;
use std::sync::Arc;

/// 画面に表示する使い方の説明
pub const USAGE_NOTES: &[&str] = &[
    "Image 1 is the Source Image and Image 2 is the Target Image.",
    "Prompts are mandatory unless you are performing a Face Swap.",
    "For best results, always upload a person's image in Image 2.",
    "The optional Face Swap feature swaps the face from Image 1 onto Image 2.",
    "Use high-quality images (JPEG/PNG) for accurate results.",
    "You can also generate an image using prompts only.",
];

/// アップロードする画像ファイル
///
/// バイト列は `Arc` で共有するため、状態のクローンは安価。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// 画像スロット（Image 1 = ソース, Image 2 = ターゲット）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    Image1,
    Image2,
}

impl ImageSlot {
    pub const ALL: [ImageSlot; 2] = [ImageSlot::Image1, ImageSlot::Image2];

    /// multipartのフィールド名
    pub fn field_name(&self) -> &'static str {
        match self {
            ImageSlot::Image1 => "image1",
            ImageSlot::Image2 => "image2",
        }
    }

    /// 表示名
    pub fn label(&self) -> &'static str {
        match self {
            ImageSlot::Image1 => "Image 1",
            ImageSlot::Image2 => "Image 2",
        }
    }
}

impl std::fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// フォーム状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// プロンプト（フェイススワップ時は送信しない）
    pub prompt: String,
    pub image1: Option<ImageFile>,
    pub image2: Option<ImageFile>,
    pub face_swap: bool,
    /// 生成結果への参照
    pub result_image: Option<ArtifactHandle>,
    pub is_submitting: bool,
    pub error_message: Option<String>,
}

impl FormState {
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn select_image(&mut self, slot: ImageSlot, image: Option<ImageFile>) {
        match slot {
            ImageSlot::Image1 => self.image1 = image,
            ImageSlot::Image2 => self.image2 = image,
        }
    }

    pub fn image(&self, slot: ImageSlot) -> Option<&ImageFile> {
        match slot {
            ImageSlot::Image1 => self.image1.as_ref(),
            ImageSlot::Image2 => self.image2.as_ref(),
        }
    }

    pub fn set_face_swap(&mut self, enabled: bool) {
        self.face_swap = enabled;
    }

    pub fn toggle_face_swap(&mut self) {
        self.face_swap = !self.face_swap;
    }

    /// 前回の結果とエラーを消す
    ///
    /// 以前の結果ハンドルを返すので、呼び出し側で解放すること。
    pub fn clear_outcome(&mut self) -> Option<ArtifactHandle> {
        self.error_message = None;
        self.result_image.take()
    }

    /// 検証エラーを表示（送信は開始しない）
    pub fn reject(&mut self, error: ValidationError) {
        self.error_message = Some(error.to_string());
    }

    /// 送信開始: Idle → Submitting
    pub fn begin_submission(&mut self) {
        self.is_submitting = true;
    }

    /// 送信完了: Submitting → Idle（成功・失敗どちらでも）
    pub fn finish_submission(&mut self, outcome: std::result::Result<ArtifactHandle, String>) {
        match outcome {
            Ok(handle) => {
                self.result_image = Some(handle);
                self.error_message = None;
            }
            Err(message) => {
                self.result_image = None;
                self.error_message = Some(message);
            }
        }
        self.is_submitting = false;
    }

    /// プロンプト入力欄を表示するか
    pub fn prompt_visible(&self) -> bool {
        !self.face_swap
    }

    /// 送信ボタンのラベル
    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting {
            "Processing..."
        } else if self.face_swap {
            "Swap Faces"
        } else {
            "Generate"
        }
    }

    /// 画像欄の必須/任意表示
    pub fn image_requirement(&self) -> &'static str {
        if self.face_swap {
            "(required)"
        } else {
            "(optional)"
        }
    }
}
