//! 生成リクエストの組み立て
//!
//! フォーム状態から multipart のフィールド列を作る。HTTPクライアントには
//! 依存しないので、送信内容をそのままテストできる。

use crate::error::Result;
use crate::form::{FormState, ImageFile, ImageSlot};
use crate::validator::validate;

pub const FIELD_FACE_SWAP: &str = "face_swap";
pub const FIELD_PROMPT: &str = "prompt";

/// フィールドの値
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(ImageFile),
}

/// multipartの1フィールド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub value: FieldValue,
}

/// `POST /generate` の送信内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    fields: Vec<FormField>,
}

impl GenerateRequest {
    /// 検証済みのフォーム状態からリクエストを作成
    ///
    /// 送信順: `face_swap`, `prompt`（フェイススワップ無効時のみ）,
    /// `image1`, `image2`（選択されている場合のみ）
    pub fn from_state(state: &FormState) -> Result<Self> {
        validate(state)?;

        let mut fields = vec![FormField {
            name: FIELD_FACE_SWAP,
            value: FieldValue::Text(state.face_swap.to_string()),
        }];

        if !state.face_swap {
            fields.push(FormField {
                name: FIELD_PROMPT,
                value: FieldValue::Text(state.prompt.clone()),
            });
        }

        for slot in ImageSlot::ALL {
            if let Some(image) = state.image(slot) {
                fields.push(FormField {
                    name: slot.field_name(),
                    value: FieldValue::File(image.clone()),
                });
            }
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match &f.value {
            FieldValue::Text(text) if f.name == name => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn file(&self, name: &str) -> Option<&ImageFile> {
        self.fields.iter().find_map(|f| match &f.value {
            FieldValue::File(file) if f.name == name => Some(file),
            _ => None,
        })
    }

    pub fn is_face_swap(&self) -> bool {
        self.text(FIELD_FACE_SWAP) == Some("true")
    }
}
