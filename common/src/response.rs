//! バックエンド応答の解釈
//!
//! 成功時は画像バイト列、失敗時は `{"error": "..."}` 形式のJSONを想定する。

use serde::Deserialize;

/// エラー本文が読めない場合の表示メッセージ
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// HTTP応答（トランスポート層から受け取った生データ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl BackendReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// 1回の送信の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Generated {
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
    Failed(String),
}

impl SubmissionOutcome {
    /// HTTP応答を結果に変換
    pub fn from_reply(reply: BackendReply) -> Self {
        if reply.is_success() {
            SubmissionOutcome::Generated {
                content_type: reply.content_type,
                bytes: reply.body,
            }
        } else {
            SubmissionOutcome::Failed(parse_error_message(&reply.body))
        }
    }

    /// トランスポート層のエラー（接続失敗など）
    pub fn from_transport_error(error: impl std::fmt::Display) -> Self {
        SubmissionOutcome::Failed(error.to_string())
    }
}

/// エラー応答本文から `error` フィールドを取り出す
///
/// JSONでない、`error` が無い・文字列でない・空の場合は
/// [`GENERIC_ERROR_MESSAGE`] を返す。
pub fn parse_error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}
