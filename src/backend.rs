//! バックエンド連携モジュール
//!
//! - `POST /generate`: multipart で送信し、画像バイト列を受け取る
//! - `GET /`: 稼働確認
//!
//! リトライ・タイムアウト・キャンセルは行わない。1回の送信につき
//! リクエストは1回だけ。

use crate::config::endpoint;
use crate::error::Result;
use ai_image_common::{BackendReply, FieldValue, GenerateRequest};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::future::Future;
use thiserror::Error;
use url::Url;

pub const GENERATE_PATH: &str = "generate";

/// 通信レベルの失敗（メッセージはそのまま画面に出す）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        // reqwestのDisplayは原因を含まないので連結する
        let mut message = error.to_string();
        let mut source = std::error::Error::source(&error);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self { message }
    }
}

/// 画像生成バックエンド
pub trait GenerateBackend {
    fn generate(
        &self,
        request: &GenerateRequest,
    ) -> impl Future<Output = std::result::Result<BackendReply, TransportError>> + Send;
}

#[derive(Debug, Deserialize)]
struct HealthReply {
    #[serde(default)]
    message: String,
}

/// reqwestによるHTTP実装
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
    generate_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ai-image-studio/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let generate_url = endpoint(&base_url, GENERATE_PATH)?;

        Ok(Self {
            client,
            base_url,
            generate_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 稼働確認（`GET /` の `message` を返す）
    pub async fn health(&self) -> Result<String> {
        log::debug!("GET {}", self.base_url);
        let reply: HealthReply = self
            .client
            .get(self.base_url.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(reply.message)
    }
}

impl GenerateBackend for HttpBackend {
    async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> std::result::Result<BackendReply, TransportError> {
        let form = build_form(request)?;
        log::debug!("POST {} fields={:?}", self.generate_url, request.field_names());

        let response = self
            .client
            .post(self.generate_url.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();
        log::debug!("応答: status={} content_type={:?} {} bytes", status, content_type, body.len());

        Ok(BackendReply {
            status,
            content_type,
            body,
        })
    }
}

/// リクエストを multipart フォームに変換
pub fn build_form(request: &GenerateRequest) -> std::result::Result<Form, TransportError> {
    let mut form = Form::new();

    for field in request.fields() {
        form = match &field.value {
            FieldValue::Text(text) => form.text(field.name, text.clone()),
            FieldValue::File(image) => {
                let part = Part::bytes(image.bytes().to_vec())
                    .file_name(image.file_name.clone())
                    .mime_str(&image.content_type)?;
                form.part(field.name, part)
            }
        };
    }

    Ok(form)
}
