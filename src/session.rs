//! フォーム状態の保持と送信処理
//!
//! 状態遷移は `ai_image_common` の純粋関数で行い、ここでは
//! バックエンド呼び出しと結果画像の所有、購読者への通知だけを担当する。
//!
//! 送信の流れ: Idle → Submitting → (成功 | 失敗) → Idle

use crate::backend::GenerateBackend;
use crate::download::save_artifact;
use crate::error::{Result, StudioError};
use ai_image_common::{
    validate, ArtifactHandle, ArtifactStore, FormState, GenerateRequest, ImageFile, ImageSlot,
    ResultArtifact, SubmissionOutcome, ValidationError,
};
use std::path::{Path, PathBuf};
use tokio::sync::watch;

/// 1回の送信の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    /// 検証で止めた（リクエストは送っていない）
    Rejected(ValidationError),
    Generated(ArtifactHandle),
    Failed(String),
}

pub struct Session<B> {
    state: FormState,
    artifacts: ArtifactStore,
    backend: B,
    updates: watch::Sender<FormState>,
}

impl<B: GenerateBackend> Session<B> {
    pub fn new(backend: B) -> Self {
        let (updates, _) = watch::channel(FormState::default());
        Self {
            state: FormState::default(),
            artifacts: ArtifactStore::new(),
            backend,
            updates,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 状態変更を購読（UI層用）
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.updates.subscribe()
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.state.set_prompt(prompt);
        self.publish();
    }

    pub fn select_image(&mut self, slot: ImageSlot, image: Option<ImageFile>) {
        self.state.select_image(slot, image);
        self.publish();
    }

    pub fn set_face_swap(&mut self, enabled: bool) {
        self.state.set_face_swap(enabled);
        self.publish();
    }

    pub fn toggle_face_swap(&mut self) {
        self.state.toggle_face_swap();
        self.publish();
    }

    /// 現在の結果画像
    pub fn result(&self) -> Option<&ResultArtifact> {
        self.state
            .result_image
            .and_then(|handle| self.artifacts.resolve(handle))
    }

    /// 結果画像の所有状況（テスト・診断用）
    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// フォームを送信
    ///
    /// 送信中に呼ばれた場合は `StudioError::Busy`。検証エラー・通信エラー・
    /// バックエンドのエラーはいずれも状態の `error_message` に入り、
    /// `SubmitStatus` として返る。
    pub async fn submit(&mut self) -> Result<SubmitStatus> {
        if self.state.is_submitting {
            return Err(StudioError::Busy);
        }

        // 前回の結果とエラーを消す
        self.state.clear_outcome();
        self.artifacts.release();

        if let Err(error) = validate(&self.state) {
            log::debug!("検証エラー: {}", error);
            self.state.reject(error);
            self.publish();
            return Ok(SubmitStatus::Rejected(error));
        }

        let request = GenerateRequest::from_state(&self.state)?;

        self.state.begin_submission();
        self.publish();

        // 送信途中で future が破棄されても Submitting のまま残さない
        let guard = SubmittingGuard {
            state: &mut self.state,
            updates: &self.updates,
        };

        let outcome = match self.backend.generate(&request).await {
            Ok(reply) => SubmissionOutcome::from_reply(reply),
            Err(error) => SubmissionOutcome::from_transport_error(error),
        };

        let status = match outcome {
            SubmissionOutcome::Generated { content_type, bytes } => {
                let handle = self.artifacts.adopt(bytes, content_type);
                guard.state.finish_submission(Ok(handle));
                SubmitStatus::Generated(handle)
            }
            SubmissionOutcome::Failed(message) => {
                log::warn!("生成失敗: {}", message);
                guard.state.finish_submission(Err(message.clone()));
                SubmitStatus::Failed(message)
            }
        };
        drop(guard);
        self.publish();

        Ok(status)
    }

    /// 結果画像を保存（結果が無ければ何もしない）
    pub fn download(&self, dir: &Path) -> Result<Option<PathBuf>> {
        match self.result() {
            Some(artifact) => save_artifact(artifact, dir).map(Some),
            None => Ok(None),
        }
    }

    fn publish(&self) {
        self.updates.send_replace(self.state.clone());
    }
}

/// 送信中フラグの後始末
///
/// 完了前に破棄された場合だけ `is_submitting` を戻して通知する。
struct SubmittingGuard<'a> {
    state: &'a mut FormState,
    updates: &'a watch::Sender<FormState>,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        if self.state.is_submitting {
            log::debug!("送信が中断されました");
            self.state.is_submitting = false;
            self.updates.send_replace(self.state.clone());
        }
    }
}
