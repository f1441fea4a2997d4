//! テスト用の偽バックエンド

#![allow(dead_code)]

use ai_image_common::{BackendReply, FormState, GenerateRequest, ImageFile};
use ai_image_studio::backend::{GenerateBackend, TransportError};
use std::sync::Mutex;
use tokio::sync::watch;

pub enum Script {
    Reply(BackendReply),
    Transport(String),
    /// 応答を返さない
    Hang,
}

pub struct FakeBackend {
    script: Script,
    requests: Mutex<Vec<GenerateRequest>>,
    watcher: Mutex<Option<watch::Receiver<FormState>>>,
    submitting_during_call: Mutex<Vec<bool>>,
}

impl FakeBackend {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
            watcher: Mutex::new(None),
            submitting_during_call: Mutex::new(Vec::new()),
        }
    }

    pub fn image(status: u16, body: &[u8]) -> Self {
        Self::new(Script::Reply(BackendReply {
            status,
            content_type: Some("image/jpeg".into()),
            body: body.to_vec(),
        }))
    }

    pub fn json_error(status: u16, body: &str) -> Self {
        Self::new(Script::Reply(BackendReply {
            status,
            content_type: Some("application/json".into()),
            body: body.as_bytes().to_vec(),
        }))
    }

    /// 呼び出し時点の状態を記録するために購読させる
    pub fn observe(&self, updates: watch::Receiver<FormState>) {
        *self.watcher.lock().unwrap() = Some(updates);
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn submitting_during_call(&self) -> Vec<bool> {
        self.submitting_during_call.lock().unwrap().clone()
    }

    fn record(&self, request: &GenerateRequest) {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(updates) = self.watcher.lock().unwrap().as_ref() {
            let submitting = updates.borrow().is_submitting;
            self.submitting_during_call.lock().unwrap().push(submitting);
        }
    }
}

impl GenerateBackend for FakeBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<BackendReply, TransportError> {
        self.record(request);
        match &self.script {
            Script::Reply(reply) => Ok(reply.clone()),
            Script::Transport(message) => Err(TransportError::new(message.clone())),
            Script::Hang => std::future::pending().await,
        }
    }
}

pub fn image_file(name: &str, bytes: &[u8]) -> ImageFile {
    ImageFile::new(name, "image/jpeg", bytes.to_vec())
}
