//! 生成結果の保持
//!
//! ストアが同時に保持する結果は最大1件。新しい結果を受け取ると前の結果は
//! 解放され、古いハンドルは二度と解決されない。

/// 結果画像へのローカル参照（`blob:ai-image/<n>`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactHandle(u64);

impl ArtifactHandle {
    const SCHEME: &'static str = "blob:ai-image/";

    pub fn from_id(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }

    pub fn uri(&self) -> String {
        format!("{}{}", Self::SCHEME, self.0)
    }
}

/// バックエンドから返された画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultArtifact {
    pub handle: ArtifactHandle,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// 結果画像の所有者
#[derive(Debug, Default)]
pub struct ArtifactStore {
    next_id: u64,
    live: Option<ResultArtifact>,
    released: u64,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しい結果を引き取り、前の結果を解放する
    pub fn adopt(&mut self, bytes: Vec<u8>, content_type: Option<String>) -> ArtifactHandle {
        self.release();
        self.next_id += 1;
        let handle = ArtifactHandle(self.next_id);
        self.live = Some(ResultArtifact {
            handle,
            content_type,
            bytes,
        });
        handle
    }

    /// 保持中の結果を解放
    pub fn release(&mut self) -> Option<ResultArtifact> {
        let released = self.live.take();
        if released.is_some() {
            self.released += 1;
        }
        released
    }

    /// ハンドルを解決（解放済みのハンドルは `None`）
    pub fn resolve(&self, handle: ArtifactHandle) -> Option<&ResultArtifact> {
        self.live.as_ref().filter(|a| a.handle == handle)
    }

    pub fn current(&self) -> Option<&ResultArtifact> {
        self.live.as_ref()
    }

    /// これまでに解放した件数
    pub fn released_count(&self) -> u64 {
        self.released
    }
}
