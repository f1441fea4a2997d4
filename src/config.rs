use crate::error::{Result, StudioError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// 元のフロントエンドが固定で使っていた接続先
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// 接続先を上書きする環境変数
pub const BACKEND_URL_ENV: &str = "AI_IMAGE_BACKEND_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_base_url: String,
    /// 生成画像の保存先（未設定ならカレントディレクトリ）
    pub download_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_base_url: DEFAULT_BACKEND_URL.into(),
            download_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| StudioError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ai-image").join("config.json"))
    }

    pub fn set_backend_url(&mut self, url: &str) -> Result<()> {
        parse_base_url(url)?;
        self.backend_base_url = url.trim().to_string();
        self.save()
    }

    pub fn set_download_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.download_dir = Some(dir);
        self.save()
    }

    /// 接続先を決定（CLI引数 > 環境変数 > 設定ファイル > 既定値）
    pub fn resolve_backend_url(&self, cli_override: Option<&str>) -> Result<Url> {
        let env = std::env::var(BACKEND_URL_ENV).ok();
        self.resolve_backend_url_with(cli_override, env.as_deref())
    }

    pub fn resolve_backend_url_with(
        &self,
        cli_override: Option<&str>,
        env_override: Option<&str>,
    ) -> Result<Url> {
        let raw = cli_override
            .or(env_override)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.backend_base_url.as_str());
        parse_base_url(raw)
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// ベースURLを検証し、末尾を `/` にそろえる
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| StudioError::InvalidUrl(format!("{} ({})", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(StudioError::InvalidUrl(format!("{} (http/httpsのみ対応)", raw)));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// ベースURL配下のエンドポイントURLを作る（ベースのパスは保持）
pub fn endpoint(base: &Url, path: &str) -> Result<Url> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| StudioError::InvalidUrl(format!("{}{} ({})", base, path, e)))
}
