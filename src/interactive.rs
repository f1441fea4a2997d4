//! 対話式フォーム
//!
//! フェイススワップ切替 → プロンプト → 画像1/2 → 送信 → 保存 の順に尋ねる。
//! 失敗してもセッションは使い続けられる。

use crate::backend::GenerateBackend;
use crate::download::result_dimensions;
use crate::error::Result;
use crate::input::load_image;
use crate::session::{Session, SubmitStatus};
use ai_image_common::{ImageSlot, USAGE_NOTES};
use dialoguer::{Confirm, Input};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 対話式で入力して送信
pub async fn run_interactive<B: GenerateBackend>(
    session: &mut Session<B>,
    download_dir: &Path,
) -> Result<()> {
    println!("🎨 AI Image Generator\n");
    for (i, note) in USAGE_NOTES.iter().enumerate() {
        println!("  {}. {}", i + 1, note);
    }
    println!();

    let mut image_paths: HashMap<ImageSlot, PathBuf> = HashMap::new();

    loop {
        let face_swap = Confirm::new()
            .with_prompt("Enable Face Swap (optional)")
            .default(session.state().face_swap)
            .interact()?;
        session.set_face_swap(face_swap);

        if session.state().prompt_visible() {
            let prompt: String = Input::new()
                .with_prompt("Prompt *")
                .with_initial_text(session.state().prompt.clone())
                .allow_empty(true)
                .interact_text()?;
            session.set_prompt(prompt);
        }

        for slot in ImageSlot::ALL {
            ask_image(session, slot, &mut image_paths)?;
        }

        let status = session.submit().await?;
        match status {
            SubmitStatus::Rejected(_) | SubmitStatus::Failed(_) => {
                if let Some(message) = &session.state().error_message {
                    println!("❌ {}\n", message);
                }
            }
            SubmitStatus::Generated(handle) => {
                if let Some(artifact) = session.result() {
                    match result_dimensions(&artifact.bytes) {
                        Some((w, h)) => println!("✔ 生成完了: {} ({}x{})", handle.uri(), w, h),
                        None => println!("✔ 生成完了: {} ({} bytes)", handle.uri(), artifact.bytes.len()),
                    }
                }

                let save = Confirm::new()
                    .with_prompt("⬇️ Download Image")
                    .default(true)
                    .interact()?;
                if save {
                    if let Some(path) = session.download(download_dir)? {
                        println!("✔ 保存しました: {}", path.display());
                    }
                }
            }
        }

        let again = Confirm::new()
            .with_prompt("続けて入力しますか?")
            .default(false)
            .interact()?;
        if !again {
            break;
        }
        println!();
    }

    Ok(())
}

/// 画像パスを尋ねる（空欄で未選択、読めなければ再入力）
fn ask_image<B: GenerateBackend>(
    session: &mut Session<B>,
    slot: ImageSlot,
    image_paths: &mut HashMap<ImageSlot, PathBuf>,
) -> Result<()> {
    let requirement = session.state().image_requirement();

    loop {
        let initial = image_paths
            .get(&slot)
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        let answer: String = Input::new()
            .with_prompt(format!("{} {} - ファイルパス", slot.label(), requirement))
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()?;

        let answer = answer.trim();
        if answer.is_empty() {
            image_paths.remove(&slot);
            session.select_image(slot, None);
            return Ok(());
        }

        let path = PathBuf::from(answer);
        match load_image(&path) {
            Ok(image) => {
                session.select_image(slot, Some(image));
                image_paths.insert(slot, path);
                return Ok(());
            }
            Err(e) => println!("  ⚠ {}", e),
        }
    }
}
