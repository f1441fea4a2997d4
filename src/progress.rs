//! 送信中のスピナー表示
//!
//! `Session::subscribe` の通知を見て、`is_submitting` の間だけ表示する。

use ai_image_common::FormState;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// スピナー表示タスクを起動（送信側が破棄されると終了）
pub fn spawn_progress(mut updates: watch::Receiver<FormState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut spinner: Option<ProgressBar> = None;

        while updates.changed().await.is_ok() {
            let (submitting, label) = {
                let state = updates.borrow_and_update();
                (state.is_submitting, state.submit_label())
            };

            match (submitting, spinner.take()) {
                (true, None) => spinner = Some(start_spinner(label)),
                (true, Some(running)) => spinner = Some(running),
                (false, Some(running)) => running.finish_and_clear(),
                (false, None) => {}
            }
        }

        if let Some(running) = spinner {
            running.finish_and_clear();
        }
    })
}

fn start_spinner(label: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} {msg} {elapsed}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(label.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
