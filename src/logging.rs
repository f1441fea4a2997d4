//! ログ初期化
//!
//! `RUST_LOG` があればそれを優先。無ければ `-v` で debug、通常は warn。

use env_logger::Env;

pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "ai_image_studio=debug,ai_image=debug,warn"
    } else {
        "warn"
    }
}

pub fn init(verbose: bool) {
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter(verbose)))
        .format_timestamp(None)
        .init();
}
