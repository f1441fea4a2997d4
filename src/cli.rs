use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ai-image")]
#[command(about = "AI画像生成・フェイススワップ クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// バックエンドのURL（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub backend_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// プロンプト（と任意の画像）から画像を生成
    Generate {
        /// 生成内容の説明（フェイススワップ時は不要）
        #[arg(short, long, default_value = "")]
        prompt: String,

        /// Image 1（ソース画像）
        #[arg(long)]
        image1: Option<PathBuf>,

        /// Image 2（ターゲット画像）
        #[arg(long)]
        image2: Option<PathBuf>,

        /// フェイススワップを行う（Image 1の顔をImage 2へ）
        #[arg(long)]
        face_swap: bool,

        /// 保存先ディレクトリ（省略時は設定値またはカレント）
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// 結果を保存しない
        #[arg(long)]
        no_download: bool,
    },

    /// フェイススワップ（generate --face-swap の短縮形）
    Swap {
        /// ソース画像（この顔を使う）
        #[arg(required = true)]
        image1: PathBuf,

        /// ターゲット画像（人物が写っているもの）
        #[arg(required = true)]
        image2: PathBuf,

        /// 保存先ディレクトリ
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// 結果を保存しない
        #[arg(long)]
        no_download: bool,
    },

    /// 対話形式でフォームに入力して送信
    Interactive {
        /// 保存先ディレクトリ
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// バックエンドの稼働確認
    Health,

    /// 設定を表示/編集
    Config {
        /// バックエンドURLを設定
        #[arg(long)]
        set_backend_url: Option<String>,

        /// 保存先ディレクトリを設定
        #[arg(long)]
        set_download_dir: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "ai-image", "generate", "-p", "a cat", "--image2", "b.png", "-o", "out",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate { prompt, image1, image2, face_swap, output_dir, no_download } => {
                assert_eq!(prompt, "a cat");
                assert!(image1.is_none());
                assert_eq!(image2, Some(PathBuf::from("b.png")));
                assert!(!face_swap);
                assert_eq!(output_dir, Some(PathBuf::from("out")));
                assert!(!no_download);
            }
            _ => panic!("generate expected"),
        }
    }

    #[test]
    fn test_parse_swap_requires_two_images() {
        assert!(Cli::try_parse_from(["ai-image", "swap", "a.jpg"]).is_err());
        let cli = Cli::try_parse_from(["ai-image", "swap", "a.jpg", "b.jpg", "--no-download"]).unwrap();
        assert!(matches!(cli.command, Commands::Swap { no_download: true, .. }));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "ai-image", "health", "--backend-url", "http://gpu-box:8000", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.backend_url.as_deref(), Some("http://gpu-box:8000"));
        assert!(matches!(cli.command, Commands::Health));
    }
}
